//! Versioned (v0) transactions and the legacy/versioned sum type.
//!
//! A versioned message is marked by the high bit of its first byte; the low
//! seven bits carry the version. Version 0 adds address-table lookups after
//! the instructions:
//!
//! ```text
//! MessageV0:
//!   prefix                  0x80 | version
//!   header                  3 bytes
//!   static_account_keys     compact-u16 + 32 bytes each
//!   recent_blockhash        32 bytes
//!   instructions            compact-u16 + instructions
//!   address_table_lookups   compact-u16 + lookups
//!
//! AddressTableLookup:
//!   account_key             32 bytes
//!   writable_indexes        compact-u16 + u8 each
//!   readonly_indexes        compact-u16 + u8 each
//! ```

use crate::error::SolError;
use crate::transaction::{
    read_signature_slots, sign_with_seed, write_signature_slots, CompiledInstruction,
    LegacyMessage, LegacyTransaction, MessageHeader, SerializeConfig, Signature, WireReader,
};

/// High bit of the first message byte marks a versioned message.
pub const VERSION_PREFIX: u8 = 0x80;

/// A lookup into an on-chain address table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTableLookup {
    pub account_key: [u8; 32],
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

/// A version 0 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageV0 {
    pub header: MessageHeader,
    pub static_account_keys: Vec<[u8; 32]>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
    pub address_table_lookups: Vec<AddressTableLookup>,
}

impl MessageV0 {
    /// Reuse a compiled legacy message as a v0 message with no lookups.
    pub fn from_legacy(message: LegacyMessage) -> Self {
        Self {
            header: message.header,
            static_account_keys: message.account_keys,
            recent_blockhash: message.recent_blockhash,
            instructions: message.instructions,
            address_table_lookups: Vec::new(),
        }
    }

    fn as_legacy_body(&self) -> LegacyMessage {
        LegacyMessage {
            header: self.header,
            account_keys: self.static_account_keys.clone(),
            recent_blockhash: self.recent_blockhash,
            instructions: self.instructions.clone(),
        }
    }
}

/// A message carried by a [`VersionedTransaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedMessage {
    Legacy(LegacyMessage),
    V0(MessageV0),
}

impl VersionedMessage {
    pub fn header(&self) -> &MessageHeader {
        match self {
            VersionedMessage::Legacy(m) => &m.header,
            VersionedMessage::V0(m) => &m.header,
        }
    }

    /// Keys whose signatures this message requires, in slot order.
    pub fn signer_keys(&self) -> &[[u8; 32]] {
        let keys = match self {
            VersionedMessage::Legacy(m) => &m.account_keys,
            VersionedMessage::V0(m) => &m.static_account_keys,
        };
        let n = (self.header().num_required_signatures as usize).min(keys.len());
        &keys[..n]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        match self {
            VersionedMessage::Legacy(m) => m.serialize(),
            VersionedMessage::V0(m) => {
                // v0 shares the legacy body layout, followed by the lookups.
                let mut buf = vec![VERSION_PREFIX];
                buf.extend_from_slice(&m.as_legacy_body().serialize()?);

                buf.extend_from_slice(&crate::encode_compact_u16(
                    checked_len(m.address_table_lookups.len())?,
                ));
                for lookup in &m.address_table_lookups {
                    buf.extend_from_slice(&lookup.account_key);
                    buf.extend_from_slice(&crate::encode_compact_u16(checked_len(
                        lookup.writable_indexes.len(),
                    )?));
                    buf.extend_from_slice(&lookup.writable_indexes);
                    buf.extend_from_slice(&crate::encode_compact_u16(checked_len(
                        lookup.readonly_indexes.len(),
                    )?));
                    buf.extend_from_slice(&lookup.readonly_indexes);
                }
                Ok(buf)
            }
        }
    }

    fn read(reader: &mut WireReader<'_>) -> Result<Self, SolError> {
        let first = reader.peek_u8()?;
        if first & VERSION_PREFIX == 0 {
            return LegacyMessage::read(reader).map(VersionedMessage::Legacy);
        }

        let version = reader.read_u8()? & !VERSION_PREFIX;
        if version != 0 {
            return Err(SolError::UnsupportedVersion(version));
        }

        let body = LegacyMessage::read(reader)?;
        let num_lookups = reader.read_compact_u16()?;
        let mut address_table_lookups = Vec::with_capacity(num_lookups);
        for _ in 0..num_lookups {
            let account_key = reader.read_key()?;
            let n = reader.read_compact_u16()?;
            let writable_indexes = reader.read_bytes(n)?.to_vec();
            let n = reader.read_compact_u16()?;
            let readonly_indexes = reader.read_bytes(n)?.to_vec();
            address_table_lookups.push(AddressTableLookup {
                account_key,
                writable_indexes,
                readonly_indexes,
            });
        }

        let mut message = MessageV0::from_legacy(body);
        message.address_table_lookups = address_table_lookups;
        Ok(VersionedMessage::V0(message))
    }
}

fn checked_len(len: usize) -> Result<u16, SolError> {
    u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("length {len} exceeds compact-u16")))
}

/// A transaction whose message may be legacy or versioned. Either way it has
/// one signature slot per required signer, and unsigned slots go on the wire
/// as zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedTransaction {
    pub signatures: Vec<Signature>,
    pub message: VersionedMessage,
}

impl VersionedTransaction {
    pub fn new(message: VersionedMessage) -> Self {
        let slots = message.header().num_required_signatures as usize;
        Self {
            signatures: vec![[0u8; 64]; slots],
            message,
        }
    }

    /// Sign with a 32-byte Ed25519 seed, writing into the matching slot.
    pub fn sign(&mut self, private_key: &[u8; 32]) -> Result<(), SolError> {
        let message_bytes = self.message.serialize()?;
        let (pubkey, signature) = sign_with_seed(private_key, &message_bytes);
        let index = self
            .message
            .signer_keys()
            .iter()
            .position(|k| *k == pubkey)
            .ok_or_else(|| {
                SolError::SigningError("wallet pubkey not found in transaction signers".into())
            })?;
        let slot = self
            .signatures
            .get_mut(index)
            .ok_or_else(|| SolError::SigningError(format!("no signature slot {index}")))?;
        *slot = signature;
        Ok(())
    }

    /// Serialize into wire format. The slot count must match the message
    /// header.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let required = self.message.header().num_required_signatures as usize;
        if self.signatures.len() != required {
            return Err(SolError::SerializationError(format!(
                "{} signature slots for {} required signers",
                self.signatures.len(),
                required
            )));
        }

        let message_bytes = self.message.serialize()?;
        let mut wire = Vec::with_capacity(1 + 64 * required + message_bytes.len());
        write_signature_slots(&mut wire, self.signatures.iter().map(Some))?;
        wire.extend_from_slice(&message_bytes);
        Ok(wire)
    }

    /// Parse a versioned transaction from wire bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SolError> {
        let mut reader = WireReader::new(data);
        let signatures: Vec<Signature> = read_signature_slots(&mut reader)?
            .into_iter()
            .map(|slot| slot.unwrap_or([0u8; 64]))
            .collect();
        let message = VersionedMessage::read(&mut reader)?;
        if !reader.is_empty() {
            return Err(SolError::SerializationError(format!(
                "{} trailing bytes after message",
                data.len() - reader.position()
            )));
        }

        let required = message.header().num_required_signatures as usize;
        if signatures.len() != required {
            return Err(SolError::SerializationError(format!(
                "{} signature slots for {} required signers",
                signatures.len(),
                required
            )));
        }

        Ok(Self {
            signatures,
            message,
        })
    }
}

/// Either transaction format, as handed to a wallet adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaTransaction {
    Legacy(LegacyTransaction),
    Versioned(VersionedTransaction),
}

impl SolanaTransaction {
    pub fn is_versioned(&self) -> bool {
        matches!(self, SolanaTransaction::Versioned(_))
    }

    /// Serialize for a wallet that will add its own signature.
    ///
    /// Legacy transactions skip signature checks since the wallet's signature
    /// is not attached yet; versioned transactions use their default
    /// serialization.
    pub fn serialize_unverified(&self) -> Result<Vec<u8>, SolError> {
        match self {
            SolanaTransaction::Legacy(tx) => tx.serialize(SerializeConfig::UNVERIFIED),
            SolanaTransaction::Versioned(tx) => tx.serialize(),
        }
    }

    /// Decode `bytes` as the same variant as `self`.
    pub fn decode_like(&self, bytes: &[u8]) -> Result<SolanaTransaction, SolError> {
        match self {
            SolanaTransaction::Legacy(_) => {
                LegacyTransaction::from_bytes(bytes).map(SolanaTransaction::Legacy)
            }
            SolanaTransaction::Versioned(_) => {
                VersionedTransaction::from_bytes(bytes).map(SolanaTransaction::Versioned)
            }
        }
    }
}

impl From<LegacyTransaction> for SolanaTransaction {
    fn from(tx: LegacyTransaction) -> Self {
        SolanaTransaction::Legacy(tx)
    }
}

impl From<VersionedTransaction> for SolanaTransaction {
    fn from(tx: VersionedTransaction) -> Self {
        SolanaTransaction::Versioned(tx)
    }
}
