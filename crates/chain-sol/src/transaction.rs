//! Legacy Solana transaction wire format.
//!
//! Transactions are built and parsed by hand, with no `solana-sdk`
//! dependency. The legacy layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! A signature slot that has not been filled yet is written as 64 zero
//! bytes, and 64 zero bytes parse back as an empty slot.

use ed25519_dalek::{Signer, Verifier};
use zeroize::Zeroize;

use crate::address::bytes_to_address;
use crate::error::SolError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The Solana System Program public key: 32 zero bytes.
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

/// Ed25519 signature length.
pub const SIGNATURE_LEN: usize = 64;

/// A raw Ed25519 signature.
pub type Signature = [u8; SIGNATURE_LEN];

const EMPTY_SIGNATURE: Signature = [0u8; SIGNATURE_LEN];

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from a byte slice.
///
/// Returns `(value, bytes_consumed)`. Only canonical encodings are accepted:
/// at most three bytes, no zero-valued trailing byte, and a third byte no
/// larger than `0x03`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for index in 0..3 {
        let byte = *data.get(index).ok_or_else(|| {
            SolError::SerializationError(
                "unexpected end of data while decoding compact-u16".into(),
            )
        })?;

        if index == 2 && byte > 0x03 {
            return Err(SolError::SerializationError(
                "compact-u16 value overflow".into(),
            ));
        }
        if index > 0 && byte == 0 {
            return Err(SolError::SerializationError(
                "non-canonical compact-u16 encoding".into(),
            ));
        }

        value |= ((byte & 0x7f) as u32) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok((value as u16, index + 1));
        }
    }

    Err(SolError::SerializationError(
        "compact-u16 longer than three bytes".into(),
    ))
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("too many {what}: {len}")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Wire reader
// ---------------------------------------------------------------------------

/// Cursor over wire bytes with bounds-checked reads.
pub(crate) struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub(crate) fn peek_u8(&self) -> Result<u8, SolError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| SolError::SerializationError("unexpected end of data".into()))
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, SolError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_compact_u16(&mut self) -> Result<usize, SolError> {
        let (value, consumed) = decode_compact_u16(&self.data[self.pos.min(self.data.len())..])?;
        self.pos += consumed;
        Ok(value as usize)
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], SolError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                SolError::SerializationError(format!(
                    "need {len} bytes at offset {}, have {}",
                    self.pos,
                    self.data.len().saturating_sub(self.pos)
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn read_key(&mut self) -> Result<[u8; 32], SolError> {
        let mut key = [0u8; 32];
        key.copy_from_slice(self.read_bytes(32)?);
        Ok(key)
    }

    pub(crate) fn read_signature(&mut self) -> Result<Signature, SolError> {
        let mut sig = EMPTY_SIGNATURE;
        sig.copy_from_slice(self.read_bytes(SIGNATURE_LEN)?);
        Ok(sig)
    }
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A Solana instruction (before it is compiled into a message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the message's account keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    pub(crate) fn write(&self, buf: &mut Vec<u8>) -> Result<(), SolError> {
        buf.push(self.program_id_index);
        buf.extend_from_slice(&compact_len(self.account_indices.len(), "account indices")?);
        buf.extend_from_slice(&self.account_indices);
        buf.extend_from_slice(&compact_len(self.data.len(), "instruction data bytes")?);
        buf.extend_from_slice(&self.data);
        Ok(())
    }

    pub(crate) fn read(reader: &mut WireReader<'_>) -> Result<Self, SolError> {
        let program_id_index = reader.read_u8()?;
        let num_accounts = reader.read_compact_u16()?;
        let account_indices = reader.read_bytes(num_accounts)?.to_vec();
        let data_len = reader.read_compact_u16()?;
        let data = reader.read_bytes(data_len)?.to_vec();
        Ok(Self {
            program_id_index,
            account_indices,
            data,
        })
    }
}

/// The three-byte message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    /// Number of required signatures (first N account keys are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,
}

impl MessageHeader {
    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);
    }

    pub(crate) fn read(reader: &mut WireReader<'_>) -> Result<Self, SolError> {
        Ok(Self {
            num_required_signatures: reader.read_u8()?,
            num_readonly_signed: reader.read_u8()?,
            num_readonly_unsigned: reader.read_u8()?,
        })
    }
}

/// A legacy (unversioned) message: the bytes every signer signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyMessage {
    pub header: MessageHeader,
    /// All account keys referenced by this message, in canonical order:
    ///   1. writable signers
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<[u8; 32]>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl LegacyMessage {
    /// Keys whose signatures this message requires, in slot order.
    pub fn signer_keys(&self) -> &[[u8; 32]] {
        let n = (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(256);
        self.header.write(&mut buf);

        buf.extend_from_slice(&compact_len(self.account_keys.len(), "account keys")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key);
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&compact_len(self.instructions.len(), "instructions")?);
        for ix in &self.instructions {
            ix.write(&mut buf)?;
        }

        Ok(buf)
    }

    pub(crate) fn read(reader: &mut WireReader<'_>) -> Result<Self, SolError> {
        let header = MessageHeader::read(reader)?;

        let num_accounts = reader.read_compact_u16()?;
        let mut account_keys = Vec::with_capacity(num_accounts);
        for _ in 0..num_accounts {
            account_keys.push(reader.read_key()?);
        }

        let recent_blockhash = reader.read_key()?;

        let num_instructions = reader.read_compact_u16()?;
        let mut instructions = Vec::with_capacity(num_instructions);
        for _ in 0..num_instructions {
            instructions.push(CompiledInstruction::read(reader)?);
        }

        if header.num_required_signatures as usize > account_keys.len() {
            return Err(SolError::SerializationError(format!(
                "{} required signatures but only {} account keys",
                header.num_required_signatures,
                account_keys.len()
            )));
        }

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }
}

// ---------------------------------------------------------------------------
// Message building
// ---------------------------------------------------------------------------

/// Build a native SOL transfer message.
///
/// The caller must supply a recent blockhash (obtained from the RPC).
pub fn build_sol_transfer(
    from_pubkey: &[u8; 32],
    to_pubkey: &[u8; 32],
    lamports: u64,
    recent_blockhash: &[u8; 32],
) -> Result<LegacyMessage, SolError> {
    if lamports == 0 {
        return Err(SolError::TransactionBuildError(
            "lamports must be > 0".into(),
        ));
    }

    let instruction = build_system_transfer_instruction(from_pubkey, to_pubkey, lamports);
    compile_transaction(&[instruction], from_pubkey, recent_blockhash)
}

/// Compile instructions into a legacy message with a single fee payer.
///
/// The fee payer is always the first signer and is placed at index 0 in the
/// account keys.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<LegacyMessage, SolError> {
    struct AccountEntry {
        pubkey: [u8; 32],
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    // Fee payer is always signer + writable.
    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // Stable sort keeps insertion order within a category, so the fee payer
    // stays at index 0.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    let header = MessageHeader {
        num_required_signatures: entries.iter().filter(|e| e.is_signer).count() as u8,
        num_readonly_signed: entries
            .iter()
            .filter(|e| e.is_signer && !e.is_writable)
            .count() as u8,
        num_readonly_unsigned: entries
            .iter()
            .filter(|e| !e.is_signer && !e.is_writable)
            .count() as u8,
    };

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &[u8; 32], what: &str| {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{what} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id, "program_id")?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey, "account"))
            .collect::<Result<Vec<_>, _>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(LegacyMessage {
        header,
        account_keys,
        recent_blockhash: *recent_blockhash,
        instructions: compiled,
    })
}

/// Build a System Program `Transfer` instruction.
fn build_system_transfer_instruction(
    from: &[u8; 32],
    to: &[u8; 32],
    lamports: u64,
) -> SolInstruction {
    // Instruction data: u32 LE instruction index (2 = Transfer) + u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            SolAccountMeta {
                pubkey: *to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

pub(crate) fn write_signature_slots<'a>(
    buf: &mut Vec<u8>,
    slots: impl ExactSizeIterator<Item = Option<&'a Signature>>,
) -> Result<(), SolError> {
    buf.extend_from_slice(&compact_len(slots.len(), "signatures")?);
    for slot in slots {
        buf.extend_from_slice(slot.unwrap_or(&EMPTY_SIGNATURE));
    }
    Ok(())
}

pub(crate) fn read_signature_slots(
    reader: &mut WireReader<'_>,
) -> Result<Vec<Option<Signature>>, SolError> {
    let count = reader.read_compact_u16()?;
    let mut slots = Vec::with_capacity(count);
    for _ in 0..count {
        let sig = reader.read_signature()?;
        slots.push((sig != EMPTY_SIGNATURE).then_some(sig));
    }
    Ok(slots)
}

/// Sign `message` with a 32-byte Ed25519 seed, returning the public key and
/// signature. The seed copy is zeroized.
pub(crate) fn sign_with_seed(private_key: &[u8; 32], message: &[u8]) -> ([u8; 32], Signature) {
    let mut seed = *private_key;
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
    seed.zeroize();

    let signature = signing_key.sign(message);
    (signing_key.verifying_key().to_bytes(), signature.to_bytes())
}

pub(crate) fn verify_signature(
    pubkey: &[u8; 32],
    message: &[u8],
    signature: &Signature,
) -> Result<(), SolError> {
    let failed = || SolError::SignatureVerificationFailed(bytes_to_address(pubkey));
    let key = ed25519_dalek::VerifyingKey::from_bytes(pubkey).map_err(|_| failed())?;
    key.verify(message, &ed25519_dalek::Signature::from_bytes(signature))
        .map_err(|_| failed())
}

// ---------------------------------------------------------------------------
// Legacy transaction
// ---------------------------------------------------------------------------

/// Controls the checks [`LegacyTransaction::serialize`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Fail if any required signer has not signed yet.
    pub require_all_signatures: bool,
    /// Verify every present signature against its signer key.
    pub verify_signatures: bool,
}

impl SerializeConfig {
    /// Serialize whatever is there; used when handing an unsigned
    /// transaction to a wallet for signing.
    pub const UNVERIFIED: Self = Self {
        require_all_signatures: false,
        verify_signatures: false,
    };
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            require_all_signatures: true,
            verify_signatures: true,
        }
    }
}

/// A legacy transaction: one optional signature slot per required signer,
/// followed by the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub signatures: Vec<Option<Signature>>,
    pub message: LegacyMessage,
}

impl LegacyTransaction {
    /// Wrap a message with one empty slot per required signer.
    pub fn new(message: LegacyMessage) -> Self {
        let slots = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![None; slots],
            message,
        }
    }

    /// Whether every required signer slot is filled.
    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(Option::is_some)
    }

    /// Sign with a 32-byte Ed25519 seed, writing into the slot of the
    /// matching signer key.
    pub fn sign(&mut self, private_key: &[u8; 32]) -> Result<(), SolError> {
        let message_bytes = self.message.serialize()?;
        let (pubkey, signature) = sign_with_seed(private_key, &message_bytes);
        self.add_signature(&pubkey, signature)
    }

    /// Attach an externally produced signature for `pubkey`.
    pub fn add_signature(&mut self, pubkey: &[u8; 32], signature: Signature) -> Result<(), SolError> {
        let index = self
            .message
            .signer_keys()
            .iter()
            .position(|k| k == pubkey)
            .ok_or_else(|| {
                SolError::SigningError(format!(
                    "{} not found in transaction signers",
                    bytes_to_address(pubkey)
                ))
            })?;

        if self.signatures.len() < self.message.signer_keys().len() {
            self.signatures.resize(self.message.signer_keys().len(), None);
        }
        self.signatures[index] = Some(signature);
        Ok(())
    }

    /// Serialize into wire format, applying the checks in `config`.
    pub fn serialize(&self, config: SerializeConfig) -> Result<Vec<u8>, SolError> {
        let message_bytes = self.message.serialize()?;
        let signers = self.message.signer_keys();

        if config.require_all_signatures || config.verify_signatures {
            for (i, key) in signers.iter().enumerate() {
                match self.signatures.get(i).copied().flatten() {
                    Some(sig) if config.verify_signatures => {
                        verify_signature(key, &message_bytes, &sig)?
                    }
                    Some(_) => {}
                    None if config.require_all_signatures => {
                        return Err(SolError::MissingSignature(bytes_to_address(key)));
                    }
                    None => {}
                }
            }
        }

        // Always emit exactly one slot per required signer.
        let slots = (0..signers.len()).map(|i| self.signatures.get(i).and_then(Option::as_ref));

        let mut wire = Vec::with_capacity(1 + SIGNATURE_LEN * signers.len() + message_bytes.len());
        write_signature_slots(&mut wire, slots)?;
        wire.extend_from_slice(&message_bytes);
        Ok(wire)
    }

    /// Parse a legacy transaction from wire bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SolError> {
        let mut reader = WireReader::new(data);
        let signatures = read_signature_slots(&mut reader)?;

        if reader.peek_u8()? & crate::versioned::VERSION_PREFIX != 0 {
            return Err(SolError::SerializationError(
                "versioned message in legacy transaction".into(),
            ));
        }

        let message = LegacyMessage::read(&mut reader)?;
        if !reader.is_empty() {
            return Err(SolError::SerializationError(format!(
                "{} trailing bytes after message",
                data.len() - reader.position()
            )));
        }

        if signatures.len() != message.header.num_required_signatures as usize {
            return Err(SolError::SerializationError(format!(
                "{} signature slots for {} required signers",
                signatures.len(),
                message.header.num_required_signatures
            )));
        }

        Ok(Self {
            signatures,
            message,
        })
    }
}
