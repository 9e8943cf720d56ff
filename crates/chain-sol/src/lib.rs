//! Solana wire formats for the wallet adapters.
//!
//! Wallets exchange transactions as raw wire bytes, so this crate implements
//! the legacy and v0 transaction layouts by hand instead of pulling in
//! `solana-sdk`. `ed25519-dalek` covers signing and signature checks, `bs58`
//! the address encoding.

pub mod address;
pub mod error;
pub mod transaction;
pub mod versioned;

pub use address::{address_to_bytes, bytes_to_address, validate_address, validate_public_key};
pub use error::SolError;
pub use transaction::{
    build_sol_transfer, compile_transaction, decode_compact_u16, encode_compact_u16,
    CompiledInstruction, LegacyMessage, LegacyTransaction, MessageHeader, SerializeConfig,
    Signature, SolAccountMeta, SolInstruction, SIGNATURE_LEN, SYSTEM_PROGRAM_ID,
};
pub use versioned::{
    AddressTableLookup, MessageV0, SolanaTransaction, VersionedMessage, VersionedTransaction,
};
