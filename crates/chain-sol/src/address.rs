//! Solana addresses.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte Ed25519 public
//! key. Wallets hand accounts to the adapter as either form, so both
//! directions live here.

use crate::error::SolError;

/// Encode a 32-byte public key as a Solana address string.
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a Solana address string to its 32-byte representation.
///
/// Fails if the string is not Base58 or does not decode to exactly 32 bytes.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Validate a Solana address string.
pub fn validate_address(address: &str) -> Result<bool, SolError> {
    address_to_bytes(address).map(|_| true)
}

/// Check that a 32-byte key is a valid Ed25519 point.
///
/// Wallet accounts must be real keys; program-derived addresses are not.
pub fn validate_public_key(bytes: &[u8; 32]) -> Result<(), SolError> {
    ed25519_dalek::VerifyingKey::from_bytes(bytes)
        .map(|_| ())
        .map_err(|e| SolError::InvalidPublicKey(e.to_string()))
}
