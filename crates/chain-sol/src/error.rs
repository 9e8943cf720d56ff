use thiserror::Error;

/// Solana wire-format errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("missing signature for signer {0}")]
    MissingSignature(String),

    #[error("signature verification failed for signer {0}")]
    SignatureVerificationFailed(String),

    #[error("unsupported transaction version: {0}")]
    UnsupportedVersion(u8),
}
