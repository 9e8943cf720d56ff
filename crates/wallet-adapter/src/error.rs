use thiserror::Error;

/// Errors surfaced by every provider adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The wallet does not declare the feature an operation needs.
    #[error("Wallet feature not supported: {0}")]
    FeatureNotSupported(String),

    #[error("No wallet account found")]
    AccountNotFound,

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Empty result from {0}")]
    EmptyResult(&'static str),

    #[error("Auth method disabled: {0}")]
    AuthMethodDisabled(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Transaction error: {0}")]
    Transaction(#[from] chain_sol::SolError),

    /// Failure reported by the wallet or frame transport.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl AdapterError {
    /// True when the failure means "this wallet cannot do that", as opposed
    /// to the operation failing.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AdapterError::FeatureNotSupported(_))
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(e: serde_json::Error) -> Self {
        AdapterError::Transport(format!("malformed response: {e}"))
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
