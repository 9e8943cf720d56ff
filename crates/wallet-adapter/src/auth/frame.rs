//! Request/response channel to the embedded (frame-hosted) auth wallet.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterResult;
use crate::options::SendOptions;

/// Session returned by the embedded wallet after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSession {
    pub address: String,
    pub chain_id: String,
}

/// RPC requests understood by the embedded wallet. Payload fields are
/// already string-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum FrameRequest {
    #[serde(rename = "solana_signMessage")]
    SignMessage { message: String, pubkey: String },

    #[serde(rename = "solana_signTransaction")]
    SignTransaction { transaction: String },

    /// `options` is always sent, as `null` when the caller gave none.
    #[serde(rename = "solana_signAndSendTransaction")]
    SignAndSendTransaction {
        transaction: String,
        options: Option<SendOptions>,
    },

    #[serde(rename = "solana_signAllTransactions")]
    SignAllTransactions { transactions: Vec<String> },
}

impl FrameRequest {
    pub fn method(&self) -> &'static str {
        match self {
            FrameRequest::SignMessage { .. } => "solana_signMessage",
            FrameRequest::SignTransaction { .. } => "solana_signTransaction",
            FrameRequest::SignAndSendTransaction { .. } => "solana_signAndSendTransaction",
            FrameRequest::SignAllTransactions { .. } => "solana_signAllTransactions",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SignatureResponse {
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransactionResponse {
    pub transaction: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransactionsResponse {
    pub transactions: Vec<String>,
}

/// What the user must do next after submitting an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailConnectAction {
    /// Approve the new device from a link sent by email.
    VerifyDevice,
    /// Enter the one-time code sent by email.
    VerifyOtp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    X,
    Discord,
    Farcaster,
    Github,
    Apple,
    Facebook,
}

#[async_trait]
pub trait FrameTransport: Send + Sync {
    /// Resume or establish the embedded session on `chain_id`.
    async fn connect(&self, chain_id: Option<String>) -> AdapterResult<FrameSession>;

    async fn disconnect(&self) -> AdapterResult<()>;

    /// Send an RPC request and return the raw JSON result.
    async fn request(&self, request: FrameRequest) -> AdapterResult<serde_json::Value>;

    async fn switch_network(&self, chain_id: &str) -> AdapterResult<()>;

    async fn get_email(&self) -> AdapterResult<Option<String>>;

    async fn connect_email(&self, email: &str) -> AdapterResult<EmailConnectAction>;

    async fn connect_otp(&self, otp: &str) -> AdapterResult<()>;

    async fn get_social_redirect_uri(&self, provider: SocialProvider) -> AdapterResult<String>;

    async fn get_farcaster_uri(&self) -> AdapterResult<String>;

    /// Finish a social login from the provider's redirect `uri`.
    async fn connect_social(&self, uri: &str) -> AdapterResult<FrameSession>;
}
