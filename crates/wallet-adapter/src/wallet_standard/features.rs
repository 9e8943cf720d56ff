//! Wallet-standard features as typed capabilities.
//!
//! A wallet declares each feature it supports by filling the matching slot
//! in [`WalletFeatures`]. Adapters resolve the slot before every call, so a
//! missing feature becomes a typed error instead of a failed lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, AdapterResult};
use crate::options::SendOptions;
use crate::types::WalletAccount;

pub const STANDARD_CONNECT: &str = "standard:connect";
pub const STANDARD_DISCONNECT: &str = "standard:disconnect";
pub const SOLANA_SIGN_MESSAGE: &str = "solana:signMessage";
pub const SOLANA_SIGN_TRANSACTION: &str = "solana:signTransaction";
pub const SOLANA_SIGN_AND_SEND_TRANSACTION: &str = "solana:signAndSendTransaction";

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectInput {
    /// Only reconnect to previously authorized accounts; never prompt.
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOutput {
    pub accounts: Vec<WalletAccount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageInput {
    pub account: WalletAccount,
    pub message: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageOutput {
    pub signed_message: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransactionInput {
    pub account: WalletAccount,
    /// Serialized transaction bytes.
    pub transaction: Vec<u8>,
    pub chain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionOutput {
    pub signed_transaction: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignAndSendTransactionInput {
    pub account: WalletAccount,
    pub transaction: Vec<u8>,
    pub chain: String,
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignAndSendTransactionOutput {
    pub signature: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ConnectFeature: Send + Sync {
    async fn connect(&self, input: ConnectInput) -> AdapterResult<ConnectOutput>;
}

#[async_trait]
pub trait DisconnectFeature: Send + Sync {
    async fn disconnect(&self) -> AdapterResult<()>;
}

#[async_trait]
pub trait SignMessageFeature: Send + Sync {
    async fn sign_message(
        &self,
        inputs: Vec<SignMessageInput>,
    ) -> AdapterResult<Vec<SignMessageOutput>>;
}

#[async_trait]
pub trait SignTransactionFeature: Send + Sync {
    async fn sign_transaction(
        &self,
        inputs: Vec<SignTransactionInput>,
    ) -> AdapterResult<Vec<SignTransactionOutput>>;
}

#[async_trait]
pub trait SignAndSendTransactionFeature: Send + Sync {
    async fn sign_and_send_transaction(
        &self,
        inputs: Vec<SignAndSendTransactionInput>,
    ) -> AdapterResult<Vec<SignAndSendTransactionOutput>>;
}

/// The features a wallet declares. An empty slot means "not supported".
#[derive(Clone, Default)]
pub struct WalletFeatures {
    pub connect: Option<Arc<dyn ConnectFeature>>,
    pub disconnect: Option<Arc<dyn DisconnectFeature>>,
    pub sign_message: Option<Arc<dyn SignMessageFeature>>,
    pub sign_transaction: Option<Arc<dyn SignTransactionFeature>>,
    pub sign_and_send_transaction: Option<Arc<dyn SignAndSendTransactionFeature>>,
}

fn require<T: ?Sized>(slot: &Option<Arc<T>>, feature: &str) -> AdapterResult<Arc<T>> {
    slot.clone()
        .ok_or_else(|| AdapterError::FeatureNotSupported(feature.to_string()))
}

impl WalletFeatures {
    pub fn connect(&self) -> AdapterResult<Arc<dyn ConnectFeature>> {
        require(&self.connect, STANDARD_CONNECT)
    }

    pub fn disconnect(&self) -> AdapterResult<Arc<dyn DisconnectFeature>> {
        require(&self.disconnect, STANDARD_DISCONNECT)
    }

    pub fn sign_message(&self) -> AdapterResult<Arc<dyn SignMessageFeature>> {
        require(&self.sign_message, SOLANA_SIGN_MESSAGE)
    }

    pub fn sign_transaction(&self) -> AdapterResult<Arc<dyn SignTransactionFeature>> {
        require(&self.sign_transaction, SOLANA_SIGN_TRANSACTION)
    }

    pub fn sign_and_send_transaction(
        &self,
    ) -> AdapterResult<Arc<dyn SignAndSendTransactionFeature>> {
        require(
            &self.sign_and_send_transaction,
            SOLANA_SIGN_AND_SEND_TRANSACTION,
        )
    }

    /// Ids of the declared features.
    pub fn declared(&self) -> Vec<&'static str> {
        let mut ids = Vec::new();
        if self.connect.is_some() {
            ids.push(STANDARD_CONNECT);
        }
        if self.disconnect.is_some() {
            ids.push(STANDARD_DISCONNECT);
        }
        if self.sign_message.is_some() {
            ids.push(SOLANA_SIGN_MESSAGE);
        }
        if self.sign_transaction.is_some() {
            ids.push(SOLANA_SIGN_TRANSACTION);
        }
        if self.sign_and_send_transaction.is_some() {
            ids.push(SOLANA_SIGN_AND_SEND_TRANSACTION);
        }
        ids
    }
}

impl std::fmt::Debug for WalletFeatures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.declared()).finish()
    }
}
