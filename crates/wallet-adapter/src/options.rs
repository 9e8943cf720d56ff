//! Send options and commitment levels.

use serde::{Deserialize, Serialize};

/// Confirmation level a node should reach before answering.
///
/// `Processed`, `Confirmed` and `Finalized` are the current levels; the rest
/// are deprecated aliases some dApps still send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
    Recent,
    Single,
    SingleGossip,
    Root,
    Max,
}

impl Commitment {
    /// Map deprecated aliases onto the level wallets understand.
    pub fn normalize(self) -> Commitment {
        match self {
            Commitment::Processed | Commitment::Recent => Commitment::Processed,
            Commitment::Confirmed | Commitment::Single | Commitment::SingleGossip => {
                Commitment::Confirmed
            }
            Commitment::Finalized | Commitment::Root | Commitment::Max => Commitment::Finalized,
        }
    }
}

/// Options for sending a signed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<Commitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_preflight: Option<bool>,
}

impl SendOptions {
    pub fn with_preflight_commitment(mut self, commitment: Commitment) -> Self {
        self.preflight_commitment = Some(commitment);
        self
    }

    /// Options as handed to a wallet-standard wallet: always present, with the
    /// preflight commitment normalized and everything else unchanged.
    pub fn for_wallet(options: Option<SendOptions>) -> SendOptions {
        let options = options.unwrap_or_default();
        SendOptions {
            preflight_commitment: options.preflight_commitment.map(Commitment::normalize),
            ..options
        }
    }
}
