//! String encodings for payloads sent over the embedded provider channel.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, AdapterResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    #[default]
    Base58,
    Base64,
}

impl PayloadEncoding {
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            PayloadEncoding::Base58 => bs58::encode(bytes).into_string(),
            PayloadEncoding::Base64 => STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self, s: &str) -> AdapterResult<Vec<u8>> {
        match self {
            PayloadEncoding::Base58 => bs58::decode(s)
                .into_vec()
                .map_err(|e| AdapterError::Encoding(format!("base58: {e}"))),
            PayloadEncoding::Base64 => STANDARD
                .decode(s)
                .map_err(|e| AdapterError::Encoding(format!("base64: {e}"))),
        }
    }
}
