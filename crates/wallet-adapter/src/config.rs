//! Adapter configuration loaded from TOML/JSON files and the environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::{AuthOptions, AuthProvider, FrameTransport};
use crate::encoding::PayloadEncoding;
use crate::provider::ActiveChainFn;
use crate::types::{get_chain_by_id, ChainDescriptor, SOLANA_DEVNET, SOLANA_MAINNET, SOLANA_TESTNET};

pub const ENV_PROJECT_ID: &str = "WALLET_ADAPTER_PROJECT_ID";
pub const ENV_DEFAULT_CHAIN: &str = "WALLET_ADAPTER_DEFAULT_CHAIN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required setting {setting} (set it in the config file or {env})")]
    MissingSetting {
        setting: &'static str,
        env: &'static str,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_chain_ids() -> Vec<String> {
    [SOLANA_MAINNET, SOLANA_DEVNET, SOLANA_TESTNET]
        .iter()
        .map(|c| c.chain_id.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    /// Project id issued for the embedded wallet. Required.
    #[serde(default)]
    pub project_id: String,
    /// Chain selected when the host has none; defaults to the first chain.
    #[serde(default)]
    pub default_chain: Option<String>,
    #[serde(default = "default_chain_ids")]
    pub chains: Vec<String>,
    #[serde(default)]
    pub auth: AuthOptions,
    #[serde(default)]
    pub payload_encoding: PayloadEncoding,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            default_chain: None,
            chains: default_chain_ids(),
            auth: AuthOptions::default(),
            payload_encoding: PayloadEncoding::default(),
        }
    }
}

impl AdapterConfig {
    /// Resolve the configured chain ids.
    pub fn chain_descriptors(&self) -> Result<Vec<ChainDescriptor>, ConfigError> {
        self.chains
            .iter()
            .map(|id| {
                get_chain_by_id(id).ok_or_else(|| ConfigError::Invalid(format!("unknown chain {id}")))
            })
            .collect()
    }

    pub fn default_chain_descriptor(&self) -> Result<ChainDescriptor, ConfigError> {
        let chains = self.chain_descriptors()?;
        match &self.default_chain {
            Some(id) => {
                let wanted = get_chain_by_id(id)
                    .ok_or_else(|| ConfigError::Invalid(format!("unknown default chain {id}")))?;
                chains
                    .into_iter()
                    .find(|c| c.chain_id == wanted.chain_id)
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!("default chain {id} is not in chains"))
                    })
            }
            None => chains
                .into_iter()
                .next()
                .ok_or_else(|| ConfigError::Invalid("no chains configured".into())),
        }
    }

    /// Build an [`AuthProvider`] for this configuration.
    pub fn auth_provider(
        &self,
        transport: Arc<dyn FrameTransport>,
        get_active_chain: ActiveChainFn,
    ) -> Result<AuthProvider, ConfigError> {
        Ok(AuthProvider::new(
            transport,
            self.auth.clone(),
            self.chain_descriptors()?,
            get_active_chain,
        )
        .with_encoding(self.payload_encoding))
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a `.toml` or `.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AdapterConfig, ConfigError> {
        let config = Self::read_file(path.as_ref())?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<AdapterConfig, ConfigError> {
        info!("Loading configuration from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            Some("json") => Self::from_json(&contents),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_toml(contents: &str) -> Result<AdapterConfig, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(format!("TOML: {e}")))
    }

    pub fn from_json(contents: &str) -> Result<AdapterConfig, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(format!("JSON: {e}")))
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn from_env_and_file(file_path: Option<&Path>) -> Result<AdapterConfig, ConfigError> {
        let mut config = match file_path {
            Some(path) => Self::read_file(path)?,
            None => AdapterConfig::default(),
        };

        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(config: &mut AdapterConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup(ENV_PROJECT_ID) {
            debug!("Overriding project id from environment");
            config.project_id = project_id;
        }
        if let Some(chain) = lookup(ENV_DEFAULT_CHAIN) {
            debug!("Overriding default chain from environment: {}", chain);
            config.default_chain = Some(chain);
        }
    }

    pub fn validate(config: &AdapterConfig) -> Result<(), ConfigError> {
        if config.project_id.trim().is_empty() {
            return Err(ConfigError::MissingSetting {
                setting: "projectId",
                env: ENV_PROJECT_ID,
            });
        }
        config.default_chain_descriptor()?;
        Ok(())
    }
}
