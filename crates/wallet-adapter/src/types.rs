use serde::{Deserialize, Serialize};

/// CAIP-2 namespace of every chain these adapters serve.
pub const SOLANA_NAMESPACE: &str = "solana";

/// Definition of a Solana network the adapters can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// Genesis-hash prefix identifying the cluster.
    pub chain_id: &'static str,
    pub name: &'static str,
    pub currency: &'static str,
    pub explorer_url: &'static str,
    pub rpc_url: &'static str,
    /// Chain name used by wallet-standard wallets, e.g. `solana:mainnet`.
    pub wallet_standard_chain: &'static str,
}

impl ChainDescriptor {
    /// CAIP-2 network id, e.g. `solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp`.
    pub fn caip_network_id(&self) -> String {
        format!("{SOLANA_NAMESPACE}:{}", self.chain_id)
    }
}

/// Solana Mainnet Beta.
pub const SOLANA_MAINNET: ChainDescriptor = ChainDescriptor {
    chain_id: "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
    name: "Solana",
    currency: "SOL",
    explorer_url: "https://solscan.io",
    rpc_url: "https://api.mainnet-beta.solana.com",
    wallet_standard_chain: "solana:mainnet",
};

/// Solana Devnet.
pub const SOLANA_DEVNET: ChainDescriptor = ChainDescriptor {
    chain_id: "EtWTRABZaYq6iMfeYKouRu166VU2xqa1",
    name: "Solana Devnet",
    currency: "SOL",
    explorer_url: "https://explorer.solana.com/?cluster=devnet",
    rpc_url: "https://api.devnet.solana.com",
    wallet_standard_chain: "solana:devnet",
};

/// Solana Testnet.
pub const SOLANA_TESTNET: ChainDescriptor = ChainDescriptor {
    chain_id: "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z",
    name: "Solana Testnet",
    currency: "SOL",
    explorer_url: "https://explorer.solana.com/?cluster=testnet",
    rpc_url: "https://api.testnet.solana.com",
    wallet_standard_chain: "solana:testnet",
};

const ALL_CHAINS: &[&ChainDescriptor] = &[&SOLANA_MAINNET, &SOLANA_DEVNET, &SOLANA_TESTNET];

/// Look up a known chain by its chain id or CAIP-2 network id.
pub fn get_chain_by_id(chain_id: &str) -> Option<ChainDescriptor> {
    let id = chain_id
        .strip_prefix(SOLANA_NAMESPACE)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(chain_id);
    ALL_CHAINS.iter().find(|c| c.chain_id == id).map(|c| **c)
}

/// All known Solana chains.
pub fn all_chains() -> Vec<ChainDescriptor> {
    ALL_CHAINS.iter().map(|c| **c).collect()
}

/// A wallet account as exposed by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    /// Base58 address.
    pub address: String,
    pub public_key: [u8; 32],
    /// Wallet-standard chains this account can act on. Empty means every
    /// chain the wallet declares.
    pub chains: Vec<String>,
    /// Feature ids the wallet supports for this account. Empty means every
    /// feature the wallet declares.
    pub features: Vec<String>,
}

impl WalletAccount {
    pub fn new(public_key: [u8; 32]) -> Self {
        Self {
            address: chain_sol::bytes_to_address(&public_key),
            public_key,
            chains: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn with_chains(mut self, chains: &[&str]) -> Self {
        self.chains = chains.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Whether this account can use `feature`.
    pub fn supports_feature(&self, feature: &str) -> bool {
        self.features.is_empty() || self.features.iter().any(|f| f == feature)
    }

    /// Whether this account can act on the wallet-standard `chain`.
    pub fn supports_chain(&self, chain: &str) -> bool {
        self.chains.is_empty() || self.chains.iter().any(|c| c == chain)
    }
}

/// How a provider reaches its wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderType {
    /// A wallet that announced itself through wallet-standard.
    Announced,
    /// The embedded email/social wallet.
    Auth,
}
