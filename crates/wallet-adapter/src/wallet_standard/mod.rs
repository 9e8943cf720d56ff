//! Adapter for wallets implementing the wallet-standard interface.

pub mod features;
pub mod provider;

pub use features::WalletFeatures;
pub use provider::WalletStandardProvider;

use crate::types::WalletAccount;

/// A wallet discovered through wallet-standard.
///
/// Accounts and features are read on every call; a wallet may change them
/// at any time (e.g. after the user approves a connection).
pub trait StandardWallet: Send + Sync {
    fn name(&self) -> &str;

    fn icon(&self) -> Option<String> {
        None
    }

    /// Wallet-standard chain names the wallet supports, e.g. `solana:mainnet`.
    fn chains(&self) -> Vec<String>;

    fn accounts(&self) -> Vec<WalletAccount>;

    fn features(&self) -> WalletFeatures;
}
