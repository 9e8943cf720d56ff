//! Solana wallet adapters.
//!
//! Two providers share the [`SolanaProvider`] interface:
//!
//! - [`WalletStandardProvider`] drives any wallet that announces itself
//!   through wallet-standard, calling its declared features directly.
//! - [`AuthProvider`] drives the embedded email/social wallet over a
//!   request/response channel to its frame.
//!
//! Both take transactions as [`chain_sol::SolanaTransaction`] and emit
//! `connect`, `disconnect` and `chainChanged` events through an
//! [`EventEmitter`].

pub mod auth;
pub mod config;
pub mod encoding;
pub mod error;
pub mod events;
pub mod logging;
pub mod options;
pub mod provider;
pub mod types;
pub mod wallet_standard;

pub use auth::{AuthOptions, AuthProvider, FrameTransport, SocialProvider};
pub use config::{AdapterConfig, ConfigError, ConfigLoader};
pub use encoding::PayloadEncoding;
pub use error::{AdapterError, AdapterResult};
pub use events::{EventEmitter, EventKind, Listener, ListenerId, ProviderEvent};
pub use options::{Commitment, SendOptions};
pub use provider::{ActiveChainFn, SolanaProvider};
pub use types::{ChainDescriptor, ProviderType, WalletAccount};
pub use wallet_standard::{StandardWallet, WalletFeatures, WalletStandardProvider};

pub use chain_sol::SolanaTransaction;
