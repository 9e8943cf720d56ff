//! The uniform interface every wallet adapter implements.

use async_trait::async_trait;
use chain_sol::SolanaTransaction;

use crate::error::AdapterResult;
use crate::events::{EventEmitter, EventKind, Listener, ListenerId, ProviderEvent};
use crate::options::SendOptions;
use crate::types::{ChainDescriptor, ProviderType};

/// Returns the chain the host application currently has selected.
pub type ActiveChainFn = std::sync::Arc<dyn Fn() -> Option<ChainDescriptor> + Send + Sync>;

#[async_trait]
pub trait SolanaProvider: Send + Sync {
    fn name(&self) -> &str;

    fn provider_type(&self) -> ProviderType;

    /// Base58 address of the active account, if any.
    fn public_key(&self) -> Option<String>;

    /// Chains this provider can operate on.
    fn chains(&self) -> Vec<ChainDescriptor>;

    fn events(&self) -> &EventEmitter;

    /// Connect and return the active account address.
    async fn connect(&self) -> AdapterResult<String>;

    async fn disconnect(&self) -> AdapterResult<()>;

    /// Sign arbitrary bytes with the active account; returns the signature.
    async fn sign_message(&self, message: &[u8]) -> AdapterResult<Vec<u8>>;

    /// Have the wallet sign `transaction`; returns it with the signature
    /// attached, in the same format it was given.
    async fn sign_transaction(
        &self,
        transaction: &SolanaTransaction,
    ) -> AdapterResult<SolanaTransaction>;

    /// Have the wallet sign and submit `transaction`; returns the base58
    /// transaction signature.
    async fn sign_and_send_transaction(
        &self,
        transaction: &SolanaTransaction,
        options: Option<SendOptions>,
    ) -> AdapterResult<String>;

    async fn sign_all_transactions(
        &self,
        transactions: &[SolanaTransaction],
    ) -> AdapterResult<Vec<SolanaTransaction>>;

    /// Switch the active network to `chain_id`; emits `chainChanged` on
    /// success.
    async fn switch_network(&self, chain_id: &str) -> AdapterResult<()>;

    /// Register a closure listener. Only callable on a concrete provider;
    /// through `dyn SolanaProvider`, use [`SolanaProvider::add_listener`].
    fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ProviderEvent) + Send + Sync + 'static,
        Self: Sized,
    {
        self.events().on(kind, listener)
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.events().add_listener(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.events().off(id)
    }
}
