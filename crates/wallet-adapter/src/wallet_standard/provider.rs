use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chain_sol::SolanaTransaction;
use tracing::{debug, info, warn};

use super::features::{
    ConnectInput, SignAndSendTransactionInput, SignMessageInput, SignTransactionInput,
    SOLANA_SIGN_AND_SEND_TRANSACTION, SOLANA_SIGN_MESSAGE, SOLANA_SIGN_TRANSACTION,
};
use super::StandardWallet;
use crate::error::{AdapterError, AdapterResult};
use crate::events::{EventEmitter, ProviderEvent};
use crate::options::SendOptions;
use crate::provider::{ActiveChainFn, SolanaProvider};
use crate::types::{all_chains, get_chain_by_id, ChainDescriptor, ProviderType, WalletAccount};

/// Drives a wallet-standard wallet through its declared features.
///
/// Every operation resolves its feature first and fails with
/// [`AdapterError::FeatureNotSupported`] before touching accounts or the
/// wallet when it is missing. The active account is the first one the
/// wallet exposes; when it differs from the one seen on the previous call,
/// `accountChanged` is emitted.
pub struct WalletStandardProvider {
    wallet: Arc<dyn StandardWallet>,
    get_active_chain: ActiveChainFn,
    last_address: Mutex<Option<String>>,
    events: EventEmitter,
}

impl WalletStandardProvider {
    pub fn new(wallet: Arc<dyn StandardWallet>, get_active_chain: ActiveChainFn) -> Self {
        Self {
            wallet,
            get_active_chain,
            last_address: Mutex::new(None),
            events: EventEmitter::new(),
        }
    }

    pub fn icon(&self) -> Option<String> {
        self.wallet.icon()
    }

    fn first_account(&self) -> AdapterResult<WalletAccount> {
        self.wallet
            .accounts()
            .into_iter()
            .next()
            .ok_or(AdapterError::AccountNotFound)
    }

    /// Resolve the active account and check it can use `feature` on `chain`.
    fn account(&self, feature: &str, chain: Option<&str>) -> AdapterResult<WalletAccount> {
        let account = self.first_account()?;
        self.observe_account(&account.address);

        if !account.supports_feature(feature) {
            return Err(self.unsupported(AdapterError::FeatureNotSupported(feature.into())));
        }
        if let Some(chain) = chain {
            if !account.supports_chain(chain) {
                return Err(AdapterError::UnknownChain(format!(
                    "{chain} not supported by account {}",
                    account.address
                )));
            }
        }
        Ok(account)
    }

    fn observe_account(&self, address: &str) {
        let previous = self
            .last_address
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(address.to_string());

        if previous.is_some_and(|prev| prev != address) {
            info!(wallet = self.wallet.name(), %address, "account changed");
            self.events
                .emit(ProviderEvent::AccountChanged(address.to_string()));
        }
    }

    /// Wallet-standard name of the host's active chain.
    fn active_chain_name(&self) -> AdapterResult<String> {
        let chain = (self.get_active_chain)()
            .ok_or_else(|| AdapterError::UnknownChain("no active chain".into()))?;
        Ok(chain.wallet_standard_chain.to_string())
    }

    fn unsupported(&self, err: AdapterError) -> AdapterError {
        if err.is_unsupported() {
            warn!(wallet = self.wallet.name(), "{err}");
        }
        err
    }
}

#[async_trait]
impl SolanaProvider for WalletStandardProvider {
    fn name(&self) -> &str {
        self.wallet.name()
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Announced
    }

    fn public_key(&self) -> Option<String> {
        self.first_account().ok().map(|a| a.address)
    }

    fn chains(&self) -> Vec<ChainDescriptor> {
        let supported = self.wallet.chains();
        all_chains()
            .into_iter()
            .filter(|c| supported.iter().any(|s| s == c.wallet_standard_chain))
            .collect()
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }

    async fn connect(&self) -> AdapterResult<String> {
        let feature = self
            .wallet
            .features()
            .connect()
            .map_err(|e| self.unsupported(e))?;

        feature.connect(ConnectInput::default()).await?;
        let account = self.first_account()?;
        self.observe_account(&account.address);

        info!(wallet = self.wallet.name(), address = %account.address, "connected");
        self.events.emit(ProviderEvent::Connect(account.address.clone()));
        Ok(account.address)
    }

    async fn disconnect(&self) -> AdapterResult<()> {
        let feature = self
            .wallet
            .features()
            .disconnect()
            .map_err(|e| self.unsupported(e))?;

        feature.disconnect().await?;
        *self.last_address.lock().unwrap_or_else(|e| e.into_inner()) = None;

        info!(wallet = self.wallet.name(), "disconnected");
        self.events.emit(ProviderEvent::Disconnect);
        Ok(())
    }

    async fn sign_message(&self, message: &[u8]) -> AdapterResult<Vec<u8>> {
        let feature = self
            .wallet
            .features()
            .sign_message()
            .map_err(|e| self.unsupported(e))?;
        let account = self.account(SOLANA_SIGN_MESSAGE, None)?;

        debug!(wallet = self.wallet.name(), len = message.len(), "signMessage");
        let outputs = feature
            .sign_message(vec![SignMessageInput {
                account,
                message: message.to_vec(),
            }])
            .await?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.signature)
            .ok_or(AdapterError::EmptyResult("signMessage"))
    }

    async fn sign_transaction(
        &self,
        transaction: &SolanaTransaction,
    ) -> AdapterResult<SolanaTransaction> {
        let feature = self
            .wallet
            .features()
            .sign_transaction()
            .map_err(|e| self.unsupported(e))?;
        let chain = self.active_chain_name()?;
        let account = self.account(SOLANA_SIGN_TRANSACTION, Some(&chain))?;

        debug!(
            wallet = self.wallet.name(),
            %chain,
            versioned = transaction.is_versioned(),
            "signTransaction"
        );
        let outputs = feature
            .sign_transaction(vec![SignTransactionInput {
                account,
                transaction: transaction.serialize_unverified()?,
                chain: Some(chain),
            }])
            .await?;

        let output = outputs
            .into_iter()
            .next()
            .ok_or(AdapterError::EmptyResult("signTransaction"))?;
        Ok(transaction.decode_like(&output.signed_transaction)?)
    }

    async fn sign_and_send_transaction(
        &self,
        transaction: &SolanaTransaction,
        options: Option<SendOptions>,
    ) -> AdapterResult<String> {
        let feature = self
            .wallet
            .features()
            .sign_and_send_transaction()
            .map_err(|e| self.unsupported(e))?;
        let chain = self.active_chain_name()?;
        let account = self.account(SOLANA_SIGN_AND_SEND_TRANSACTION, Some(&chain))?;

        debug!(wallet = self.wallet.name(), %chain, "signAndSendTransaction");
        let outputs = feature
            .sign_and_send_transaction(vec![SignAndSendTransactionInput {
                account,
                transaction: transaction.serialize_unverified()?,
                chain,
                options: SendOptions::for_wallet(options),
            }])
            .await?;

        outputs
            .into_iter()
            .next()
            .map(|o| bs58::encode(o.signature).into_string())
            .ok_or(AdapterError::EmptyResult("signAndSendTransaction"))
    }

    async fn sign_all_transactions(
        &self,
        transactions: &[SolanaTransaction],
    ) -> AdapterResult<Vec<SolanaTransaction>> {
        let feature = self
            .wallet
            .features()
            .sign_transaction()
            .map_err(|e| self.unsupported(e))?;
        let chain = self.active_chain_name()?;
        let account = self.account(SOLANA_SIGN_TRANSACTION, Some(&chain))?;

        let inputs = transactions
            .iter()
            .map(|tx| -> AdapterResult<SignTransactionInput> {
                Ok(SignTransactionInput {
                    account: account.clone(),
                    transaction: tx.serialize_unverified()?,
                    chain: Some(chain.clone()),
                })
            })
            .collect::<AdapterResult<Vec<_>>>()?;

        debug!(wallet = self.wallet.name(), count = inputs.len(), "signAllTransactions");
        let outputs = feature.sign_transaction(inputs).await?;
        if outputs.len() != transactions.len() {
            return Err(AdapterError::Transport(format!(
                "expected {} signed transactions, got {}",
                transactions.len(),
                outputs.len()
            )));
        }

        transactions
            .iter()
            .zip(outputs)
            .map(|(tx, out)| {
                tx.decode_like(&out.signed_transaction)
                    .map_err(AdapterError::from)
            })
            .collect()
    }

    /// Wallet-standard has no network-switch feature: the host owns the
    /// active chain. This checks the wallet can act on the target chain and
    /// announces the change so the host can update its selection.
    async fn switch_network(&self, chain_id: &str) -> AdapterResult<()> {
        let chain =
            get_chain_by_id(chain_id).ok_or_else(|| AdapterError::UnknownChain(chain_id.into()))?;
        if !self
            .wallet
            .chains()
            .iter()
            .any(|c| c == chain.wallet_standard_chain)
        {
            return Err(AdapterError::UnknownChain(format!(
                "{} not supported by {}",
                chain.wallet_standard_chain,
                self.wallet.name()
            )));
        }

        info!(wallet = self.wallet.name(), chain = chain.chain_id, "switched network");
        self.events
            .emit(ProviderEvent::ChainChanged(chain.chain_id.to_string()));
        Ok(())
    }
}
