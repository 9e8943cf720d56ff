use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chain_sol::SolanaTransaction;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::frame::{
    EmailConnectAction, FrameRequest, FrameSession, FrameTransport, SignatureResponse,
    SocialProvider, TransactionResponse, TransactionsResponse,
};
use super::AuthOptions;
use crate::encoding::PayloadEncoding;
use crate::error::{AdapterError, AdapterResult};
use crate::events::{EventEmitter, ProviderEvent};
use crate::options::SendOptions;
use crate::provider::{ActiveChainFn, SolanaProvider};
use crate::types::{ChainDescriptor, ProviderType};

pub const AUTH_PROVIDER_NAME: &str = "Email";

/// Drives the embedded auth wallet over its request/response channel.
///
/// Payloads are string-encoded (base58 unless configured otherwise) and
/// send options are forwarded as given.
pub struct AuthProvider {
    transport: Arc<dyn FrameTransport>,
    auth: AuthOptions,
    chains: Vec<ChainDescriptor>,
    get_active_chain: ActiveChainFn,
    encoding: PayloadEncoding,
    session: RwLock<Option<FrameSession>>,
    events: EventEmitter,
}

impl AuthProvider {
    pub fn new(
        transport: Arc<dyn FrameTransport>,
        auth: AuthOptions,
        chains: Vec<ChainDescriptor>,
        get_active_chain: ActiveChainFn,
    ) -> Self {
        Self {
            transport,
            auth,
            chains,
            get_active_chain,
            encoding: PayloadEncoding::default(),
            session: RwLock::new(None),
            events: EventEmitter::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn auth_options(&self) -> &AuthOptions {
        &self.auth
    }

    /// The current session, if connected.
    pub fn session(&self) -> Option<FrameSession> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_session(&self, session: Option<FrameSession>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    fn require_email(&self) -> AdapterResult<()> {
        if self.auth.email {
            Ok(())
        } else {
            Err(AdapterError::AuthMethodDisabled("email".into()))
        }
    }

    fn require_social(&self, provider: SocialProvider) -> AdapterResult<()> {
        if self.auth.socials.contains(&provider) {
            Ok(())
        } else {
            Err(AdapterError::AuthMethodDisabled(format!("{provider:?}").to_lowercase()))
        }
    }

    fn encode_transaction(&self, transaction: &SolanaTransaction) -> AdapterResult<String> {
        Ok(self.encoding.encode(&transaction.serialize_unverified()?))
    }

    async fn call<T: DeserializeOwned>(&self, request: FrameRequest) -> AdapterResult<T> {
        let method = request.method();
        debug!(method, "frame request");
        let value = self.transport.request(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn start_session(&self, session: FrameSession) -> String {
        info!(address = %session.address, chain = %session.chain_id, "auth session started");
        let address = session.address.clone();
        self.set_session(Some(session));
        self.events.emit(ProviderEvent::Connect(address.clone()));
        address
    }

    // ─── Auth-specific operations ────────────────────────────────────

    pub async fn get_email(&self) -> AdapterResult<Option<String>> {
        self.transport.get_email().await
    }

    /// Start an email login; the returned action tells the UI what the user
    /// has to do next.
    pub async fn connect_email(&self, email: &str) -> AdapterResult<EmailConnectAction> {
        self.require_email()?;
        self.transport.connect_email(email).await
    }

    pub async fn connect_otp(&self, otp: &str) -> AdapterResult<()> {
        self.require_email()?;
        self.transport.connect_otp(otp).await
    }

    pub async fn get_social_redirect_uri(&self, provider: SocialProvider) -> AdapterResult<String> {
        self.require_social(provider)?;
        self.transport.get_social_redirect_uri(provider).await
    }

    pub async fn get_farcaster_uri(&self) -> AdapterResult<String> {
        self.require_social(SocialProvider::Farcaster)?;
        self.transport.get_farcaster_uri().await
    }

    /// Finish a social login and start a session.
    pub async fn connect_social(&self, uri: &str) -> AdapterResult<String> {
        let session = self.transport.connect_social(uri).await?;
        Ok(self.start_session(session))
    }
}

#[async_trait]
impl SolanaProvider for AuthProvider {
    fn name(&self) -> &str {
        AUTH_PROVIDER_NAME
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Auth
    }

    fn public_key(&self) -> Option<String> {
        self.session().map(|s| s.address)
    }

    fn chains(&self) -> Vec<ChainDescriptor> {
        self.chains.clone()
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }

    async fn connect(&self) -> AdapterResult<String> {
        let chain_id = (self.get_active_chain)().map(|c| c.chain_id.to_string());
        let session = self.transport.connect(chain_id).await?;
        Ok(self.start_session(session))
    }

    async fn disconnect(&self) -> AdapterResult<()> {
        self.transport.disconnect().await?;
        self.set_session(None);

        info!("auth session ended");
        self.events.emit(ProviderEvent::Disconnect);
        Ok(())
    }

    async fn sign_message(&self, message: &[u8]) -> AdapterResult<Vec<u8>> {
        let pubkey = self.public_key().ok_or(AdapterError::AccountNotFound)?;

        let response: SignatureResponse = self
            .call(FrameRequest::SignMessage {
                message: self.encoding.encode(message),
                pubkey,
            })
            .await?;
        self.encoding.decode(&response.signature)
    }

    async fn sign_transaction(
        &self,
        transaction: &SolanaTransaction,
    ) -> AdapterResult<SolanaTransaction> {
        let response: TransactionResponse = self
            .call(FrameRequest::SignTransaction {
                transaction: self.encode_transaction(transaction)?,
            })
            .await?;

        let bytes = self.encoding.decode(&response.transaction)?;
        Ok(transaction.decode_like(&bytes)?)
    }

    async fn sign_and_send_transaction(
        &self,
        transaction: &SolanaTransaction,
        options: Option<SendOptions>,
    ) -> AdapterResult<String> {
        let response: SignatureResponse = self
            .call(FrameRequest::SignAndSendTransaction {
                transaction: self.encode_transaction(transaction)?,
                options,
            })
            .await?;
        Ok(response.signature)
    }

    async fn sign_all_transactions(
        &self,
        transactions: &[SolanaTransaction],
    ) -> AdapterResult<Vec<SolanaTransaction>> {
        let encoded = transactions
            .iter()
            .map(|tx| self.encode_transaction(tx))
            .collect::<AdapterResult<Vec<_>>>()?;

        let response: TransactionsResponse = self
            .call(FrameRequest::SignAllTransactions {
                transactions: encoded,
            })
            .await?;

        if response.transactions.len() != transactions.len() {
            return Err(AdapterError::Transport(format!(
                "expected {} signed transactions, got {}",
                transactions.len(),
                response.transactions.len()
            )));
        }

        transactions
            .iter()
            .zip(&response.transactions)
            .map(|(tx, encoded)| {
                let bytes = self.encoding.decode(encoded)?;
                tx.decode_like(&bytes).map_err(AdapterError::from)
            })
            .collect()
    }

    async fn switch_network(&self, chain_id: &str) -> AdapterResult<()> {
        self.transport.switch_network(chain_id).await?;

        if let Some(session) = self
            .session
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .as_mut()
        {
            session.chain_id = chain_id.to_string();
        }

        info!(chain = chain_id, "auth wallet switched network");
        self.events
            .emit(ProviderEvent::ChainChanged(chain_id.to_string()));
        Ok(())
    }
}
