//! Recording mocks shared by the adapter integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chain_sol::{
    build_sol_transfer, LegacyTransaction, MessageV0, SolanaTransaction, VersionedMessage,
    VersionedTransaction,
};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::json;
use wallet_adapter::auth::frame::{
    EmailConnectAction, FrameRequest, FrameSession, FrameTransport, SocialProvider,
};
use wallet_adapter::provider::ActiveChainFn;
use wallet_adapter::types::{ChainDescriptor, WalletAccount, SOLANA_DEVNET, SOLANA_MAINNET};
use wallet_adapter::wallet_standard::features::*;
use wallet_adapter::wallet_standard::StandardWallet;
use wallet_adapter::{AdapterError, AdapterResult, PayloadEncoding};

pub const WALLET_SEED: [u8; 32] = [0x42; 32];

pub fn chains() -> Vec<ChainDescriptor> {
    vec![SOLANA_MAINNET, SOLANA_DEVNET]
}

pub fn active_chain(chain: ChainDescriptor) -> ActiveChainFn {
    Arc::new(move || Some(chain))
}

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&WALLET_SEED)
}

pub fn wallet_pubkey() -> [u8; 32] {
    signing_key().verifying_key().to_bytes()
}

pub fn wallet_address() -> String {
    chain_sol::bytes_to_address(&wallet_pubkey())
}

// ─── Transactions ────────────────────────────────────────────────────

pub fn mock_legacy_transaction() -> SolanaTransaction {
    let message = build_sol_transfer(&wallet_pubkey(), &[0xBB; 32], 1_000_000, &[0xCC; 32])
        .expect("transfer");
    LegacyTransaction::new(message).into()
}

pub fn mock_versioned_transaction() -> SolanaTransaction {
    let message = build_sol_transfer(&wallet_pubkey(), &[0xBB; 32], 1_000_000, &[0xCC; 32])
        .expect("transfer");
    VersionedTransaction::new(VersionedMessage::V0(MessageV0::from_legacy(message))).into()
}

/// Sign raw wire bytes the way a wallet would. Both formats parse as a
/// versioned transaction, and re-serializing a legacy message keeps the
/// legacy layout.
pub fn wallet_sign_wire(bytes: &[u8]) -> Vec<u8> {
    let mut tx = VersionedTransaction::from_bytes(bytes).expect("wallet received valid tx");
    tx.sign(&WALLET_SEED).expect("wallet is a signer");
    tx.serialize().expect("serialize signed tx")
}

// ─── Wallet-standard mock ────────────────────────────────────────────

#[derive(Default)]
pub struct Recorder {
    pub connect_calls: Mutex<Vec<ConnectInput>>,
    pub disconnect_calls: Mutex<usize>,
    pub sign_message_calls: Mutex<Vec<Vec<SignMessageInput>>>,
    pub sign_transaction_calls: Mutex<Vec<Vec<SignTransactionInput>>>,
    pub sign_and_send_calls: Mutex<Vec<Vec<SignAndSendTransactionInput>>>,
}

pub struct RecordingFeatures {
    recorder: Arc<Recorder>,
    accounts: Vec<WalletAccount>,
}

#[async_trait]
impl ConnectFeature for RecordingFeatures {
    async fn connect(&self, input: ConnectInput) -> AdapterResult<ConnectOutput> {
        self.recorder.connect_calls.lock().unwrap().push(input);
        Ok(ConnectOutput {
            accounts: self.accounts.clone(),
        })
    }
}

#[async_trait]
impl DisconnectFeature for RecordingFeatures {
    async fn disconnect(&self) -> AdapterResult<()> {
        *self.recorder.disconnect_calls.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl SignMessageFeature for RecordingFeatures {
    async fn sign_message(
        &self,
        inputs: Vec<SignMessageInput>,
    ) -> AdapterResult<Vec<SignMessageOutput>> {
        self.recorder
            .sign_message_calls
            .lock()
            .unwrap()
            .push(inputs.clone());
        Ok(inputs
            .into_iter()
            .map(|i| SignMessageOutput {
                signature: signing_key().sign(&i.message).to_bytes().to_vec(),
                signed_message: i.message,
            })
            .collect())
    }
}

#[async_trait]
impl SignTransactionFeature for RecordingFeatures {
    async fn sign_transaction(
        &self,
        inputs: Vec<SignTransactionInput>,
    ) -> AdapterResult<Vec<SignTransactionOutput>> {
        self.recorder
            .sign_transaction_calls
            .lock()
            .unwrap()
            .push(inputs.clone());
        Ok(inputs
            .iter()
            .map(|i| SignTransactionOutput {
                signed_transaction: wallet_sign_wire(&i.transaction),
            })
            .collect())
    }
}

#[async_trait]
impl SignAndSendTransactionFeature for RecordingFeatures {
    async fn sign_and_send_transaction(
        &self,
        inputs: Vec<SignAndSendTransactionInput>,
    ) -> AdapterResult<Vec<SignAndSendTransactionOutput>> {
        self.recorder
            .sign_and_send_calls
            .lock()
            .unwrap()
            .push(inputs.clone());
        Ok(inputs
            .iter()
            .map(|_| SignAndSendTransactionOutput {
                signature: vec![9u8; 64],
            })
            .collect())
    }
}

pub struct MockWallet {
    pub recorder: Arc<Recorder>,
    pub accounts: Mutex<Vec<WalletAccount>>,
    pub features: Mutex<WalletFeatures>,
    pub chains: Vec<String>,
}

impl MockWallet {
    pub fn new() -> Arc<Self> {
        let account = WalletAccount::new(wallet_pubkey())
            .with_chains(&["solana:mainnet", "solana:devnet"])
            .with_features(&[
                STANDARD_CONNECT,
                STANDARD_DISCONNECT,
                SOLANA_SIGN_MESSAGE,
                SOLANA_SIGN_TRANSACTION,
                SOLANA_SIGN_AND_SEND_TRANSACTION,
            ]);
        let recorder = Arc::new(Recorder::default());
        let impls = Arc::new(RecordingFeatures {
            recorder: Arc::clone(&recorder),
            accounts: vec![account.clone()],
        });

        let features = WalletFeatures {
            connect: Some(impls.clone()),
            disconnect: Some(impls.clone()),
            sign_message: Some(impls.clone()),
            sign_transaction: Some(impls.clone()),
            sign_and_send_transaction: Some(impls),
        };

        Arc::new(Self {
            recorder,
            accounts: Mutex::new(vec![account]),
            features: Mutex::new(features),
            chains: vec!["solana:mainnet".into(), "solana:devnet".into()],
        })
    }

    pub fn clear_features(&self) {
        *self.features.lock().unwrap() = WalletFeatures::default();
    }

    /// Replace every signing feature with one that answers `script`.
    pub fn script_signing(&self, script: Script) {
        let scripted = Arc::new(ScriptedFeatures { script });
        let mut features = self.features.lock().unwrap();
        features.sign_message = Some(scripted.clone());
        features.sign_transaction = Some(scripted.clone());
        features.sign_and_send_transaction = Some(scripted);
    }

    pub fn set_account(&self, account: WalletAccount) {
        *self.accounts.lock().unwrap() = vec![account];
    }

    pub fn account(&self) -> WalletAccount {
        self.accounts.lock().unwrap()[0].clone()
    }
}

impl StandardWallet for MockWallet {
    fn name(&self) -> &str {
        "Mock Wallet"
    }

    fn chains(&self) -> Vec<String> {
        self.chains.clone()
    }

    fn accounts(&self) -> Vec<WalletAccount> {
        self.accounts.lock().unwrap().clone()
    }

    fn features(&self) -> WalletFeatures {
        self.features.lock().unwrap().clone()
    }
}

/// Canned behavior for signing features.
#[derive(Debug, Clone)]
pub enum Script {
    /// Every call returns no outputs.
    Empty,
    /// Every call fails with this error.
    Fail(AdapterError),
    /// Signs like a wallet but drops the last output.
    DropLast,
}

pub struct ScriptedFeatures {
    script: Script,
}

impl ScriptedFeatures {
    fn answer<I, O>(&self, inputs: Vec<I>, sign: impl Fn(&I) -> O) -> AdapterResult<Vec<O>> {
        match &self.script {
            Script::Empty => Ok(Vec::new()),
            Script::Fail(err) => Err(err.clone()),
            Script::DropLast => {
                let mut outputs: Vec<O> = inputs.iter().map(sign).collect();
                outputs.pop();
                Ok(outputs)
            }
        }
    }
}

#[async_trait]
impl SignMessageFeature for ScriptedFeatures {
    async fn sign_message(
        &self,
        inputs: Vec<SignMessageInput>,
    ) -> AdapterResult<Vec<SignMessageOutput>> {
        self.answer(inputs, |i| SignMessageOutput {
            signed_message: i.message.clone(),
            signature: signing_key().sign(&i.message).to_bytes().to_vec(),
        })
    }
}

#[async_trait]
impl SignTransactionFeature for ScriptedFeatures {
    async fn sign_transaction(
        &self,
        inputs: Vec<SignTransactionInput>,
    ) -> AdapterResult<Vec<SignTransactionOutput>> {
        self.answer(inputs, |i| SignTransactionOutput {
            signed_transaction: wallet_sign_wire(&i.transaction),
        })
    }
}

#[async_trait]
impl SignAndSendTransactionFeature for ScriptedFeatures {
    async fn sign_and_send_transaction(
        &self,
        inputs: Vec<SignAndSendTransactionInput>,
    ) -> AdapterResult<Vec<SignAndSendTransactionOutput>> {
        self.answer(inputs, |_| SignAndSendTransactionOutput {
            signature: vec![9u8; 64],
        })
    }
}

// ─── Frame transport mock ────────────────────────────────────────────

pub const SEND_SIGNATURE: &str = "5VERYfakeSignature";

pub struct MockFrame {
    pub encoding: PayloadEncoding,
    pub connects: Mutex<Vec<Option<String>>>,
    pub disconnects: Mutex<usize>,
    pub requests: Mutex<Vec<FrameRequest>>,
    pub switches: Mutex<Vec<String>>,
    pub otps: Mutex<Vec<String>>,
    pub fail_switch: bool,
    pub reject_requests: bool,
    pub short_batch: bool,
}

impl MockFrame {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(PayloadEncoding::Base58))
    }

    pub fn with_encoding(encoding: PayloadEncoding) -> Arc<Self> {
        Arc::new(Self::build(encoding))
    }

    pub fn failing_switch() -> Arc<Self> {
        Arc::new(Self {
            fail_switch: true,
            ..Self::build(PayloadEncoding::Base58)
        })
    }

    /// Every RPC request is rejected by the user.
    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject_requests: true,
            ..Self::build(PayloadEncoding::Base58)
        })
    }

    /// `solana_signAllTransactions` answers with one transaction too few.
    pub fn short_batch() -> Arc<Self> {
        Arc::new(Self {
            short_batch: true,
            ..Self::build(PayloadEncoding::Base58)
        })
    }

    fn build(encoding: PayloadEncoding) -> Self {
        Self {
            encoding,
            connects: Mutex::new(Vec::new()),
            disconnects: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
            switches: Mutex::new(Vec::new()),
            otps: Mutex::new(Vec::new()),
            fail_switch: false,
            reject_requests: false,
            short_batch: false,
        }
    }

    pub fn last_request(&self) -> FrameRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a request was sent")
    }

    fn session(&self, chain_id: Option<String>) -> FrameSession {
        FrameSession {
            address: wallet_address(),
            chain_id: chain_id.unwrap_or_else(|| SOLANA_MAINNET.chain_id.to_string()),
        }
    }

    fn sign_encoded_tx(&self, encoded: &str) -> String {
        let bytes = self.encoding.decode(encoded).expect("valid payload");
        self.encoding.encode(&wallet_sign_wire(&bytes))
    }
}

#[async_trait]
impl FrameTransport for MockFrame {
    async fn connect(&self, chain_id: Option<String>) -> AdapterResult<FrameSession> {
        self.connects.lock().unwrap().push(chain_id.clone());
        Ok(self.session(chain_id))
    }

    async fn disconnect(&self) -> AdapterResult<()> {
        *self.disconnects.lock().unwrap() += 1;
        Ok(())
    }

    async fn request(&self, request: FrameRequest) -> AdapterResult<serde_json::Value> {
        self.requests.lock().unwrap().push(request.clone());
        if self.reject_requests {
            return Err(AdapterError::Rejected("user rejected the request".into()));
        }
        let response = match request {
            FrameRequest::SignMessage { message, .. } => {
                let bytes = self.encoding.decode(&message)?;
                let signature = signing_key().sign(&bytes).to_bytes();
                json!({ "signature": self.encoding.encode(&signature) })
            }
            FrameRequest::SignTransaction { transaction } => {
                json!({ "transaction": self.sign_encoded_tx(&transaction) })
            }
            FrameRequest::SignAndSendTransaction { .. } => {
                json!({ "signature": SEND_SIGNATURE })
            }
            FrameRequest::SignAllTransactions { transactions } => {
                let mut signed: Vec<String> =
                    transactions.iter().map(|t| self.sign_encoded_tx(t)).collect();
                if self.short_batch {
                    signed.pop();
                }
                json!({ "transactions": signed })
            }
        };
        Ok(response)
    }

    async fn switch_network(&self, chain_id: &str) -> AdapterResult<()> {
        if self.fail_switch {
            return Err(AdapterError::Rejected("user rejected network switch".into()));
        }
        self.switches.lock().unwrap().push(chain_id.to_string());
        Ok(())
    }

    async fn get_email(&self) -> AdapterResult<Option<String>> {
        Ok(Some("user@example.com".into()))
    }

    async fn connect_email(&self, email: &str) -> AdapterResult<EmailConnectAction> {
        if email.ends_with("@example.com") {
            Ok(EmailConnectAction::VerifyOtp)
        } else {
            Ok(EmailConnectAction::VerifyDevice)
        }
    }

    async fn connect_otp(&self, otp: &str) -> AdapterResult<()> {
        self.otps.lock().unwrap().push(otp.to_string());
        Ok(())
    }

    async fn get_social_redirect_uri(&self, provider: SocialProvider) -> AdapterResult<String> {
        Ok(format!("https://auth.example.com/{provider:?}").to_lowercase())
    }

    async fn get_farcaster_uri(&self) -> AdapterResult<String> {
        Ok("https://warpcast.com/~/siwf?channelToken=abc".into())
    }

    async fn connect_social(&self, _uri: &str) -> AdapterResult<FrameSession> {
        Ok(self.session(None))
    }
}
