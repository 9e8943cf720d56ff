//! WalletStandardProvider against a recording wallet-standard mock.

mod common;

use std::sync::{Arc, Mutex};

use chain_sol::SolanaTransaction;
use common::*;
use wallet_adapter::types::{WalletAccount, SOLANA_DEVNET, SOLANA_MAINNET, SOLANA_TESTNET};
use wallet_adapter::wallet_standard::features::*;
use wallet_adapter::{
    AdapterError, Commitment, EventKind, Listener, ProviderEvent, ProviderType, SendOptions,
    SolanaProvider, WalletStandardProvider,
};

fn provider() -> (Arc<MockWallet>, WalletStandardProvider) {
    let wallet = MockWallet::new();
    let provider = WalletStandardProvider::new(wallet.clone(), active_chain(SOLANA_MAINNET));
    (wallet, provider)
}

fn record_events(provider: &WalletStandardProvider, kind: EventKind) -> Arc<Mutex<Vec<ProviderEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    provider.on(kind, move |e| sink.lock().unwrap().push(e.clone()));
    seen
}

#[test]
fn describes_the_wallet() {
    let (_, provider) = provider();
    assert_eq!(provider.name(), "Mock Wallet");
    assert_eq!(provider.provider_type(), ProviderType::Announced);
    assert_eq!(provider.public_key(), Some(wallet_address()));

    let chains = provider.chains();
    assert_eq!(chains, vec![SOLANA_MAINNET, SOLANA_DEVNET]);
}

#[tokio::test]
async fn connect_calls_the_feature_and_emits() {
    let (wallet, provider) = provider();
    let connected = record_events(&provider, EventKind::Connect);

    let address = provider.connect().await.unwrap();

    assert_eq!(address, wallet_address());
    assert_eq!(wallet.recorder.connect_calls.lock().unwrap().len(), 1);
    assert_eq!(
        *connected.lock().unwrap(),
        vec![ProviderEvent::Connect(wallet_address())]
    );
}

#[tokio::test]
async fn disconnect_calls_the_feature_and_emits() {
    let (wallet, provider) = provider();
    let disconnected = record_events(&provider, EventKind::Disconnect);

    provider.disconnect().await.unwrap();

    assert_eq!(*wallet.recorder.disconnect_calls.lock().unwrap(), 1);
    assert_eq!(*disconnected.lock().unwrap(), vec![ProviderEvent::Disconnect]);
}

#[tokio::test]
async fn sign_message_forwards_bytes_and_first_account() {
    let (wallet, provider) = provider();
    let message = [1u8, 2, 3, 4, 5];

    let signature = provider.sign_message(&message).await.unwrap();

    let calls = wallet.recorder.sign_message_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    assert_eq!(calls[0][0].message, message.to_vec());
    assert_eq!(calls[0][0].account, wallet.account());
    assert_eq!(signature.len(), 64);
}

#[tokio::test]
async fn sign_legacy_transaction() {
    let (wallet, provider) = provider();
    let tx = mock_legacy_transaction();

    let signed = provider.sign_transaction(&tx).await.unwrap();

    {
        let calls = wallet.recorder.sign_transaction_calls.lock().unwrap();
        let input = &calls[0][0];
        assert_eq!(input.transaction, tx.serialize_unverified().unwrap());
        assert_eq!(input.chain.as_deref(), Some("solana:mainnet"));
        assert_eq!(input.account, wallet.account());
    }

    match signed {
        SolanaTransaction::Legacy(signed) => assert!(signed.is_fully_signed()),
        other => panic!("expected legacy, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_versioned_transaction() {
    let (wallet, provider) = provider();
    let tx = mock_versioned_transaction();

    let signed = provider.sign_transaction(&tx).await.unwrap();

    let calls = wallet.recorder.sign_transaction_calls.lock().unwrap();
    let input = &calls[0][0];
    assert_eq!(input.transaction, tx.serialize_unverified().unwrap());
    assert_eq!(input.transaction[65], 0x80, "v0 prefix follows one signature slot");
    assert_eq!(input.chain.as_deref(), Some("solana:mainnet"));
    assert!(signed.is_versioned());
}

#[tokio::test]
async fn sign_transaction_uses_active_chain() {
    let wallet = MockWallet::new();
    let provider = WalletStandardProvider::new(wallet.clone(), active_chain(SOLANA_DEVNET));

    provider
        .sign_transaction(&mock_legacy_transaction())
        .await
        .unwrap();

    let calls = wallet.recorder.sign_transaction_calls.lock().unwrap();
    assert_eq!(calls[0][0].chain.as_deref(), Some("solana:devnet"));
}

#[tokio::test]
async fn sign_and_send_without_options_sends_defaults() {
    let (wallet, provider) = provider();
    let tx = mock_legacy_transaction();

    let signature = provider.sign_and_send_transaction(&tx, None).await.unwrap();

    assert_eq!(signature, bs58::encode([9u8; 64]).into_string());
    let calls = wallet.recorder.sign_and_send_calls.lock().unwrap();
    let input = &calls[0][0];
    assert_eq!(input.transaction, tx.serialize_unverified().unwrap());
    assert_eq!(input.chain, "solana:mainnet");
    assert_eq!(input.options, SendOptions::default());
}

#[tokio::test]
async fn sign_and_send_normalizes_commitment() {
    let (wallet, provider) = provider();
    let options = SendOptions {
        preflight_commitment: Some(Commitment::SingleGossip),
        max_retries: Some(3),
        skip_preflight: Some(true),
        min_context_slot: None,
    };

    provider
        .sign_and_send_transaction(&mock_versioned_transaction(), Some(options))
        .await
        .unwrap();

    let calls = wallet.recorder.sign_and_send_calls.lock().unwrap();
    let sent = calls[0][0].options;
    assert_eq!(sent.preflight_commitment, Some(Commitment::Confirmed));
    assert_eq!(sent.max_retries, Some(3));
    assert_eq!(sent.skip_preflight, Some(true));
    assert_eq!(sent.min_context_slot, None);
}

#[tokio::test]
async fn sign_all_sends_one_batch() {
    let (wallet, provider) = provider();
    let txs = vec![mock_legacy_transaction(), mock_versioned_transaction()];

    let signed = provider.sign_all_transactions(&txs).await.unwrap();

    let calls = wallet.recorder.sign_transaction_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 2);
    assert!(!signed[0].is_versioned());
    assert!(signed[1].is_versioned());
}

#[tokio::test]
async fn missing_features_are_reported() {
    let (wallet, provider) = provider();
    wallet.clear_features();
    let tx = mock_legacy_transaction();

    let cases = [
        (provider.connect().await.map(|_| ()), STANDARD_CONNECT),
        (provider.disconnect().await, STANDARD_DISCONNECT),
        (
            provider.sign_message(b"hi").await.map(|_| ()),
            SOLANA_SIGN_MESSAGE,
        ),
        (
            provider.sign_transaction(&tx).await.map(|_| ()),
            SOLANA_SIGN_TRANSACTION,
        ),
        (
            provider
                .sign_and_send_transaction(&tx, None)
                .await
                .map(|_| ()),
            SOLANA_SIGN_AND_SEND_TRANSACTION,
        ),
        (
            provider
                .sign_all_transactions(std::slice::from_ref(&tx))
                .await
                .map(|_| ()),
            SOLANA_SIGN_TRANSACTION,
        ),
    ];

    for (result, feature) in cases {
        assert_eq!(result, Err(AdapterError::FeatureNotSupported(feature.into())));
    }
}

#[tokio::test]
async fn feature_check_precedes_account_lookup() {
    let (wallet, provider) = provider();
    wallet.clear_features();
    wallet.accounts.lock().unwrap().clear();

    let err = provider.sign_message(b"hi").await.unwrap_err();
    assert!(err.is_unsupported());
}

#[tokio::test]
async fn no_account_is_reported() {
    let (wallet, provider) = provider();
    wallet.accounts.lock().unwrap().clear();

    assert_eq!(
        provider.sign_message(b"hi").await,
        Err(AdapterError::AccountNotFound)
    );
    assert_eq!(provider.public_key(), None);
}

#[tokio::test]
async fn switch_network_emits_chain_changed() {
    let (_, provider) = provider();
    let changed = record_events(&provider, EventKind::ChainChanged);

    provider.switch_network(SOLANA_DEVNET.chain_id).await.unwrap();

    assert_eq!(
        *changed.lock().unwrap(),
        vec![ProviderEvent::ChainChanged(SOLANA_DEVNET.chain_id.into())]
    );
}

#[tokio::test]
async fn switch_network_rejects_unsupported_chain() {
    let (_, provider) = provider();
    let changed = record_events(&provider, EventKind::ChainChanged);

    let err = provider
        .switch_network(SOLANA_TESTNET.chain_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::UnknownChain(_)));

    let err = provider.switch_network("not-a-chain").await.unwrap_err();
    assert!(matches!(err, AdapterError::UnknownChain(_)));
    assert!(changed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn removed_listener_is_not_called() {
    let (_, provider) = provider();
    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    let id = provider.on(EventKind::Disconnect, move |_| *sink.lock().unwrap() += 1);

    assert!(provider.remove_listener(id));
    provider.disconnect().await.unwrap();
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[tokio::test]
async fn empty_wallet_outputs_are_reported() {
    let (wallet, provider) = provider();
    wallet.script_signing(Script::Empty);
    let tx = mock_legacy_transaction();

    assert_eq!(
        provider.sign_message(b"hi").await,
        Err(AdapterError::EmptyResult("signMessage"))
    );
    assert_eq!(
        provider.sign_transaction(&tx).await,
        Err(AdapterError::EmptyResult("signTransaction"))
    );
    assert_eq!(
        provider.sign_and_send_transaction(&tx, None).await,
        Err(AdapterError::EmptyResult("signAndSendTransaction"))
    );
}

#[tokio::test]
async fn wallet_errors_propagate_unchanged() {
    let (wallet, provider) = provider();
    let rejected = AdapterError::Rejected("user declined".into());
    wallet.script_signing(Script::Fail(rejected.clone()));
    let tx = mock_versioned_transaction();

    assert_eq!(provider.sign_message(b"hi").await, Err(rejected.clone()));
    assert_eq!(provider.sign_transaction(&tx).await, Err(rejected.clone()));
    assert_eq!(
        provider.sign_and_send_transaction(&tx, None).await,
        Err(rejected.clone())
    );
    assert_eq!(
        provider
            .sign_all_transactions(std::slice::from_ref(&tx))
            .await,
        Err(rejected)
    );
}

#[tokio::test]
async fn sign_all_rejects_short_output() {
    let (wallet, provider) = provider();
    wallet.script_signing(Script::DropLast);
    let txs = vec![mock_legacy_transaction(), mock_versioned_transaction()];

    assert_eq!(
        provider.sign_all_transactions(&txs).await,
        Err(AdapterError::Transport(
            "expected 2 signed transactions, got 1".into()
        ))
    );
}

#[tokio::test]
async fn account_switch_in_wallet_emits_account_changed() {
    let (wallet, provider) = provider();
    let changed = record_events(&provider, EventKind::AccountChanged);
    provider.connect().await.unwrap();

    let other = WalletAccount::new([0x77; 32]);
    wallet.set_account(other.clone());
    provider.sign_message(b"first").await.unwrap();
    provider.sign_message(b"second").await.unwrap();

    assert_eq!(
        *changed.lock().unwrap(),
        vec![ProviderEvent::AccountChanged(other.address)]
    );
}

#[tokio::test]
async fn reconnect_after_disconnect_is_not_an_account_change() {
    let (wallet, provider) = provider();
    let changed = record_events(&provider, EventKind::AccountChanged);

    provider.connect().await.unwrap();
    provider.disconnect().await.unwrap();
    wallet.set_account(WalletAccount::new([0x77; 32]));
    provider.connect().await.unwrap();

    assert!(changed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn account_without_feature_is_unsupported() {
    let (wallet, provider) = provider();
    wallet.set_account(WalletAccount::new(wallet_pubkey()).with_features(&[STANDARD_CONNECT]));

    assert_eq!(
        provider.sign_message(b"hi").await,
        Err(AdapterError::FeatureNotSupported(SOLANA_SIGN_MESSAGE.into()))
    );
    assert!(wallet.recorder.sign_message_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn account_outside_active_chain_is_rejected() {
    let wallet = MockWallet::new();
    wallet.set_account(WalletAccount::new(wallet_pubkey()).with_chains(&["solana:mainnet"]));
    let provider = WalletStandardProvider::new(wallet.clone(), active_chain(SOLANA_DEVNET));

    let err = provider
        .sign_transaction(&mock_legacy_transaction())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::UnknownChain(_)));
    assert!(wallet.recorder.sign_transaction_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn listeners_register_through_dyn_provider() {
    let wallet = MockWallet::new();
    let provider: Arc<dyn SolanaProvider> =
        Arc::new(WalletStandardProvider::new(wallet, active_chain(SOLANA_MAINNET)));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener: Listener = Arc::new(move |e: &ProviderEvent| sink.lock().unwrap().push(e.clone()));

    let id = provider.add_listener(EventKind::Disconnect, listener);
    provider.disconnect().await.unwrap();
    assert!(provider.remove_listener(id));

    assert_eq!(*seen.lock().unwrap(), vec![ProviderEvent::Disconnect]);
}
