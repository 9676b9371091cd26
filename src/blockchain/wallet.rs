// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider abstraction and account-change subscriptions.
//!
//! A [`WalletProvider`] plays the role of an injected browser wallet: it hands
//! out accounts, signs transactions, and notifies subscribers when the
//! selected account changes. Subscriptions are explicit handles; dropping an
//! [`AccountListener`] unsubscribes it.

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use async_trait::async_trait;
use std::sync::RwLock;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::error::BridgeError;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for its accounts; the first one is the active account.
    async fn request_accounts(&self) -> Result<Vec<Address>, BridgeError>;

    /// Signing handle for the active account.
    fn signer(&self) -> Result<EthereumWallet, BridgeError>;

    /// Subscribe to changes of the account list.
    fn subscribe(&self) -> AccountSubscription;
}

/// Wallet backed by a private key held in process memory.
pub struct LocalKeyWallet {
    signer: RwLock<PrivateKeySigner>,
    accounts: watch::Sender<Vec<Address>>,
}

impl LocalKeyWallet {
    pub fn new(signer: PrivateKeySigner) -> Self {
        let (accounts, _) = watch::channel(vec![signer.address()]);
        Self {
            signer: RwLock::new(signer),
            accounts,
        }
    }

    /// Create a wallet from a hex private key (with or without `0x`).
    pub fn from_hex(private_key_hex: &str) -> Result<Self, BridgeError> {
        let key_bytes = alloy::hex::decode(private_key_hex.trim())
            .map_err(|e| BridgeError::InvalidPrivateKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| BridgeError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::new(signer))
    }

    pub fn address(&self) -> Address {
        self.current_signer().address()
    }

    /// Switch the active account and notify subscribers.
    pub fn switch_account(&self, signer: PrivateKeySigner) {
        let address = signer.address();
        *self.signer.write().unwrap_or_else(|p| p.into_inner()) = signer;
        self.accounts.send_replace(vec![address]);
        tracing::info!(account = %address, "Wallet account changed");
    }

    fn current_signer(&self) -> PrivateKeySigner {
        self.signer
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl WalletProvider for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, BridgeError> {
        Ok(vec![self.address()])
    }

    fn signer(&self) -> Result<EthereumWallet, BridgeError> {
        Ok(EthereumWallet::from(self.current_signer()))
    }

    fn subscribe(&self) -> AccountSubscription {
        AccountSubscription::new(self.accounts.subscribe())
    }
}

/// Receiving end of an account-change subscription.
pub struct AccountSubscription {
    rx: watch::Receiver<Vec<Address>>,
}

impl AccountSubscription {
    pub fn new(rx: watch::Receiver<Vec<Address>>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> Vec<Address> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the wallet is gone.
    pub async fn changed(&mut self) -> Option<Vec<Address>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Run `on_change` for every change until the returned listener is dropped.
    pub fn listen<F>(mut self, mut on_change: F) -> AccountListener
    where
        F: FnMut(Vec<Address>) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    accounts = self.changed() => match accounts {
                        Some(accounts) => on_change(accounts),
                        None => break,
                    },
                }
            }
        });
        AccountListener {
            _guard: token.drop_guard(),
        }
    }
}

/// Live account-change listener; dropping it unsubscribes.
pub struct AccountListener {
    _guard: DropGuard,
}

impl AccountListener {
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;

    const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn signer(key: &str) -> PrivateKeySigner {
        PrivateKeySigner::from_slice(&alloy::hex::decode(key).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn request_accounts_returns_key_address() {
        let wallet = LocalKeyWallet::from_hex(KEY_0).unwrap();
        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(
            accounts,
            vec!["0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()]
        );
    }

    #[test]
    fn invalid_key_is_rejected() {
        assert!(matches!(
            LocalKeyWallet::from_hex("zz"),
            Err(BridgeError::InvalidPrivateKey(_))
        ));
    }

    #[tokio::test]
    async fn subscription_sees_account_switch() {
        let wallet = LocalKeyWallet::from_hex(KEY_0).unwrap();
        let mut subscription = wallet.subscribe();

        wallet.switch_account(signer(KEY_1));

        let accounts = subscription.changed().await.unwrap();
        assert_eq!(accounts, vec![signer(KEY_1).address()]);
        assert_eq!(wallet.address(), signer(KEY_1).address());
    }

    #[tokio::test]
    async fn dropping_listener_unsubscribes() {
        let wallet = LocalKeyWallet::from_hex(KEY_0).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listener = wallet.subscribe().listen(move |accounts| {
            let _ = tx.send(accounts);
        });

        wallet.switch_account(signer(KEY_1));
        let seen = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(seen, Some(vec![signer(KEY_1).address()]));

        listener.unsubscribe();
        wallet.switch_account(signer(KEY_0));

        // The listener task exits and drops its sender, closing the channel.
        let after = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(after, None);
    }
}
