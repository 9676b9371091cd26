// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Workflows
//!
//! Each workflow is one user action: it validates local input, calls the
//! backend through [`BackendApi`], optionally calls a contract bridge, and
//! reports the outcome through the [`Notifier`].
//!
//! ## Consistency
//!
//! Admin election changes and votes write to two systems (backend database
//! and contract) with no transaction spanning both. A failure on the second
//! write is reported as a single warning and returned as
//! [`ChainSync::Pending`]; nothing is rolled back or retried.
//!
//! ## Modules
//!
//! - [`auth`] - login, register, logout
//! - [`wallet`] - wallet connect and link
//! - [`elections`] - browsing, live vote counts, results, vote history
//! - [`admin`] - election create/edit, candidate add/remove, stats
//! - [`voting`] - eligibility check, on-chain vote, vote recording
//! - [`governance`] - DPoS staking and delegates
//! - [`search`] - debounced candidate search

pub mod admin;
pub mod auth;
mod chain;
pub mod elections;
pub mod governance;
pub mod search;
pub mod voting;
pub mod wallet;

use std::sync::Arc;

use crate::blockchain::{
    BridgeError, ChainClient, EvmDposContract, EvmVotingContract, LocalKeyWallet, StakingBridge,
    VotingBridge, WalletProvider,
};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::gateway::BackendApi;
use crate::notify::Notifier;
use crate::session::{Session, SessionStore};

/// Outcome of the chain half of a dual write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainSync {
    /// Contract updated.
    Synced,
    /// Nothing to write on chain (e.g. status unchanged).
    Skipped,
    /// Backend updated but the contract was not; carries the failure text.
    Pending(String),
}

impl ChainSync {
    pub fn is_synced(&self) -> bool {
        !matches!(self, ChainSync::Pending(_))
    }
}

/// Everything a workflow talks to.
#[derive(Clone)]
pub struct ClientContext {
    pub api: BackendApi,
    pub store: SessionStore,
    pub voting: Option<Arc<dyn VotingBridge>>,
    pub staking: Option<Arc<dyn StakingBridge>>,
    pub wallet: Option<Arc<dyn WalletProvider>>,
    pub notifier: Arc<dyn Notifier>,
}

impl ClientContext {
    /// Wire up the backend, chain and wallet from configuration.
    ///
    /// Contracts without a configured address are left out; the workflows
    /// that need them report [`BridgeError::NotConfigured`].
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ClientError> {
        let wallet: Option<Arc<dyn WalletProvider>> = match config.wallet_key.as_deref() {
            Some(key) => Some(Arc::new(LocalKeyWallet::from_hex(key)?)),
            None => None,
        };

        let chain = ChainClient::new(&config.rpc_url);
        let voting = config.voting_contract.map(|address| {
            Arc::new(EvmVotingContract::new(address, chain.clone(), wallet.clone()))
                as Arc<dyn VotingBridge>
        });
        let staking = config.dpos_contract.map(|address| {
            Arc::new(EvmDposContract::new(address, chain.clone(), wallet.clone()))
                as Arc<dyn StakingBridge>
        });

        tracing::debug!(
            api_url = %config.api_url,
            rpc_url = %config.rpc_url,
            voting = voting.is_some(),
            staking = staking.is_some(),
            wallet = wallet.is_some(),
            "Client context ready"
        );

        Ok(Self {
            api: BackendApi::new(&config.api_url),
            store: SessionStore::new(config.session_file.clone()),
            voting,
            staking,
            wallet,
            notifier,
        })
    }

    /// Session persisted by the last login, or an empty one.
    pub fn load_session(&self) -> Result<Session, ClientError> {
        Ok(self.store.load()?)
    }

    pub(crate) fn voting(&self) -> Result<&dyn VotingBridge, BridgeError> {
        self.voting
            .as_deref()
            .ok_or(BridgeError::NotConfigured("voting contract"))
    }

    pub(crate) fn staking(&self) -> Result<&dyn StakingBridge, BridgeError> {
        self.staking
            .as_deref()
            .ok_or(BridgeError::NotConfigured("DPoS contract"))
    }
}

/// Reject the action when no token is present.
pub(crate) fn require_session(session: &Session) -> Result<(), ClientError> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(ClientError::Unauthenticated)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Recording stand-ins for the contract bridges and the wallet.

    use std::sync::Mutex;

    use alloy::primitives::{Address, U256};
    use alloy::network::EthereumWallet;
    use async_trait::async_trait;
    use tokio::sync::watch;

    use super::*;
    use crate::blockchain::{AccountSubscription, Delegate, TxHash};
    use crate::notify::NoticeLog;
    use crate::test_support::FakeBackend;

    pub const TX_HASH: TxHash = TxHash::repeat_byte(0xab);

    #[derive(Default)]
    pub struct FakeVoting {
        pub calls: Mutex<Vec<String>>,
        pub fail_with: Mutex<Option<BridgeError>>,
        pub votes: Mutex<Vec<((u64, u64), u64)>>,
    }

    impl FakeVoting {
        pub fn failing(err: BridgeError) -> Self {
            let fake = Self::default();
            *fake.fail_with.lock().unwrap() = Some(err);
            fake
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<TxHash, BridgeError> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(TX_HASH),
            }
        }
    }

    #[async_trait]
    impl VotingBridge for FakeVoting {
        async fn create_election(&self, election_id: u64) -> Result<TxHash, BridgeError> {
            self.record(format!("createElection({election_id})"))
        }

        async fn toggle_election_status(
            &self,
            election_id: u64,
            active: bool,
        ) -> Result<TxHash, BridgeError> {
            self.record(format!("toggleElectionStatus({election_id},{active})"))
        }

        async fn vote(&self, election_id: u64, candidate_id: u64) -> Result<TxHash, BridgeError> {
            self.record(format!("vote({election_id},{candidate_id})"))
        }

        async fn candidate_votes(&self, election_id: u64, candidate_id: u64) -> Result<u64, BridgeError> {
            self.votes
                .lock()
                .unwrap()
                .iter()
                .find(|(key, _)| *key == (election_id, candidate_id))
                .map(|(_, count)| *count)
                .ok_or_else(|| BridgeError::Rpc("no such candidate".into()))
        }
    }

    #[derive(Default)]
    pub struct FakeStaking {
        pub calls: Mutex<Vec<String>>,
        pub delegates: Mutex<Vec<Delegate>>,
        pub stake: Mutex<Option<U256>>,
    }

    impl FakeStaking {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StakingBridge for FakeStaking {
        async fn stake(&self, amount: U256) -> Result<TxHash, BridgeError> {
            self.calls.lock().unwrap().push(format!("stake({amount})"));
            Ok(TX_HASH)
        }

        async fn register_delegate(&self, name: &str) -> Result<TxHash, BridgeError> {
            self.calls.lock().unwrap().push(format!("registerDelegate({name})"));
            Ok(TX_HASH)
        }

        async fn vote_for_delegate(&self, delegate: Address) -> Result<TxHash, BridgeError> {
            self.calls.lock().unwrap().push(format!("voteForDelegate({delegate})"));
            Ok(TX_HASH)
        }

        async fn delegates(&self) -> Result<Vec<Delegate>, BridgeError> {
            Ok(self.delegates.lock().unwrap().clone())
        }

        async fn stake_of(&self, _account: Address) -> Result<U256, BridgeError> {
            (*self.stake.lock().unwrap()).ok_or_else(|| BridgeError::Rpc("node down".into()))
        }
    }

    /// Wallet with a fixed account list that cannot sign.
    pub struct FakeWallet {
        accounts: watch::Sender<Vec<Address>>,
    }

    impl FakeWallet {
        pub fn with_accounts(accounts: Vec<Address>) -> Self {
            Self {
                accounts: watch::Sender::new(accounts),
            }
        }
    }

    #[async_trait]
    impl WalletProvider for FakeWallet {
        async fn request_accounts(&self) -> Result<Vec<Address>, BridgeError> {
            Ok(self.accounts.borrow().clone())
        }

        fn signer(&self) -> Result<EthereumWallet, BridgeError> {
            Err(BridgeError::WalletUnavailable)
        }

        fn subscribe(&self) -> AccountSubscription {
            AccountSubscription::new(self.accounts.subscribe())
        }
    }

    pub struct Harness {
        pub backend: FakeBackend,
        pub notices: Arc<NoticeLog>,
        pub ctx: ClientContext,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        pub async fn new() -> Self {
            let backend = FakeBackend::start().await;
            let notices = Arc::new(NoticeLog::new());
            let dir = tempfile::tempdir().unwrap();
            let ctx = ClientContext {
                api: backend.api(),
                store: SessionStore::new(dir.path().join("session.json")),
                voting: None,
                staking: None,
                wallet: None,
                notifier: notices.clone(),
            };
            Self {
                backend,
                notices,
                ctx,
                _dir: dir,
            }
        }

        pub fn with_voting(mut self, voting: Arc<FakeVoting>) -> Self {
            self.ctx.voting = Some(voting);
            self
        }

        pub fn with_staking(mut self, staking: Arc<FakeStaking>) -> Self {
            self.ctx.staking = Some(staking);
            self
        }

        pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
            self.ctx.wallet = Some(wallet);
            self
        }
    }

    pub fn signed_in() -> Session {
        let mut session = Session::default();
        session.begin("tok".into(), None);
        session
    }
}
