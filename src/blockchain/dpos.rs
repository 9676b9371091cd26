// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Delegated proof-of-stake governance contract.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    sol,
};
use async_trait::async_trait;

use super::client::ChainClient;
use super::error::BridgeError;
use super::types::{Delegate, TxHash};
use super::voting::confirm;
use super::wallet::WalletProvider;

sol! {
    #[sol(rpc)]
    interface IDPoS {
        struct DelegateInfo {
            address wallet;
            string name;
            uint256 totalVotes;
        }

        function stake() external payable;
        function registerDelegate(string name) external;
        function voteForDelegate(address delegate) external;
        function getAllDelegates() external view returns (DelegateInfo[] memory);
        function stakes(address account) external view returns (uint256);
    }
}

/// Operations of the DPoS contract.
#[async_trait]
pub trait StakingBridge: Send + Sync {
    /// Stake `amount` wei from the active account.
    async fn stake(&self, amount: U256) -> Result<TxHash, BridgeError>;

    async fn register_delegate(&self, name: &str) -> Result<TxHash, BridgeError>;

    async fn vote_for_delegate(&self, delegate: Address) -> Result<TxHash, BridgeError>;

    async fn delegates(&self) -> Result<Vec<Delegate>, BridgeError>;

    /// Stake held by `account`, in wei.
    async fn stake_of(&self, account: Address) -> Result<U256, BridgeError>;
}

/// [`StakingBridge`] over a deployed contract.
pub struct EvmDposContract {
    address: Address,
    client: ChainClient,
    wallet: Option<Arc<dyn WalletProvider>>,
}

impl EvmDposContract {
    pub fn new(address: Address, client: ChainClient, wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            address,
            client,
            wallet,
        }
    }

    fn writer(&self) -> Result<IDPoS::IDPoSInstance<DynProvider>, BridgeError> {
        let wallet = self.wallet.as_deref().ok_or(BridgeError::WalletUnavailable)?;
        let provider = self.client.signing_provider(wallet)?;
        Ok(IDPoS::new(self.address, provider))
    }

    fn reader(&self) -> IDPoS::IDPoSInstance<DynProvider> {
        IDPoS::new(self.address, self.client.reader())
    }
}

#[async_trait]
impl StakingBridge for EvmDposContract {
    async fn stake(&self, amount: U256) -> Result<TxHash, BridgeError> {
        let contract = self.writer()?;
        let pending = contract
            .stake()
            .value(amount)
            .send()
            .await
            .map_err(BridgeError::from_contract)?;
        confirm(pending, "stake").await
    }

    async fn register_delegate(&self, name: &str) -> Result<TxHash, BridgeError> {
        let contract = self.writer()?;
        let pending = contract
            .registerDelegate(name.to_string())
            .send()
            .await
            .map_err(BridgeError::from_contract)?;
        confirm(pending, "registerDelegate").await
    }

    async fn vote_for_delegate(&self, delegate: Address) -> Result<TxHash, BridgeError> {
        let contract = self.writer()?;
        let pending = contract
            .voteForDelegate(delegate)
            .send()
            .await
            .map_err(BridgeError::from_contract)?;
        confirm(pending, "voteForDelegate").await
    }

    async fn delegates(&self) -> Result<Vec<Delegate>, BridgeError> {
        let infos: Vec<IDPoS::DelegateInfo> = self
            .reader()
            .getAllDelegates()
            .call()
            .await
            .map_err(BridgeError::from_contract)?;
        Ok(infos
            .into_iter()
            .map(|info| Delegate {
                wallet: info.wallet,
                name: info.name,
                total_votes: info.totalVotes,
            })
            .collect())
    }

    async fn stake_of(&self, account: Address) -> Result<U256, BridgeError> {
        self.reader()
            .stakes(account)
            .call()
            .await
            .map_err(BridgeError::from_contract)
    }
}
