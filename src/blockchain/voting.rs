// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Election voting contract.
//!
//! Writes open a signing provider from the wallet, send one transaction and
//! wait for its receipt. There is no retry, no queueing of pending
//! transactions and no nonce management beyond what the provider fills in.

use std::sync::Arc;

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{DynProvider, PendingTransactionBuilder},
    sol,
};
use async_trait::async_trait;

use super::client::ChainClient;
use super::error::BridgeError;
use super::types::TxHash;
use super::wallet::WalletProvider;

sol! {
    #[sol(rpc)]
    interface IVotingSystem {
        function createElection(uint256 electionId) external;
        function toggleElectionStatus(uint256 electionId, bool isActive) external;
        function vote(uint256 electionId, uint256 candidateId) external;
        function getCandidateVotes(uint256 electionId, uint256 candidateId) external view returns (uint256);
    }
}

/// Operations of the election voting contract.
#[async_trait]
pub trait VotingBridge: Send + Sync {
    /// Register a backend election on chain.
    async fn create_election(&self, election_id: u64) -> Result<TxHash, BridgeError>;

    /// Set the on-chain active flag.
    async fn toggle_election_status(
        &self,
        election_id: u64,
        active: bool,
    ) -> Result<TxHash, BridgeError>;

    /// Cast a vote; the returned hash is what the backend stores.
    async fn vote(&self, election_id: u64, candidate_id: u64) -> Result<TxHash, BridgeError>;

    /// Live vote count for one candidate (view call, no signer).
    async fn candidate_votes(&self, election_id: u64, candidate_id: u64) -> Result<u64, BridgeError>;
}

/// [`VotingBridge`] over a deployed contract.
pub struct EvmVotingContract {
    address: Address,
    client: ChainClient,
    wallet: Option<Arc<dyn WalletProvider>>,
}

impl EvmVotingContract {
    pub fn new(address: Address, client: ChainClient, wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            address,
            client,
            wallet,
        }
    }

    fn writer(&self) -> Result<IVotingSystem::IVotingSystemInstance<DynProvider>, BridgeError> {
        let wallet = self.wallet.as_deref().ok_or(BridgeError::WalletUnavailable)?;
        let provider = self.client.signing_provider(wallet)?;
        Ok(IVotingSystem::new(self.address, provider))
    }
}

#[async_trait]
impl VotingBridge for EvmVotingContract {
    async fn create_election(&self, election_id: u64) -> Result<TxHash, BridgeError> {
        let contract = self.writer()?;
        tracing::info!(election_id, "Creating election on chain");
        let pending = contract
            .createElection(U256::from(election_id))
            .send()
            .await
            .map_err(BridgeError::from_contract)?;
        confirm(pending, "createElection").await
    }

    async fn toggle_election_status(
        &self,
        election_id: u64,
        active: bool,
    ) -> Result<TxHash, BridgeError> {
        let contract = self.writer()?;
        let pending = contract
            .toggleElectionStatus(U256::from(election_id), active)
            .send()
            .await
            .map_err(BridgeError::from_contract)?;
        confirm(pending, "toggleElectionStatus").await
    }

    async fn vote(&self, election_id: u64, candidate_id: u64) -> Result<TxHash, BridgeError> {
        let contract = self.writer()?;
        tracing::info!(election_id, candidate_id, "Voting on chain");
        let pending = contract
            .vote(U256::from(election_id), U256::from(candidate_id))
            .send()
            .await
            .map_err(BridgeError::from_contract)?;
        confirm(pending, "vote").await
    }

    async fn candidate_votes(&self, election_id: u64, candidate_id: u64) -> Result<u64, BridgeError> {
        let contract = IVotingSystem::new(self.address, self.client.reader());
        let count: U256 = contract
            .getCandidateVotes(U256::from(election_id), U256::from(candidate_id))
            .call()
            .await
            .map_err(BridgeError::from_contract)?;
        Ok(count.saturating_to::<u64>())
    }
}

/// Wait until the transaction is mined; a failed receipt counts as a revert
/// without a reason.
pub(crate) async fn confirm(
    pending: PendingTransactionBuilder<Ethereum>,
    method: &'static str,
) -> Result<TxHash, BridgeError> {
    let tx_hash = *pending.tx_hash();
    tracing::info!(method, tx_hash = %tx_hash, "Transaction sent, awaiting confirmation");

    let receipt = pending
        .get_receipt()
        .await
        .map_err(BridgeError::from_pending)?;

    if !receipt.status() {
        tracing::warn!(method, tx_hash = %tx_hash, "Transaction reverted");
        return Err(BridgeError::Reverted { reason: None });
    }

    tracing::info!(
        method,
        tx_hash = %receipt.transaction_hash,
        block_number = ?receipt.block_number,
        "Transaction confirmed"
    );
    Ok(receipt.transaction_hash)
}
