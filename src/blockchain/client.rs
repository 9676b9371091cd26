// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC connection to the EVM node hosting the contracts.

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use url::Url;

use super::error::BridgeError;
use super::wallet::WalletProvider;

/// Chain client: a read-only provider plus on-demand signing providers.
#[derive(Clone)]
pub struct ChainClient {
    rpc_url: Url,
    reader: DynProvider,
}

impl ChainClient {
    /// Create a new client for the given RPC endpoint.
    pub fn new(rpc_url: &Url) -> Self {
        let reader = ProviderBuilder::new()
            .connect_http(rpc_url.clone())
            .erased();
        Self {
            rpc_url: rpc_url.clone(),
            reader,
        }
    }

    /// Provider for view calls.
    pub fn reader(&self) -> DynProvider {
        self.reader.clone()
    }

    /// Provider that signs with the wallet's current account.
    ///
    /// Built per call so an account switch in the wallet takes effect on the
    /// next transaction.
    pub fn signing_provider(&self, wallet: &dyn WalletProvider) -> Result<DynProvider, BridgeError> {
        let signer = wallet.signer()?;
        Ok(ProviderBuilder::new()
            .wallet(signer)
            .connect_http(self.rpc_url.clone())
            .erased())
    }
}
