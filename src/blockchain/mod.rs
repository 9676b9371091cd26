// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract bridge to the EVM chain.
//!
//! This module provides:
//! - The election voting contract (create, toggle, vote, live vote counts)
//! - The DPoS governance contract (stake, register/vote delegates, reads)
//! - The wallet provider that signs transactions and reports account changes

pub mod client;
pub mod dpos;
pub mod error;
pub mod types;
pub mod voting;
pub mod wallet;

pub use client::ChainClient;
pub use dpos::{EvmDposContract, StakingBridge};
pub use error::BridgeError;
pub use types::*;
pub use voting::{EvmVotingContract, VotingBridge};
pub use wallet::{AccountListener, AccountSubscription, LocalKeyWallet, WalletProvider};
