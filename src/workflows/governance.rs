// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DPoS governance: staking, delegate registration and delegate votes.
//!
//! These actions touch only the contract; the backend is not involved.

use alloy::primitives::Address;

use super::chain::report;
use super::ClientContext;
use crate::blockchain::{
    format_ether, parse_contract_address, parse_ether_amount, sort_delegates, Delegate, TxHash,
};
use crate::error::ClientError;
use crate::session::Session;

/// What the governance page shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GovernanceInfo {
    /// Heaviest delegate first.
    pub delegates: Vec<Delegate>,
    /// Own stake, formatted in ether; `"0"` when unknown.
    pub my_stake: String,
}

/// Stake `amount` ether (decimal string) from the wallet.
pub async fn stake(ctx: &ClientContext, amount: &str) -> Result<TxHash, ClientError> {
    let wei = match parse_ether_amount(amount) {
        Ok(wei) if !wei.is_zero() => wei,
        _ => {
            ctx.notifier.error("Enter a valid amount", None);
            return Err(ClientError::validation("Stake amount must be greater than zero"));
        }
    };

    let outcome = match ctx.staking() {
        Ok(staking) => staking.stake(wei).await,
        Err(e) => Err(e),
    };
    finish(ctx, outcome, &format!("Staked {} ETH", amount.trim()), "Staking failed")
}

pub async fn register_delegate(ctx: &ClientContext, name: &str) -> Result<TxHash, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        ctx.notifier.error("Enter a name", None);
        return Err(ClientError::validation("Delegate name is required"));
    }

    let outcome = match ctx.staking() {
        Ok(staking) => staking.register_delegate(name).await,
        Err(e) => Err(e),
    };
    finish(ctx, outcome, "Registered as a delegate", "Delegate registration failed")
}

pub async fn vote_for_delegate(ctx: &ClientContext, delegate: &str) -> Result<TxHash, ClientError> {
    let delegate = match parse_contract_address(delegate) {
        Ok(address) => address,
        Err(e) => {
            ctx.notifier.error("Invalid delegate address", Some(&e.to_string()));
            return Err(e.into());
        }
    };

    let outcome = match ctx.staking() {
        Ok(staking) => staking.vote_for_delegate(delegate).await,
        Err(e) => Err(e),
    };
    finish(ctx, outcome, "Vote for delegate cast", "Delegate vote failed")
}

fn finish(
    ctx: &ClientContext,
    outcome: Result<TxHash, crate::blockchain::BridgeError>,
    success: &str,
    failure: &str,
) -> Result<TxHash, ClientError> {
    match outcome {
        Ok(tx_hash) => {
            ctx.notifier.success(success, None);
            Ok(tx_hash)
        }
        Err(e) => {
            report(ctx.notifier.as_ref(), failure, &e);
            Err(e.into())
        }
    }
}

/// Delegates plus the signed-in user's stake.
///
/// The stake is looked up for the wallet linked to the profile. Any read
/// failure yields an empty list and a stake of `"0"`.
pub async fn governance_info(ctx: &ClientContext, session: &Session) -> GovernanceInfo {
    let account = session
        .wallet_address()
        .and_then(|w| w.as_str().parse::<Address>().ok());

    match load_info(ctx, account).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, "Governance data unavailable");
            GovernanceInfo {
                delegates: Vec::new(),
                my_stake: "0".to_string(),
            }
        }
    }
}

async fn load_info(
    ctx: &ClientContext,
    account: Option<Address>,
) -> Result<GovernanceInfo, crate::blockchain::BridgeError> {
    let staking = ctx.staking()?;
    let mut delegates = staking.delegates().await?;
    sort_delegates(&mut delegates);

    let my_stake = match account {
        Some(account) => format_ether(staking.stake_of(account).await?),
        None => "0".to_string(),
    };
    Ok(GovernanceInfo {
        delegates,
        my_stake,
    })
}
