// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types, address parsing and ether formatting.

use std::str::FromStr;

use alloy::primitives::{utils, Address, U256};

use super::error::BridgeError;

pub use alloy::primitives::TxHash;

/// A registered DPoS delegate. Exists only on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegate {
    pub wallet: Address,
    pub name: String,
    /// Stake-weighted votes, in wei.
    pub total_votes: U256,
}

impl Delegate {
    pub fn formatted_votes(&self) -> String {
        format_ether(self.total_votes)
    }
}

/// Order delegates by accumulated vote weight, heaviest first.
pub fn sort_delegates(delegates: &mut [Delegate]) {
    delegates.sort_by(|a, b| b.total_votes.cmp(&a.total_votes));
}

/// Parse a contract or account address.
///
/// ENS resolution is disabled: names like `voting.eth` are rejected instead
/// of being looked up.
pub fn parse_contract_address(raw: &str) -> Result<Address, BridgeError> {
    let raw = raw.trim();
    if !raw.starts_with("0x") && raw.contains('.') {
        return Err(BridgeError::EnsUnsupported(raw.to_string()));
    }
    Address::from_str(raw).map_err(|e| BridgeError::InvalidAddress(e.to_string()))
}

/// Parse a user-entered ether amount (e.g. `"0.1"`) into wei.
pub fn parse_ether_amount(raw: &str) -> Result<U256, BridgeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BridgeError::InvalidAmount("amount is empty".to_string()));
    }
    utils::parse_ether(raw).map_err(|e| BridgeError::InvalidAmount(e.to_string()))
}

/// Format a wei amount as ether at full precision, without trailing zeros.
pub fn format_ether(wei: U256) -> String {
    let formatted = utils::format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => match fraction.trim_end_matches('0') {
            "" => whole.to_string(),
            fraction => format!("{whole}.{fraction}"),
        },
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ether() {
        let one = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_ether(one), "1");

        let half = U256::from(500_000_000_000_000_000u64);
        assert_eq!(format_ether(half), "0.5");

        let precise = U256::from(1_234_567_890_000_000_000u64);
        assert_eq!(format_ether(precise), "1.23456789");

        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_ether(U256::from(12u64) * U256::from(10u64).pow(U256::from(18u64))), "12");

        assert_eq!(format_ether(U256::ZERO), "0");
    }

    #[test]
    fn parse_ether_amount_accepts_decimals() {
        assert_eq!(
            parse_ether_amount("0.5").unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
        assert!(parse_ether_amount("").is_err());
        assert!(parse_ether_amount("abc").is_err());
    }

    #[test]
    fn ens_names_are_rejected() {
        assert!(matches!(
            parse_contract_address("voting.eth"),
            Err(BridgeError::EnsUnsupported(_))
        ));
        assert!(parse_contract_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_ok());
        assert!(matches!(
            parse_contract_address("0x123"),
            Err(BridgeError::InvalidAddress(_))
        ));
    }

    #[test]
    fn delegates_sort_by_votes_descending() {
        let mk = |name: &str, votes: u64| Delegate {
            wallet: Address::ZERO,
            name: name.to_string(),
            total_votes: U256::from(votes),
        };
        let mut delegates = vec![mk("a", 1), mk("b", 30), mk("c", 7)];
        sort_delegates(&mut delegates);
        let names: Vec<_> = delegates.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }
}
