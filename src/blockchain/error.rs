// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract bridge errors and revert-reason extraction.

use alloy::sol_types::decode_revert_reason;

/// Errors that can occur while talking to the contracts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// No wallet provider is available to sign with.
    #[error("Wallet provider not found")]
    WalletUnavailable,

    /// The contract address for this bridge was never configured.
    #[error("Contract address not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// ENS names cannot be resolved on the target network.
    #[error("ENS names are not supported on this network: {0}")]
    EnsUnsupported(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The wallet returned no accounts.
    #[error("No wallet account available")]
    NoAccount,

    /// The contract rejected the call; `reason` is the revert string if any.
    #[error("Contract reverted{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted { reason: Option<String> },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl BridgeError {
    /// Map an error returned while sending or calling a contract method.
    pub fn from_contract(err: alloy::contract::Error) -> Self {
        match revert_reason(&err) {
            Some(reason) => BridgeError::Reverted {
                reason: Some(reason),
            },
            None => BridgeError::TransactionFailed(err.to_string()),
        }
    }

    /// Map an error returned while waiting for a receipt.
    pub fn from_pending(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        match reason_from_message(&message) {
            Some(reason) => BridgeError::Reverted {
                reason: Some(reason),
            },
            None => BridgeError::TransactionFailed(message),
        }
    }
}

fn revert_reason(err: &alloy::contract::Error) -> Option<String> {
    if let alloy::contract::Error::TransportError(transport) = err {
        if let Some(payload) = transport.as_error_resp() {
            if let Some(reason) = payload
                .as_revert_data()
                .and_then(|data| decode_revert_reason(&data))
            {
                return Some(clean_reason(&reason));
            }
            if let Some(reason) = reason_from_message(payload.message.as_ref()) {
                return Some(reason);
            }
        }
    }
    reason_from_message(&err.to_string())
}

/// Pull a revert string out of a node's error message.
///
/// Handles the common node formats:
/// - `execution reverted: Already voted`
/// - `VM Exception while processing transaction: reverted with reason string 'Already voted'`
pub fn reason_from_message(message: &str) -> Option<String> {
    const QUOTED: &str = "reverted with reason string '";
    const PLAIN: &str = "execution reverted: ";

    if let Some(start) = message.find(QUOTED) {
        let rest = &message[start + QUOTED.len()..];
        let reason = rest.split('\'').next().unwrap_or(rest);
        return non_empty(reason);
    }
    if let Some(start) = message.find(PLAIN) {
        return non_empty(&clean_reason(&message[start + PLAIN.len()..]));
    }
    None
}

fn clean_reason(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("revert: ")
        .trim_matches('"')
        .trim()
        .to_string()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_revert_reason() {
        assert_eq!(
            reason_from_message("server returned an error response: error code 3: execution reverted: Already voted"),
            Some("Already voted".to_string())
        );
    }

    #[test]
    fn extracts_quoted_revert_reason() {
        assert_eq!(
            reason_from_message(
                "VM Exception while processing transaction: reverted with reason string 'Election is not active'"
            ),
            Some("Election is not active".to_string())
        );
    }

    #[test]
    fn no_reason_for_generic_failures() {
        assert_eq!(reason_from_message("insufficient funds for gas"), None);
        assert_eq!(reason_from_message("execution reverted: "), None);
    }

    #[test]
    fn reverted_display_includes_reason_when_present() {
        let with = BridgeError::Reverted {
            reason: Some("Already voted".into()),
        };
        assert_eq!(with.to_string(), "Contract reverted: Already voted");

        let without = BridgeError::Reverted { reason: None };
        assert_eq!(without.to_string(), "Contract reverted");
    }

    #[test]
    fn pending_errors_keep_reason() {
        let err = BridgeError::from_pending("execution reverted: Not a delegate");
        assert_eq!(
            err,
            BridgeError::Reverted {
                reason: Some("Not a delegate".into())
            }
        );

        let err = BridgeError::from_pending("timeout");
        assert_eq!(err, BridgeError::TransactionFailed("timeout".into()));
    }
}
