// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Turning bridge failures into user notices.

use crate::blockchain::BridgeError;
use crate::notify::Notifier;

pub(crate) const WALLET_NOT_FOUND: &str = "Wallet not found";

/// Emit the error notice for a failed contract call and return the text
/// that describes it.
///
/// A revert with a reason reads `Contract error: <reason>`; a missing wallet
/// gets its own notice; anything else falls back to `title` alone.
pub(crate) fn report(notifier: &dyn Notifier, title: &str, err: &BridgeError) -> String {
    match err {
        BridgeError::WalletUnavailable => {
            notifier.error(
                WALLET_NOT_FOUND,
                Some("Configure a wallet key to sign transactions"),
            );
        }
        BridgeError::Reverted {
            reason: Some(reason),
        } => {
            notifier.error(title, Some(&format!("Contract error: {reason}")));
        }
        _ => notifier.error(title, None),
    }
    err.to_string()
}
