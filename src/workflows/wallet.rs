// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet connection: read the active account and link it to the profile.

use super::chain::{report, WALLET_NOT_FOUND};
use super::{require_session, ClientContext};
use crate::blockchain::{AccountListener, BridgeError};
use crate::error::ClientError;
use crate::models::WalletAddress;
use crate::session::Session;

/// Link the wallet's first account to the signed-in user.
pub async fn connect_wallet(
    ctx: &ClientContext,
    session: &mut Session,
) -> Result<WalletAddress, ClientError> {
    require_session(session)?;

    let Some(wallet) = ctx.wallet.as_deref() else {
        ctx.notifier.error(
            WALLET_NOT_FOUND,
            Some("Configure a wallet key to connect a wallet"),
        );
        return Err(BridgeError::WalletUnavailable.into());
    };

    let accounts = match wallet.request_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            report(ctx.notifier.as_ref(), "Failed to connect wallet", &e);
            return Err(e.into());
        }
    };
    let Some(account) = accounts.first() else {
        ctx.notifier.error("Failed to connect wallet", None);
        return Err(BridgeError::NoAccount.into());
    };
    let address = WalletAddress::from(account.to_string());

    match ctx.api.link_wallet(session, address.clone()).await {
        Ok(user) => {
            session.update_user(user);
            ctx.store.save(session)?;
            tracing::info!(wallet_address = %address, "Wallet linked");
            ctx.notifier.success("Wallet linked", Some(address.as_str()));
            Ok(address)
        }
        Err(failure) => {
            ctx.notifier.error("Failed to save the wallet address", Some(&failure.message));
            Err(failure.into())
        }
    }
}

/// Log every account switch in the wallet until the listener is dropped.
pub fn watch_accounts(ctx: &ClientContext) -> Result<AccountListener, ClientError> {
    let Some(wallet) = ctx.wallet.as_deref() else {
        ctx.notifier.error(WALLET_NOT_FOUND, None);
        return Err(BridgeError::WalletUnavailable.into());
    };
    tracing::debug!(accounts = ?wallet.subscribe().current(), "Watching wallet accounts");
    Ok(wallet.subscribe().listen(|accounts| match accounts.first() {
        Some(account) => tracing::info!(account = %account, "Wallet account changed"),
        None => tracing::info!("Wallet disconnected"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::address;
    use serde_json::json;

    use super::*;
    use crate::notify::NoticeLevel;
    use crate::workflows::fakes::{signed_in, FakeWallet, Harness};

    #[tokio::test]
    async fn missing_wallet_aborts_before_any_request() {
        let h = Harness::new().await;
        let mut session = signed_in();

        let err = connect_wallet(&h.ctx, &mut session).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Bridge(BridgeError::WalletUnavailable)
        ));
        assert_eq!(h.notices.notices()[0].title, WALLET_NOT_FOUND);
        assert!(h.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn first_account_is_linked_and_profile_updated() {
        let account = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let h = Harness::new()
            .await
            .with_wallet(Arc::new(FakeWallet::with_accounts(vec![account])));
        h.backend.respond_json(
            "POST",
            "/user/wallet",
            200,
            json!({ "user": {
                "id": 1, "name": "Olena", "email": "o@x.ua",
                "wallet_address": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            }}),
        );
        let mut session = signed_in();

        let linked = connect_wallet(&h.ctx, &mut session).await.unwrap();

        assert_eq!(linked.as_str(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(session.wallet_address(), Some(&linked));
        let body: serde_json::Value =
            serde_json::from_str(&h.backend.requests()[0].body).unwrap();
        assert_eq!(body["wallet_address"], json!(linked.as_str()));
        assert_eq!(h.ctx.store.load().unwrap(), session);
        assert_eq!(h.notices.count(NoticeLevel::Success), 1);
    }

    #[tokio::test]
    async fn reply_without_user_is_an_error() {
        let account = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let h = Harness::new()
            .await
            .with_wallet(Arc::new(FakeWallet::with_accounts(vec![account])));
        h.backend
            .respond_json("POST", "/user/wallet", 422, json!({ "message": "Address taken" }));
        let mut session = signed_in();

        assert!(connect_wallet(&h.ctx, &mut session).await.is_err());
        assert!(session.user().is_none());
        assert_eq!(
            h.notices.notices()[0].description.as_deref(),
            Some("Address taken")
        );
    }

    #[tokio::test]
    async fn watching_without_wallet_fails() {
        let h = Harness::new().await;
        assert!(watch_accounts(&h.ctx).is_err());
        assert_eq!(h.notices.notices()[0].title, WALLET_NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_account_list_is_reported() {
        let h = Harness::new()
            .await
            .with_wallet(Arc::new(FakeWallet::with_accounts(vec![])));
        let mut session = signed_in();

        let err = connect_wallet(&h.ctx, &mut session).await.unwrap_err();
        assert!(matches!(err, ClientError::Bridge(BridgeError::NoAccount)));
    }
}
