// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session context and persistence.
//!
//! A [`Session`] is an explicit value handed to whatever needs the bearer
//! token or the user profile. Its lifecycle is:
//!
//! - **created** at login/register ([`Session::begin`])
//! - **updated** when a wallet is linked ([`Session::update_user`])
//! - **destroyed** at logout ([`Session::end`])
//!
//! [`SessionStore`] persists it between runs. Nothing reads the store ad hoc;
//! callers load once and pass the value along.

pub mod guard;
pub mod roles;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::models::{User, WalletAddress};

pub use guard::{guard, Access, Route};
pub use roles::{navigation_links, NavLink, Role};
pub use store::{SessionError, SessionStore};

/// Bearer token plus the cached user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl Session {
    /// Start a session with the token returned by login/register.
    pub fn begin(&mut self, token: String, user: Option<User>) {
        self.token = Some(token);
        self.user = user;
    }

    /// Replace the cached profile (after wallet linking).
    pub fn update_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Drop the token and profile.
    pub fn end(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Token, if one is present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn wallet_address(&self) -> Option<&WalletAddress> {
        self.user.as_ref().and_then(|u| u.wallet_address.as_ref())
    }
}
