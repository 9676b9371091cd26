// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route table and the token-presence guard in front of protected routes.
//!
//! The guard only checks that a token exists. Expired or revoked tokens are
//! discovered when the next backend call fails.

use super::Session;

/// Every screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Elections,
    ElectionDetails(u64),
    MyVotes,
    Governance,
    AdminStats,
}

impl Route {
    /// Login and register are the only public routes.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Elections => "/".to_string(),
            Route::ElectionDetails(id) => format!("/elections/{id}"),
            Route::MyVotes => "/my-votes".to_string(),
            Route::Governance => "/governance".to_string(),
            Route::AdminStats => "/admin/stats".to_string(),
        }
    }
}

/// Outcome of passing a route through the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render(Route),
    Redirect(Route),
}

/// Decide whether `route` may be rendered for `session`.
pub fn guard(route: Route, session: &Session) -> Access {
    if route.is_protected() && !session.is_authenticated() {
        tracing::debug!(path = %route.path(), "No session token, redirecting to login");
        Access::Redirect(Route::Login)
    } else {
        Access::Render(route)
    }
}
