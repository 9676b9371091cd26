// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, registration and logout.
//!
//! A successful login or registration starts the session and persists it;
//! logout ends it and removes the persisted copy.

use super::{ClientContext, require_session};
use crate::error::ClientError;
use crate::models::{LoginRequest, RegisterRequest};
use crate::session::Session;

pub async fn login(
    ctx: &ClientContext,
    session: &mut Session,
    email: &str,
    password: &str,
) -> Result<(), ClientError> {
    if email.trim().is_empty() || password.is_empty() {
        let err = ClientError::validation("Email and password are required");
        ctx.notifier.error("Login failed", Some(&err.to_string()));
        return Err(err);
    }

    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    match ctx.api.login(&request).await {
        Ok(auth) => {
            session.begin(auth.access_token, auth.user);
            ctx.store.save(session)?;
            tracing::info!(email = %request.email, "Signed in");
            ctx.notifier.success("Signed in", None);
            Ok(())
        }
        Err(failure) => {
            ctx.notifier.error("Login failed", Some(&failure.message));
            Err(failure.into())
        }
    }
}

pub async fn register(
    ctx: &ClientContext,
    session: &mut Session,
    request: &RegisterRequest,
) -> Result<(), ClientError> {
    if let Err(message) = request.validate() {
        ctx.notifier.error("Registration failed", Some(&message));
        return Err(ClientError::Validation(message));
    }

    match ctx.api.register(request).await {
        Ok(auth) => {
            session.begin(auth.access_token, auth.user);
            ctx.store.save(session)?;
            tracing::info!(email = %request.email, "Registered");
            ctx.notifier.success("Registration complete", None);
            Ok(())
        }
        Err(failure) => {
            ctx.notifier.error("Registration failed", Some(&failure.message));
            Err(failure.into())
        }
    }
}

pub fn logout(ctx: &ClientContext, session: &mut Session) -> Result<(), ClientError> {
    require_session(session)?;
    session.end();
    ctx.store.clear()?;
    ctx.notifier.info("Signed out", None);
    Ok(())
}
