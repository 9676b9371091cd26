// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::blockchain::BridgeError;
use crate::config::ConfigError;
use crate::session::SessionError;

/// Message used when neither the body nor the HTTP status text says anything.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A backend reply that did not carry the expected payload.
///
/// `message` is always non-empty and safe to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub message: String,
    /// `None` when no HTTP response was received at all.
    pub http_status: Option<u16>,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>, http_status: Option<u16>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self {
            message,
            http_status,
        }
    }
}

/// Umbrella error for workflows and the command line front end.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiFailure),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Admin privileges required")]
    Forbidden,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Whether a workflow already showed this error as a notice.
    pub fn was_notified(&self) -> bool {
        matches!(
            self,
            ClientError::Api(_) | ClientError::Bridge(_) | ClientError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_falls_back_to_unknown_error() {
        let failure = ApiFailure::new("   ", Some(500));
        assert_eq!(failure.message, UNKNOWN_ERROR);
        assert_eq!(failure.http_status, Some(500));
    }

    #[test]
    fn network_failure_has_no_status() {
        let failure = ApiFailure::new("connection refused", None);
        assert_eq!(failure.http_status, None);
        assert_eq!(failure.to_string(), "connection refused");
    }

    #[test]
    fn client_error_displays_inner_message() {
        let err: ClientError = ApiFailure::new("Election not found", Some(404)).into();
        assert_eq!(err.to_string(), "Election not found");

        let err = ClientError::validation("Field `title` is required");
        assert_eq!(err.to_string(), "Field `title` is required");
    }
}
