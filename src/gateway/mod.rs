// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Gateway
//!
//! One function, [`Gateway::send`], for every backend call:
//!
//! 1. attaches `Authorization: Bearer <token>` unless the path is a login or
//!    register path,
//! 2. sends the payload as JSON (GET requests carry no body),
//! 3. funnels every completion into a [`Reply`]: success, HTTP error and
//!    "no response at all" share the same shape.
//!
//! There are no retries, no timeout and no backoff. One attempt per call.
//!
//! Typed wrappers for each backend endpoint live in [`api`].

pub mod api;

use reqwest::{header::CONTENT_TYPE, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::{ApiFailure, UNKNOWN_ERROR};

pub use api::BackendApi;

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Paths that must never carry a bearer token.
const PUBLIC_PATH_MARKERS: [&str; 2] = ["/login", "/register"];

/// Whether a request to `path` should carry the bearer token.
pub fn requires_auth(path: &str) -> bool {
    !PUBLIC_PATH_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Normalized completion of one backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// `None` when no HTTP response was received.
    pub http_status: Option<u16>,
    /// True for 2xx responses with a JSON (or empty) body.
    pub ok: bool,
    /// Parsed body. Error replies always hold an object with a non-empty `message`.
    pub body: Value,
}

impl Reply {
    /// Synthesized reply for a request that never got a response.
    pub fn network_error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self {
            http_status: None,
            ok: false,
            body: json!({ "status": "error", "message": message }),
        }
    }

    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let code = status.as_u16();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Self::network_error(e.to_string()),
        };

        if status.is_success() {
            if text.trim().is_empty() {
                return Self {
                    http_status: Some(code),
                    ok: true,
                    body: Value::Object(Map::new()),
                };
            }
            return match serde_json::from_str(&text) {
                Ok(body) => Self {
                    http_status: Some(code),
                    ok: true,
                    body,
                },
                Err(e) => Self {
                    http_status: Some(code),
                    ok: false,
                    body: json!({
                        "status": "error",
                        "message": format!("Invalid JSON in response: {e}"),
                        "http_status": code,
                    }),
                },
            };
        }

        let mut body = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(other) => json!({ "status": "error", "detail": other }),
            Err(_) => json!({
                "status": "error",
                "message": status_text,
                "http_status": code,
            }),
        };

        let has_message = body
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(|m| !m.trim().is_empty());
        if !has_message {
            let fallback = if status_text.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                status_text
            };
            body["message"] = Value::String(fallback);
        }

        Self {
            http_status: Some(code),
            ok: false,
            body,
        }
    }

    /// Error replies: non-2xx, unreachable backend, or an explicit
    /// `"status": "error"` in a 2xx body.
    pub fn is_error(&self) -> bool {
        !self.ok || self.body.get("status").and_then(Value::as_str) == Some("error")
    }

    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
    }

    /// Convert into a user-displayable failure, using `fallback` when the
    /// body has no message of its own.
    pub fn failure(&self, fallback: &str) -> ApiFailure {
        ApiFailure::new(self.message().unwrap_or(fallback), self.http_status)
    }

    /// Deserialize `body[key]`, if present and well-formed.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.body
            .get(key)
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Deserialize the whole body.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

/// HTTP gateway to the voting backend.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
    http: Client,
}

impl Gateway {
    pub fn new(base_url: &Url) -> Self {
        Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Send one request and normalize whatever comes back.
    ///
    /// Never fails: network errors become a [`Reply::network_error`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        token: Option<&str>,
    ) -> Reply {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);

        if requires_auth(path) {
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
        }

        if method != Method::GET {
            let body = payload.cloned().unwrap_or_else(|| json!({}));
            request = request.body(body.to_string());
        }

        tracing::debug!(method = %method, path = %path, "Backend request");

        let reply = match request.send().await {
            Ok(response) => Reply::from_response(response).await,
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Backend unreachable");
                Reply::network_error(e.to_string())
            }
        };

        if reply.is_error() {
            tracing::debug!(
                method = %method,
                path = %path,
                http_status = ?reply.http_status,
                message = reply.message().unwrap_or_default(),
                "Backend returned an error"
            );
        }
        reply
    }
}
