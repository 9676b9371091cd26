// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, default values, and the [`ClientConfig`]
//! loaded from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BALLOT_API_URL` | Backend REST base URL | `http://localhost:8000/api` |
//! | `BALLOT_RPC_URL` | EVM JSON-RPC endpoint | `http://127.0.0.1:8545` |
//! | `VOTING_CONTRACT_ADDRESS` | Election voting contract | Required for chain commands |
//! | `DPOS_CONTRACT_ADDRESS` | Delegated-stake contract | Required for governance |
//! | `WALLET_PRIVATE_KEY` | Hex key backing the local wallet | None (no wallet) |
//! | `BALLOT_SESSION_FILE` | Persisted session file | `$HOME/.ballot/session.json` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,ballot_client=debug` |

use std::path::PathBuf;

use alloy::primitives::Address;
use url::Url;

use crate::blockchain::parse_contract_address;

pub const API_URL_ENV: &str = "BALLOT_API_URL";
pub const RPC_URL_ENV: &str = "BALLOT_RPC_URL";
pub const VOTING_CONTRACT_ENV: &str = "VOTING_CONTRACT_ADDRESS";
pub const DPOS_CONTRACT_ENV: &str = "DPOS_CONTRACT_ADDRESS";
pub const WALLET_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
pub const SESSION_FILE_ENV: &str = "BALLOT_SESSION_FILE";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_LOG_FILTER: &str = "info,ballot_client=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Invalid contract address in {var}: {reason}")]
    InvalidAddress { var: &'static str, reason: String },

    #[error("Cannot determine session file location; set {SESSION_FILE_ENV}")]
    NoSessionPath,
}

/// Output format for `tracing-subscriber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Everything the client needs to reach the backend and the chain.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub rpc_url: Url,
    pub voting_contract: Option<Address>,
    pub dpos_contract: Option<Address>,
    /// Hex private key; `None` behaves like a browser without a wallet extension.
    pub wallet_key: Option<String>,
    pub session_file: PathBuf,
    pub log_format: LogFormat,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = parse_url(API_URL_ENV, get(API_URL_ENV), DEFAULT_API_URL)?;
        let rpc_url = parse_url(RPC_URL_ENV, get(RPC_URL_ENV), DEFAULT_RPC_URL)?;
        let voting_contract = parse_optional_address(VOTING_CONTRACT_ENV, get(VOTING_CONTRACT_ENV))?;
        let dpos_contract = parse_optional_address(DPOS_CONTRACT_ENV, get(DPOS_CONTRACT_ENV))?;

        let session_file = match get(SESSION_FILE_ENV) {
            Some(path) => PathBuf::from(path),
            None => get("HOME")
                .map(|home| PathBuf::from(home).join(".ballot").join("session.json"))
                .ok_or(ConfigError::NoSessionPath)?,
        };

        Ok(Self {
            api_url,
            rpc_url,
            voting_contract,
            dpos_contract,
            wallet_key: get(WALLET_KEY_ENV),
            session_file,
            log_format: LogFormat::parse(get(LOG_FORMAT_ENV).as_deref()),
        })
    }
}

fn parse_url(var: &'static str, raw: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let raw = raw.unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })
}

fn parse_optional_address(
    var: &'static str,
    raw: Option<String>,
) -> Result<Option<Address>, ConfigError> {
    raw.map(|value| {
        parse_contract_address(&value).map_err(|e| ConfigError::InvalidAddress {
            var,
            reason: e.to_string(),
        })
    })
    .transpose()
}
