// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ballot Client - Online Voting Platform Client
//!
//! Headless client for an online voting platform whose records live in a
//! REST backend and whose votes and governance live in EVM contracts.
//!
//! ## Modules
//!
//! - `config` - Environment-driven configuration
//! - `session` - Session context, persistent store and route guard
//! - `gateway` - Request gateway and typed backend API
//! - `blockchain` - Voting and DPoS contract bridge, wallet provider
//! - `workflows` - User actions combining backend and chain calls
//! - `notify` - User-facing notices
//! - `cli` - `ballot` command line front end

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod notify;
pub mod session;
pub mod workflows;

#[cfg(test)]
mod test_support;
