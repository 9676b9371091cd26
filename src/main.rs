// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use ballot_client::cli::{self, Cli};
use ballot_client::config::ClientConfig;
use ballot_client::logging::init_tracing;
use ballot_client::notify::ConsoleNotifier;
use ballot_client::workflows::ClientContext;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    let ctx = match ClientContext::from_config(&config, Arc::new(ConsoleNotifier)) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize client");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.was_notified() {
                eprintln!("error: {e}");
            }
            tracing::debug!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
