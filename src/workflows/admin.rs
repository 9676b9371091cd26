// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin actions: elections, candidates and statistics.
//!
//! Election create/edit is a dual write. The backend record is written
//! first; the contract follows. If the contract step fails the record stays,
//! the user gets exactly one warning, and the result carries
//! [`ChainSync::Pending`] so the action can be repeated by hand.

use super::chain::report;
use super::{require_session, ChainSync, ClientContext};
use crate::blockchain::{BridgeError, TxHash};
use crate::error::ClientError;
use crate::models::{AddCandidateRequest, AdminStats, Candidate, Election, ElectionForm, UserSummary};
use crate::session::Session;

/// Result of a create or edit: the backend record plus the chain outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedElection {
    pub election: Election,
    pub chain: ChainSync,
}

/// Create the backend record, then register it on chain.
pub async fn create_election(
    ctx: &ClientContext,
    session: &Session,
    form: &ElectionForm,
) -> Result<SavedElection, ClientError> {
    require_session(session)?;
    if let Err(message) = form.validate() {
        ctx.notifier.error("Failed to create election", Some(&message));
        return Err(ClientError::Validation(message));
    }

    // New elections always start as planned.
    let form = ElectionForm {
        status: None,
        ..form.clone()
    };
    let election = ctx
        .api
        .create_election(session, &form)
        .await
        .map_err(|failure| {
            ctx.notifier.error("Failed to create election", Some(&failure.message));
            ClientError::from(failure)
        })?;
    tracing::info!(election_id = election.id, title = %election.title, "Election record created");
    ctx.notifier.success("Election created", None);

    let outcome = match ctx.voting() {
        Ok(voting) => voting.create_election(election.id).await,
        Err(e) => Err(e),
    };
    let chain = settle(
        ctx,
        election.id,
        outcome,
        "Failed to create election on chain",
        "Election saved, but not on chain. Try again later.",
    );
    if chain.is_synced() {
        ctx.notifier.success("Election registered on chain", None);
    }

    Ok(SavedElection { election, chain })
}

/// Update the backend record; flip the on-chain active flag only when the
/// status changed.
pub async fn edit_election(
    ctx: &ClientContext,
    session: &Session,
    current: &Election,
    form: &ElectionForm,
) -> Result<SavedElection, ClientError> {
    require_session(session)?;
    if let Err(message) = form.validate() {
        ctx.notifier.error("Failed to update election", Some(&message));
        return Err(ClientError::Validation(message));
    }

    let election = ctx
        .api
        .update_election(session, current.id, form)
        .await
        .map_err(|failure| {
            ctx.notifier.error("Failed to update election", Some(&failure.message));
            ClientError::from(failure)
        })?;
    ctx.notifier.success("Election updated", None);

    let new_status = form.status.unwrap_or(current.status);
    if new_status == current.status {
        return Ok(SavedElection {
            election,
            chain: ChainSync::Skipped,
        });
    }

    let active = new_status.is_active();
    let Ok(voting) = ctx.voting() else {
        tracing::debug!(election_id = current.id, "No voting contract, status change stays off chain");
        return Ok(SavedElection {
            election,
            chain: ChainSync::Skipped,
        });
    };
    let outcome = voting.toggle_election_status(current.id, active).await;
    let chain = settle(
        ctx,
        current.id,
        outcome,
        "Failed to change status on chain",
        "Status saved, but not on chain. Try again later.",
    );
    if chain.is_synced() {
        let label = if active { "Active" } else { "Inactive" };
        ctx.notifier
            .success(&format!("On-chain status changed to {label}"), None);
    }

    Ok(SavedElection { election, chain })
}

/// Turn the chain half of a dual write into a [`ChainSync`], emitting the
/// bridge error and the single warning on failure.
fn settle(
    ctx: &ClientContext,
    election_id: u64,
    outcome: Result<TxHash, BridgeError>,
    failure_title: &str,
    warning: &str,
) -> ChainSync {
    match outcome {
        Ok(tx_hash) => {
            tracing::info!(election_id, tx_hash = %tx_hash, "Election synchronized on chain");
            ChainSync::Synced
        }
        Err(e) => {
            let reason = report(ctx.notifier.as_ref(), failure_title, &e);
            tracing::warn!(election_id, error = %e, "Backend and contract out of sync");
            ctx.notifier.warning(warning, None);
            ChainSync::Pending(reason)
        }
    }
}

/// Add the user picked in the search as a candidate.
pub async fn add_candidate(
    ctx: &ClientContext,
    session: &Session,
    election_id: u64,
    selected: Option<&UserSummary>,
    bio: &str,
) -> Result<Candidate, ClientError> {
    require_session(session)?;
    let Some(user) = selected else {
        ctx.notifier.error("Select a user first", None);
        return Err(ClientError::validation("No user selected"));
    };

    let request = AddCandidateRequest {
        user_id: user.id,
        bio: bio.to_string(),
    };
    match ctx.api.add_candidate(session, election_id, &request).await {
        Ok(candidate) => {
            ctx.notifier.success("Candidate added", None);
            Ok(candidate)
        }
        Err(failure) => {
            ctx.notifier.error("Failed to add candidate", Some(&failure.message));
            Err(failure.into())
        }
    }
}

pub async fn remove_candidate(
    ctx: &ClientContext,
    session: &Session,
    candidate_id: u64,
) -> Result<(), ClientError> {
    require_session(session)?;
    match ctx.api.remove_candidate(session, candidate_id).await {
        Ok(()) => {
            ctx.notifier.success("Candidate removed", None);
            Ok(())
        }
        Err(failure) => {
            ctx.notifier
                .error("Failed to remove candidate", Some(&failure.message));
            Err(failure.into())
        }
    }
}

pub async fn admin_stats(ctx: &ClientContext, session: &Session) -> Result<AdminStats, ClientError> {
    require_session(session)?;
    ctx.api.admin_stats(session).await.map_err(|failure| {
        ctx.notifier.error("Failed to load statistics", Some(&failure.message));
        failure.into()
    })
}
