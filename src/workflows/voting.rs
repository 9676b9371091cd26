// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Casting a vote.
//!
//! 1. Ask the backend whether the user may vote (saves gas on repeat votes).
//! 2. Send the vote transaction and wait for the receipt.
//! 3. Record the transaction hash in the backend.
//!
//! A failure in step 3 leaves a vote on chain that the backend does not
//! know about. The user gets one warning; the chain vote is never repeated.

use super::chain::report;
use super::{require_session, ClientContext};
use crate::blockchain::TxHash;
use crate::error::ClientError;
use crate::session::Session;

const DEFAULT_INELIGIBLE: &str = "You cannot vote in this election";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// On chain and recorded in the backend.
    Recorded(TxHash),
    /// On chain, but the backend did not store the hash.
    RecordPending { tx_hash: TxHash, reason: String },
    /// The backend refused eligibility; nothing was sent on chain.
    Ineligible(String),
}

pub async fn cast_vote(
    ctx: &ClientContext,
    session: &Session,
    election_id: u64,
    candidate_id: u64,
) -> Result<VoteOutcome, ClientError> {
    require_session(session)?;

    let status = ctx
        .api
        .vote_status(session, election_id)
        .await
        .map_err(|failure| {
            ctx.notifier.error(&failure.message, None);
            ClientError::from(failure)
        })?;
    if !status.can_vote {
        let message = status
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INELIGIBLE.to_string());
        ctx.notifier.error(&message, None);
        return Ok(VoteOutcome::Ineligible(message));
    }

    let outcome = match ctx.voting() {
        Ok(voting) => voting.vote(election_id, candidate_id).await,
        Err(e) => Err(e),
    };
    let tx_hash = match outcome {
        Ok(tx_hash) => tx_hash,
        Err(e) => {
            report(ctx.notifier.as_ref(), "Voting failed", &e);
            return Err(e.into());
        }
    };
    ctx.notifier.success("Your vote is recorded on chain", None);

    match ctx
        .api
        .record_vote(session, election_id, &tx_hash.to_string())
        .await
    {
        Ok(()) => {
            tracing::info!(election_id, candidate_id, tx_hash = %tx_hash, "Vote recorded");
            Ok(VoteOutcome::Recorded(tx_hash))
        }
        Err(failure) => {
            tracing::warn!(
                election_id,
                tx_hash = %tx_hash,
                error = %failure,
                "Vote on chain but not recorded in backend"
            );
            ctx.notifier
                .warning("Vote is on chain, but the backend was not updated", None);
            Ok(VoteOutcome::RecordPending {
                tx_hash,
                reason: failure.message,
            })
        }
    }
}
