// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Browsing elections: list, details with live vote counts, results and the
//! voter's own history.
//!
//! Vote counts are never taken from the backend. They are read from the
//! voting contract per candidate; a failed read counts as zero.

use std::sync::Arc;

use tokio::task::JoinSet;

use super::{require_session, ClientContext};
use crate::blockchain::VotingBridge;
use crate::error::ClientError;
use crate::models::{Candidate, Election, VoteRecord};
use crate::session::Session;

/// An election together with its candidates and their live vote counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionDetails {
    pub election: Election,
    pub candidates: Vec<Candidate>,
}

impl ElectionDetails {
    pub fn results(&self) -> Results {
        tally(&self.candidates)
    }
}

/// One bar of the results chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub candidate_id: u64,
    pub name: String,
    pub votes: u64,
    /// Share of all votes in percent; zero when nobody has voted.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub rows: Vec<ResultRow>,
    pub total_votes: u64,
}

/// Sort candidates by votes (descending) and compute each one's share.
pub fn tally(candidates: &[Candidate]) -> Results {
    let total_votes = candidates
        .iter()
        .map(|c| c.votes)
        .fold(0, u64::saturating_add);
    let mut rows: Vec<ResultRow> = candidates
        .iter()
        .map(|c| ResultRow {
            candidate_id: c.id,
            name: c.user.name.clone(),
            votes: c.votes,
            share: if total_votes == 0 {
                0.0
            } else {
                c.votes as f64 * 100.0 / total_votes as f64
            },
        })
        .collect();
    rows.sort_by(|a, b| b.votes.cmp(&a.votes));
    Results { rows, total_votes }
}

pub async fn list_elections(
    ctx: &ClientContext,
    session: &Session,
) -> Result<Vec<Election>, ClientError> {
    require_session(session)?;
    ctx.api.list_elections(session).await.map_err(|failure| {
        ctx.notifier.error("Failed to load elections", Some(&failure.message));
        failure.into()
    })
}

/// Load one election record.
pub async fn load_election(
    ctx: &ClientContext,
    session: &Session,
    election_id: u64,
) -> Result<Election, ClientError> {
    require_session(session)?;
    ctx.api
        .get_election(session, election_id)
        .await
        .map_err(|failure| {
            ctx.notifier.error("Election not found", None);
            failure.into()
        })
}

/// Load the election, its candidates and their on-chain vote counts.
pub async fn election_details(
    ctx: &ClientContext,
    session: &Session,
    election_id: u64,
) -> Result<ElectionDetails, ClientError> {
    require_session(session)?;

    let (election, candidates) = tokio::join!(
        load_election(ctx, session, election_id),
        ctx.api.list_candidates(session, election_id),
    );
    let election = election?;

    let candidates = match candidates {
        Ok(candidates) => candidates,
        Err(failure) => {
            tracing::warn!(election_id, error = %failure, "Candidate list unavailable");
            Vec::new()
        }
    };
    let candidates = with_live_votes(ctx.voting.clone(), election_id, candidates).await;

    Ok(ElectionDetails {
        election,
        candidates,
    })
}

/// Fill in `votes` for every candidate, reading all counts concurrently.
pub async fn with_live_votes(
    voting: Option<Arc<dyn VotingBridge>>,
    election_id: u64,
    mut candidates: Vec<Candidate>,
) -> Vec<Candidate> {
    let Some(voting) = voting else {
        candidates.iter_mut().for_each(|c| c.votes = 0);
        return candidates;
    };

    let mut reads = JoinSet::new();
    for (index, candidate) in candidates.iter().enumerate() {
        let voting = voting.clone();
        let candidate_id = candidate.id;
        reads.spawn(async move {
            let votes = match voting.candidate_votes(election_id, candidate_id).await {
                Ok(votes) => votes,
                Err(e) => {
                    tracing::debug!(election_id, candidate_id, error = %e, "Vote count read failed");
                    0
                }
            };
            (index, votes)
        });
    }

    while let Some(joined) = reads.join_next().await {
        if let Ok((index, votes)) = joined {
            if let Some(candidate) = candidates.get_mut(index) {
                candidate.votes = votes;
            }
        }
    }
    candidates
}

pub async fn my_votes(ctx: &ClientContext, session: &Session) -> Result<Vec<VoteRecord>, ClientError> {
    require_session(session)?;
    ctx.api.my_votes(session).await.map_err(|failure| {
        ctx.notifier.error("Failed to load your votes", Some(&failure.message));
        failure.into()
    })
}
