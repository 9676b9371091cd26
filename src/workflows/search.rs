// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Debounced user search for the add-candidate form.
//!
//! Queries shorter than [`MIN_QUERY_CHARS`] clear the results and send
//! nothing. Longer queries fire one request once input has been quiet for
//! [`SEARCH_DEBOUNCE`]; every new keystroke cancels the pending one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::ApiFailure;
use crate::gateway::BackendApi;
use crate::models::UserSummary;
use crate::session::Session;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_CHARS: usize = 2;

/// Where user search requests go.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, ApiFailure>;
}

/// [`UserDirectory`] backed by `GET /users/search` with the session token.
pub struct SessionDirectory {
    api: BackendApi,
    token: Option<String>,
}

impl SessionDirectory {
    pub fn new(api: BackendApi, session: &Session) -> Self {
        Self {
            api,
            token: session.token().map(str::to_string),
        }
    }
}

#[async_trait]
impl UserDirectory for SessionDirectory {
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, ApiFailure> {
        self.api
            .search_users_with_token(self.token.as_deref(), query)
            .await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<UserSummary>,
    /// A request is in flight.
    pub searching: bool,
    /// No debounce timer or request is pending for the current query.
    pub settled: bool,
}

/// Search box state plus the user picked from the results.
pub struct CandidateSearch {
    directory: Arc<dyn UserDirectory>,
    state: Arc<watch::Sender<SearchState>>,
    pending: Option<CancellationToken>,
    selected: Option<UserSummary>,
}

impl CandidateSearch {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: Arc::new(watch::Sender::new(SearchState {
                settled: true,
                ..SearchState::default()
            })),
            pending: None,
            selected: None,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn selected(&self) -> Option<&UserSummary> {
        self.selected.as_ref()
    }

    /// Feed the current contents of the search box.
    pub fn set_query(&mut self, query: &str) {
        self.cancel_pending();

        if query.chars().count() < MIN_QUERY_CHARS {
            self.state.send_modify(|s| {
                s.query = query.to_string();
                s.results.clear();
                s.searching = false;
                s.settled = true;
            });
            return;
        }

        self.state.send_modify(|s| {
            s.query = query.to_string();
            s.settled = false;
        });

        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let directory = self.directory.clone();
        let state = self.state.clone();
        let query = query.to_string();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(SEARCH_DEBOUNCE) => {}
            }

            state.send_if_modified(|s| {
                if token.is_cancelled() {
                    return false;
                }
                s.searching = true;
                true
            });

            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                result = directory.search(&query) => result,
            };

            state.send_if_modified(|s| {
                if token.is_cancelled() {
                    return false;
                }
                match result {
                    Ok(users) => s.results = users,
                    // Results stay as they were.
                    Err(ref e) => tracing::debug!(query = %query, error = %e, "User search failed"),
                }
                s.searching = false;
                s.settled = true;
                true
            });
        });
    }

    /// Wait until the current query has been answered (or was too short).
    pub async fn settled(&self) -> SearchState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|s| s.settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }

    /// Pick a user from the results; clears the search box.
    pub fn select(&mut self, user: UserSummary) {
        self.cancel_pending();
        self.selected = Some(user);
        self.state.send_modify(|s| {
            s.query.clear();
            s.results.clear();
            s.searching = false;
            s.settled = true;
        });
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for CandidateSearch {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
