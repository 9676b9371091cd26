// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed wrappers around the backend REST surface.
//!
//! Each wrapper sends through [`Gateway::send`] and then checks for the key
//! the backend puts its payload under (`election`, `candidate`, `user`, ...).
//! Anything else becomes an [`ApiFailure`] carrying the backend's `message`.

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::{form_urlencoded, Url};

use super::{Gateway, Reply};
use crate::error::ApiFailure;
use crate::models::{
    AddCandidateRequest, AdminStats, AuthResponse, Candidate, Election, ElectionForm,
    LinkWalletRequest, LoginRequest, RecordVoteRequest, RegisterRequest, User, UserSummary,
    VoteRecord, VoteStatus, WalletAddress,
};
use crate::session::Session;

/// Exact reply message for a successful candidate removal.
pub const CANDIDATE_REMOVED: &str = "Candidate removed successfully";

/// Client for the voting backend.
#[derive(Debug, Clone)]
pub struct BackendApi {
    gateway: Gateway,
}

impl BackendApi {
    pub fn new(base_url: &Url) -> Self {
        Self {
            gateway: Gateway::new(base_url),
        }
    }

    async fn call<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Reply {
        let payload = match body.map(serde_json::to_value).transpose() {
            Ok(payload) => payload,
            Err(e) => return Reply::network_error(format!("Failed to encode request: {e}")),
        };
        self.gateway.send(method, path, payload.as_ref(), token).await
    }

    async fn get(&self, path: &str, session: &Session) -> Reply {
        self.call::<Value>(Method::GET, path, None, session.token())
            .await
    }

    // ========== Authentication ==========

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiFailure> {
        let reply = self.call(Method::POST, "/login", Some(request), None).await;
        expect_auth(&reply, "Login failed")
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiFailure> {
        let reply = self.call(Method::POST, "/register", Some(request), None).await;
        expect_auth(&reply, "Registration failed")
    }

    pub async fn link_wallet(
        &self,
        session: &Session,
        wallet_address: WalletAddress,
    ) -> Result<User, ApiFailure> {
        let body = LinkWalletRequest { wallet_address };
        let reply = self
            .call(Method::POST, "/user/wallet", Some(&body), session.token())
            .await;
        expect_key(&reply, "user", "Failed to save the wallet address")
    }

    // ========== Elections ==========

    pub async fn list_elections(&self, session: &Session) -> Result<Vec<Election>, ApiFailure> {
        let reply = self.get("/elections", session).await;
        expect_array(&reply, "Failed to fetch elections")
    }

    pub async fn get_election(&self, session: &Session, id: u64) -> Result<Election, ApiFailure> {
        let reply = self.get(&format!("/elections/{id}"), session).await;
        if reply.is_error() || reply.body.get("id").is_none() {
            return Err(reply.failure("Election not found"));
        }
        reply
            .parse()
            .ok_or_else(|| ApiFailure::new("Election not found", reply.http_status))
    }

    pub async fn create_election(
        &self,
        session: &Session,
        form: &ElectionForm,
    ) -> Result<Election, ApiFailure> {
        let reply = self
            .call(Method::POST, "/elections", Some(form), session.token())
            .await;
        expect_key(&reply, "election", "Failed to create election")
    }

    pub async fn update_election(
        &self,
        session: &Session,
        id: u64,
        form: &ElectionForm,
    ) -> Result<Election, ApiFailure> {
        let reply = self
            .call(
                Method::PUT,
                &format!("/elections/{id}"),
                Some(form),
                session.token(),
            )
            .await;
        expect_key(&reply, "election", "Failed to update election")
    }

    // ========== Candidates ==========

    pub async fn list_candidates(
        &self,
        session: &Session,
        election_id: u64,
    ) -> Result<Vec<Candidate>, ApiFailure> {
        let reply = self
            .get(&format!("/elections/{election_id}/candidates"), session)
            .await;
        expect_array(&reply, "Failed to fetch candidates")
    }

    pub async fn add_candidate(
        &self,
        session: &Session,
        election_id: u64,
        request: &AddCandidateRequest,
    ) -> Result<Candidate, ApiFailure> {
        let reply = self
            .call(
                Method::POST,
                &format!("/elections/{election_id}/candidates"),
                Some(request),
                session.token(),
            )
            .await;
        expect_key(&reply, "candidate", "Failed to add candidate")
    }

    pub async fn remove_candidate(
        &self,
        session: &Session,
        candidate_id: u64,
    ) -> Result<(), ApiFailure> {
        let reply = self
            .call::<Value>(
                Method::DELETE,
                &format!("/candidates/{candidate_id}"),
                None,
                session.token(),
            )
            .await;
        if reply.message() == Some(CANDIDATE_REMOVED) {
            Ok(())
        } else {
            Err(reply.failure("Failed to remove candidate"))
        }
    }

    pub async fn search_users(
        &self,
        session: &Session,
        query: &str,
    ) -> Result<Vec<UserSummary>, ApiFailure> {
        self.search_users_with_token(session.token(), query).await
    }

    pub(crate) async fn search_users_with_token(
        &self,
        token: Option<&str>,
        query: &str,
    ) -> Result<Vec<UserSummary>, ApiFailure> {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let reply = self
            .call::<Value>(Method::GET, &format!("/users/search?q={encoded}"), None, token)
            .await;
        expect_array(&reply, "User search failed")
    }

    // ========== Votes ==========

    pub async fn vote_status(
        &self,
        session: &Session,
        election_id: u64,
    ) -> Result<VoteStatus, ApiFailure> {
        let reply = self
            .get(&format!("/elections/{election_id}/vote-status"), session)
            .await;
        if reply.is_error() {
            return Err(reply.failure("Failed to check voting eligibility"));
        }
        reply
            .parse()
            .ok_or_else(|| reply.failure("Failed to check voting eligibility"))
    }

    pub async fn record_vote(
        &self,
        session: &Session,
        election_id: u64,
        transaction_hash: &str,
    ) -> Result<(), ApiFailure> {
        let body = RecordVoteRequest {
            transaction_hash: transaction_hash.to_string(),
        };
        let reply = self
            .call(
                Method::POST,
                &format!("/elections/{election_id}/vote"),
                Some(&body),
                session.token(),
            )
            .await;
        if reply.is_error() {
            Err(reply.failure("Failed to record vote"))
        } else {
            Ok(())
        }
    }

    pub async fn my_votes(&self, session: &Session) -> Result<Vec<VoteRecord>, ApiFailure> {
        let reply = self.get("/my-votes", session).await;
        expect_array(&reply, "Failed to fetch your votes")
    }

    // ========== Admin ==========

    pub async fn admin_stats(&self, session: &Session) -> Result<AdminStats, ApiFailure> {
        let reply = self.get("/admin/stats", session).await;
        if reply.is_error() || reply.body.get("total_users").is_none() {
            return Err(reply.failure("Failed to load statistics"));
        }
        reply
            .parse()
            .ok_or_else(|| reply.failure("Failed to load statistics"))
    }
}

fn expect_auth(reply: &Reply, fallback: &str) -> Result<AuthResponse, ApiFailure> {
    match reply.parse::<AuthResponse>() {
        Some(auth) if !reply.is_error() && !auth.access_token.is_empty() => Ok(auth),
        _ => Err(reply.failure(fallback)),
    }
}

fn expect_key<T: DeserializeOwned>(reply: &Reply, key: &str, fallback: &str) -> Result<T, ApiFailure> {
    if reply.is_error() {
        return Err(reply.failure(fallback));
    }
    reply.field(key).ok_or_else(|| reply.failure(fallback))
}

fn expect_array<T: DeserializeOwned>(reply: &Reply, fallback: &str) -> Result<Vec<T>, ApiFailure> {
    if reply.is_error() || !reply.body.is_array() {
        return Err(reply.failure(fallback));
    }
    reply.parse().ok_or_else(|| reply.failure(fallback))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::ElectionStatus;
    use crate::test_support::FakeBackend;

    fn session() -> Session {
        let mut session = Session::default();
        session.begin("tok".into(), None);
        session
    }

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let backend = FakeBackend::start().await;
        backend.respond_json(
            "POST",
            "/login",
            200,
            json!({
                "access_token": "abc",
                "user": { "id": 1, "name": "Olena", "email": "o@example.com", "role": "admin" }
            }),
        );

        let auth = backend
            .api()
            .login(&LoginRequest {
                email: "o@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(auth.access_token, "abc");
        assert_eq!(auth.user.unwrap().name, "Olena");
    }

    #[tokio::test]
    async fn login_failure_uses_backend_message_or_default() {
        let backend = FakeBackend::start().await;
        backend.respond_json("POST", "/login", 401, json!({ "message": "Invalid credentials" }));
        backend.respond_json("POST", "/register", 200, json!({}));
        let api = backend.api();

        let err = api
            .login(&LoginRequest {
                email: "x".into(),
                password: "y".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid credentials");

        let err = api.register(&RegisterRequest::default()).await.unwrap_err();
        assert_eq!(err.message, "Registration failed");
    }

    #[tokio::test]
    async fn create_election_expects_election_key() {
        let backend = FakeBackend::start().await;
        backend.respond_json(
            "POST",
            "/elections",
            201,
            json!({ "election": {
                "id": 5, "title": "Council", "description": null,
                "start_date": "2025-01-01 10:00:00", "end_date": "2025-01-02 10:00:00",
                "status": "planned"
            }}),
        );

        let election = backend
            .api()
            .create_election(&session(), &ElectionForm::default())
            .await
            .unwrap();

        assert_eq!(election.id, 5);
        assert_eq!(election.status, ElectionStatus::Planned);
    }

    #[tokio::test]
    async fn get_election_without_id_is_not_found() {
        let backend = FakeBackend::start().await;
        backend.respond_json("GET", "/elections/3", 200, json!({}));

        let err = backend.api().get_election(&session(), 3).await.unwrap_err();
        assert_eq!(err.message, "Election not found");
    }

    #[tokio::test]
    async fn list_endpoints_require_an_array() {
        let backend = FakeBackend::start().await;
        backend.respond_json("GET", "/elections", 200, json!({ "data": [] }));
        backend.respond_json("GET", "/my-votes", 200, json!([]));
        let api = backend.api();

        assert!(api.list_elections(&session()).await.is_err());
        assert_eq!(api.my_votes(&session()).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn remove_candidate_requires_exact_confirmation() {
        let backend = FakeBackend::start().await;
        backend.respond_json("DELETE", "/candidates/1", 200, json!({ "message": CANDIDATE_REMOVED }));
        backend.respond_json("DELETE", "/candidates/2", 200, json!({ "message": "Deleted" }));
        let api = backend.api();

        assert!(api.remove_candidate(&session(), 1).await.is_ok());
        let err = api.remove_candidate(&session(), 2).await.unwrap_err();
        assert_eq!(err.message, "Deleted");
    }

    #[tokio::test]
    async fn search_query_is_url_encoded() {
        let backend = FakeBackend::start().await;
        backend.respond_json("GET", "/users/search", 200, json!([{ "id": 3, "name": "Ol Ha" }]));

        let users = backend.api().search_users(&session(), "Ol Ha&x").await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(backend.requests()[0].path, "/users/search?q=Ol+Ha%26x");
    }

    #[tokio::test]
    async fn admin_stats_require_total_users() {
        let backend = FakeBackend::start().await;
        backend.respond_json(
            "GET",
            "/admin/stats",
            200,
            json!({ "total_users": 10, "total_votes": 4, "active_elections": 1 }),
        );

        let stats = backend.api().admin_stats(&session()).await.unwrap();
        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.active_elections, 1);
    }

    #[tokio::test]
    async fn record_vote_fails_on_error_status_field() {
        let backend = FakeBackend::start().await;
        backend.respond_json(
            "POST",
            "/elections/1/vote",
            200,
            json!({ "status": "error", "message": "Duplicate vote" }),
        );

        let err = backend
            .api()
            .record_vote(&session(), 1, "0xabc")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Duplicate vote");
        assert_eq!(
            serde_json::from_str::<Value>(&backend.requests()[0].body).unwrap(),
            json!({ "transaction_hash": "0xabc" })
        );
    }
}
