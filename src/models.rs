// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Platform Data Models
//!
//! Records the client reads from and writes to the voting backend. The
//! backend owns every one of them; the client only caches what the last
//! response contained.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters) as they travel through JSON. Conversion to an on-chain
//! `Address` happens in the blockchain module.
//!
//! ## Model Categories
//!
//! - **Users**: profiles returned by login, register and wallet linking
//! - **Elections**: election records and the admin forms that edit them
//! - **Candidates**: per-election candidates (vote counts come from the chain)
//! - **Votes**: eligibility checks and the voter's own vote history
//! - **Stats**: admin dashboard counters

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::Role;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
///
/// # Example
///
/// ```rust,ignore
/// let addr = WalletAddress::from("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// User Models
// =============================================================================

/// Full user profile as returned by the backend after login or wallet linking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Missing roles are treated as a plain voter.
    #[serde(default)]
    pub role: Role,
    /// Linked wallet, if the user has connected one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<WalletAddress>,
}

/// Short user record returned by search and embedded in candidates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /register` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub national_id: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterRequest {
    /// Local form checks run before anything is sent.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("national_id", &self.national_id),
            ("password", &self.password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("Field `{field}` is required"));
        }
        if self.password != self.password_confirmation {
            return Err("Passwords do not match".to_string());
        }
        Ok(())
    }
}

/// Successful login/register response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// `POST /user/wallet` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkWalletRequest {
    pub wallet_address: WalletAddress,
}

// =============================================================================
// Election Models
// =============================================================================

/// Lifecycle status of an election.
///
/// On chain only a boolean "active" flag exists; see [`ElectionStatus::is_active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

impl ElectionStatus {
    /// Value of the contract's active flag for this status.
    pub fn is_active(self) -> bool {
        matches!(self, ElectionStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElectionStatus::Planned => "planned",
            ElectionStatus::Active => "active",
            ElectionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ElectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planned" => Ok(ElectionStatus::Planned),
            "active" => Ok(ElectionStatus::Active),
            "completed" => Ok(ElectionStatus::Completed),
            other => Err(format!("unknown election status `{other}`")),
        }
    }
}

/// An election record.
///
/// Only `id` is required; the other fields fall back to their defaults when
/// the backend omits them or sends `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Election {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Timestamps are kept as the backend sent them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ElectionStatus,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /elections` and `PUT /elections/:id`.
///
/// `status` is only sent on edit; new elections always start as planned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElectionForm {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ElectionStatus>,
}

impl ElectionForm {
    /// Prefill an edit form from an existing record.
    pub fn from_election(election: &Election) -> Self {
        Self {
            title: election.title.clone(),
            description: election.description.clone().unwrap_or_default(),
            start_date: format_for_input(&election.start_date),
            end_date: format_for_input(&election.end_date),
            status: Some(election.status),
        }
    }

    /// Required-field check: title, start and end.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("title", &self.title),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ];
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((field, _)) => Err(format!("Field `{field}` is required")),
            None => Ok(()),
        }
    }
}

/// Format a backend timestamp as a local `datetime-local` value
/// (`YYYY-MM-DDTHH:MM`). Unparseable input is returned unchanged.
pub fn format_for_input(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Local)
            .format("%Y-%m-%dT%H:%M")
            .to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format("%Y-%m-%dT%H:%M").to_string();
        }
    }
    raw.to_string()
}

// =============================================================================
// Candidate Models
// =============================================================================

/// A candidate standing in one election.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    #[serde(default)]
    pub election_id: Option<u64>,
    pub user: UserSummary,
    #[serde(default)]
    pub bio: Option<String>,
    /// Live count read from the voting contract, never from the backend.
    #[serde(skip_deserializing, default)]
    pub votes: u64,
}

/// `POST /elections/:id/candidates` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCandidateRequest {
    pub user_id: u64,
    pub bio: String,
}

// =============================================================================
// Vote Models
// =============================================================================

/// Reply of `GET /elections/:id/vote-status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteStatus {
    pub can_vote: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /elections/:id/vote` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordVoteRequest {
    pub transaction_hash: String,
}

/// Election reference embedded in a vote record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElectionRef {
    pub id: u64,
    pub title: String,
}

/// One entry of `GET /my-votes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRecord {
    pub id: u64,
    pub election: ElectionRef,
    /// `None` while the on-chain hash has not been written back.
    #[serde(default)]
    pub transaction_hash: Option<String>,
    pub created_at: String,
}

impl VoteRecord {
    pub fn is_confirmed(&self) -> bool {
        self.transaction_hash
            .as_deref()
            .is_some_and(|hash| !hash.is_empty())
    }
}

// =============================================================================
// Admin Models
// =============================================================================

/// Reply of `GET /admin/stats`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminStats {
    pub total_users: u64,
    #[serde(default)]
    pub total_votes: u64,
    #[serde(default)]
    pub active_elections: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_election_only_needs_an_id() {
        let election: Election =
            serde_json::from_str(r#"{"id":7,"title":"Council","status":null,"end_date":null}"#)
                .unwrap();
        assert_eq!(election.id, 7);
        assert_eq!(election.title, "Council");
        assert_eq!(election.status, ElectionStatus::Planned);
        assert!(election.start_date.is_empty());
        assert!(election.end_date.is_empty());

        assert!(serde_json::from_str::<Election>(r#"{"title":"Council"}"#).is_err());
    }

    #[test]
    fn wallet_address_from_and_into_string() {
        let from_str: WalletAddress = "abc".into();
        assert_eq!(from_str.0, "abc");

        let from_string: WalletAddress = String::from("def").into();
        assert_eq!(from_string.0, "def");

        let to_string: String = WalletAddress("ghi".into()).into();
        assert_eq!(to_string, "ghi");
    }

    #[test]
    fn user_without_role_defaults_to_voter() {
        let user: User =
            serde_json::from_str(r#"{"id":7,"name":"Olena","email":"o@example.com"}"#).unwrap();
        assert_eq!(user.role, Role::Voter);
        assert!(user.wallet_address.is_none());
    }

    #[test]
    fn register_validation_requires_matching_passwords() {
        let mut form = RegisterRequest {
            name: "Olena".into(),
            email: "o@example.com".into(),
            national_id: "AB123".into(),
            password: "secret".into(),
            password_confirmation: "other".into(),
        };
        assert_eq!(form.validate(), Err("Passwords do not match".to_string()));

        form.password_confirmation = "secret".into();
        assert!(form.validate().is_ok());

        form.national_id.clear();
        assert!(form.validate().unwrap_err().contains("national_id"));
    }

    #[test]
    fn election_form_requires_title_and_dates() {
        let form = ElectionForm {
            title: "  ".into(),
            start_date: "2025-01-01T10:00".into(),
            end_date: "2025-01-02T10:00".into(),
            ..Default::default()
        };
        assert!(form.validate().unwrap_err().contains("title"));
    }

    #[test]
    fn new_election_form_omits_status() {
        let form = ElectionForm {
            title: "Council".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("status").is_none());
    }

    #[test]
    fn format_for_input_handles_naive_timestamps() {
        assert_eq!(format_for_input("2025-03-01 09:30:00"), "2025-03-01T09:30");
        assert_eq!(format_for_input(""), "");
        assert_eq!(format_for_input("not a date"), "not a date");
    }

    #[test]
    fn candidate_votes_are_never_read_from_backend() {
        let candidate: Candidate = serde_json::from_str(
            r#"{"id":1,"user":{"id":2,"name":"Taras"},"bio":null,"votes":99}"#,
        )
        .unwrap();
        assert_eq!(candidate.votes, 0);
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!("Active".parse::<ElectionStatus>(), Ok(ElectionStatus::Active));
        assert!(ElectionStatus::Active.is_active());
        assert!(!ElectionStatus::Completed.is_active());
        assert!("closed".parse::<ElectionStatus>().is_err());
    }

    #[test]
    fn vote_without_hash_is_pending() {
        let vote = VoteRecord {
            id: 1,
            election: ElectionRef {
                id: 2,
                title: "Council".into(),
            },
            transaction_hash: None,
            created_at: "2025-01-01T00:00:00Z".into(),
        };
        assert!(!vote.is_confirmed());
    }
}
