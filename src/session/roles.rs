// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and the navigation each role sees.

use serde::{Deserialize, Serialize};

use super::guard::Route;

/// User roles as reported by the backend.
///
/// ## Role Hierarchy
///
/// - `Admin` - manages elections and candidates, sees platform statistics
/// - `Voter` - casts votes and reviews their own vote history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Least privilege for authenticated users.
    #[default]
    Voter,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        matches!(
            (self, required),
            (Role::Admin, _) | (Role::Voter, Role::Voter)
        )
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Voter => write!(f, "voter"),
        }
    }
}

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub route: Route,
    pub label: &'static str,
}

/// Links shown for a role. Everybody gets the home and governance pages;
/// voters add their vote history, admins add the statistics dashboard.
/// Unknown profiles (`None`) only get the common links.
pub fn navigation_links(role: Option<Role>) -> Vec<NavLink> {
    let mut links = vec![
        NavLink {
            route: Route::Elections,
            label: "Home",
        },
        NavLink {
            route: Route::Governance,
            label: "Governance (DPoS)",
        },
    ];
    match role {
        Some(Role::Voter) => links.push(NavLink {
            route: Route::MyVotes,
            label: "My votes",
        }),
        Some(Role::Admin) => links.push(NavLink {
            route: Route::AdminStats,
            label: "Statistics",
        }),
        None => {}
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Voter));
    }

    #[test]
    fn voter_only_has_voter_privilege() {
        assert!(!Role::Voter.has_privilege(Role::Admin));
        assert!(Role::Voter.has_privilege(Role::Voter));
    }

    #[test]
    fn default_role_is_voter() {
        assert_eq!(Role::default(), Role::Voter);
    }

    #[test]
    fn navigation_depends_on_role() {
        let voter: Vec<Route> = navigation_links(Some(Role::Voter))
            .into_iter()
            .map(|l| l.route)
            .collect();
        assert_eq!(voter, vec![Route::Elections, Route::Governance, Route::MyVotes]);

        let admin: Vec<Route> = navigation_links(Some(Role::Admin))
            .into_iter()
            .map(|l| l.route)
            .collect();
        assert_eq!(admin, vec![Route::Elections, Route::Governance, Route::AdminStats]);

        assert_eq!(navigation_links(None).len(), 2);
    }
}
