use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Role;

/// Identity derived from the credential currently held by the session.
///
/// This is a non-authoritative view: it is rebuilt from the credential on every
/// login/startup and never persisted on its own. `issued_at` / `expires_at` are
/// carried for display only; nothing in this workspace enforces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Roles in token order. An absent and an empty `roles` claim both land here
    /// as an empty vector.
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            roles: Vec::new(),
            issued_at: None,
            expires_at: None,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// First held role (in token order) that also appears in `candidates`.
    pub fn first_matching_role(&self, candidates: &BTreeSet<Role>) -> Option<&Role> {
        self.roles.iter().find(|held| candidates.contains(*held))
    }
}
