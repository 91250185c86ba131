use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Identity;

/// Role identifier used for route and action requirements.
///
/// Roles are opaque strings compared by exact, case-sensitive equality. The
/// console's well-known roles are exposed as constants but any name the token
/// carries is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const USER: Role = Role::from_static("ROLE_USER");
    pub const EDITOR: Role = Role::from_static("ROLE_EDITOR");
    pub const ADMIN: Role = Role::from_static("ROLE_ADMIN");
    pub const SUPER_ADMIN: Role = Role::from_static("ROLE_SUPER_ADMIN");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name shown in tables and pickers (`ROLE_EDITOR` -> `EDITOR`).
    pub fn display_name(&self) -> &str {
        self.as_str().strip_prefix("ROLE_").unwrap_or(self.as_str())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// True when the identity may manage other users' roles and permissions.
pub fn is_admin(identity: &Identity) -> bool {
    identity.has_role(&Role::ADMIN) || identity.has_role(&Role::SUPER_ADMIN)
}

/// Roles an actor is allowed to hand out when creating an account.
///
/// - super admins assign whatever was requested (`ROLE_USER` if nothing was)
/// - admins can only create editors
/// - everyone else creates basic users
///
/// The server re-checks this; the result only shapes what the create form sends.
pub fn assignable_roles(actor: &Identity, requested: Option<&Role>) -> Vec<Role> {
    if actor.has_role(&Role::SUPER_ADMIN) {
        vec![requested.cloned().unwrap_or(Role::USER)]
    } else if actor.has_role(&Role::ADMIN) {
        vec![Role::EDITOR]
    } else {
        vec![Role::USER]
    }
}
