use serde::{Deserialize, Serialize};

use portal_auth::Role;
use portal_core::UserId;

/// A user account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Body of `POST /users`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
}

impl CreateUserRequest {
    /// New account request; roles default to `ROLE_USER`.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            roles: vec![Role::USER],
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }
}

impl core::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Body of `PUT /users/{id}`. Absent fields are left unchanged server-side.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl core::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("email", &self.email)
            .field("password_changed", &self.password.is_some())
            .finish()
    }
}

/// Body of `PUT /users/{id}/roles`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateRolesRequest<'a> {
    pub roles: &'a [Role],
}
