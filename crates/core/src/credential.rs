//! Opaque bearer credential.

use serde::{Deserialize, Serialize};

/// An opaque signed token representing an authenticated session.
///
/// The value is never inspected here; claims extraction lives in `portal-auth`.
/// `Debug` is redacted so a credential can sit inside structs that get logged.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract a credential from an `Authorization` header value.
    ///
    /// Returns `None` unless the value is `Bearer <token>` with a non-empty token.
    pub fn from_bearer_header(header: &str) -> Option<Self> {
        let token = header.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }
        Some(Self(token.to_string()))
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Credential(<redacted, {} bytes>)", self.0.len())
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
