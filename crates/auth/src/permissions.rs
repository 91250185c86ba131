use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Fine-grained permission code, conventionally `DOMAIN:RESOURCE:ACTION`.
///
/// Codes are opaque strings compared by exact equality. The shape is a naming
/// convention only; nothing here rejects a code for not following it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionCode(Cow<'static, str>);

impl PermissionCode {
    pub const ACADEMIC_READ: PermissionCode = PermissionCode::from_static("PROGRAM:ACADEMIC:READ");
    pub const ACADEMIC_UPDATE: PermissionCode =
        PermissionCode::from_static("PROGRAM:ACADEMIC:UPDATE");
    pub const PROGRAMME_READ: PermissionCode =
        PermissionCode::from_static("PROGRAM:PROGRAMME:READ");
    pub const PROGRAMME_UPDATE: PermissionCode =
        PermissionCode::from_static("PROGRAM:PROGRAMME:UPDATE");
    pub const MANAGE_USER_PERMISSIONS: PermissionCode =
        PermissionCode::from_static("IAM:MANAGE_USER_PERMISSIONS");

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(domain, resource, action)` for grouping in views.
    ///
    /// `None` when the code does not have exactly three non-empty segments.
    pub fn parts(&self) -> Option<(&str, &str, &str)> {
        let mut it = self.as_str().split(':');
        let domain = it.next().filter(|s| !s.is_empty())?;
        let resource = it.next().filter(|s| !s.is_empty())?;
        let action = it.next().filter(|s| !s.is_empty())?;
        if it.next().is_some() {
            return None;
        }
        Some((domain, resource, action))
    }
}

impl core::fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for PermissionCode {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for PermissionCode {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Every code the console offers as a togglable option.
pub const CATALOG: [PermissionCode; 5] = [
    PermissionCode::ACADEMIC_READ,
    PermissionCode::ACADEMIC_UPDATE,
    PermissionCode::PROGRAMME_READ,
    PermissionCode::PROGRAMME_UPDATE,
    PermissionCode::MANAGE_USER_PERMISSIONS,
];

/// A user's permission codes.
///
/// Fetched and replaced wholesale through the permission delegate; local edits
/// happen with `toggle` before the whole set is sent back. Serializes as a
/// sorted JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<PermissionCode>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &PermissionCode) -> bool {
        self.0.contains(code)
    }

    pub fn insert(&mut self, code: PermissionCode) -> bool {
        self.0.insert(code)
    }

    pub fn remove(&mut self, code: &PermissionCode) -> bool {
        self.0.remove(code)
    }

    /// Flip membership of `code`; returns whether it is present afterwards.
    pub fn toggle(&mut self, code: PermissionCode) -> bool {
        if self.0.remove(&code) {
            false
        } else {
            self.0.insert(code);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionCode> {
        self.0.iter()
    }
}

impl FromIterator<PermissionCode> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionCode>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PermissionSet {
    type Item = PermissionCode;
    type IntoIter = std::collections::btree_set::IntoIter<PermissionCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Codes the server grants implicitly through a role.
///
/// Used as a display hint next to the toggles; the server mapping is authoritative.
pub fn permissions_for_role(role: &Role) -> PermissionSet {
    match role.as_str() {
        "ACADEMIC_VIEWER" => [PermissionCode::ACADEMIC_READ].into_iter().collect(),
        "ACADEMIC_EDITOR" => [PermissionCode::ACADEMIC_READ, PermissionCode::ACADEMIC_UPDATE]
            .into_iter()
            .collect(),
        "PROGRAMME_VIEWER" => [PermissionCode::PROGRAMME_READ].into_iter().collect(),
        "PROGRAMME_EDITOR" => [PermissionCode::PROGRAMME_READ, PermissionCode::PROGRAMME_UPDATE]
            .into_iter()
            .collect(),
        "ROLE_SUPER_ADMIN" => CATALOG.into_iter().collect(),
        "ROLE_ADMIN" => [PermissionCode::MANAGE_USER_PERMISSIONS].into_iter().collect(),
        _ => PermissionSet::new(),
    }
}
