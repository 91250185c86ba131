//! Route requirement declarations.
//!
//! Each protected path pattern carries a [`Requirement`]; paths with no entry
//! (or declared public) are rendered for everyone.

use crate::authorize::{GuardOutcome, Requirement, SessionView, evaluate, explain};
use crate::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteEntry {
    pattern: String,
    requirement: Option<Requirement>,
}

/// Ordered table of route patterns; the first matching pattern wins.
///
/// Patterns are `/`-separated; a `:name` segment matches any single non-empty
/// segment (`/admin/users/:id/edit`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(mut self, pattern: impl Into<String>) -> Self {
        self.routes.push(RouteEntry {
            pattern: pattern.into(),
            requirement: None,
        });
        self
    }

    pub fn protect(mut self, pattern: impl Into<String>, requirement: Requirement) -> Self {
        self.routes.push(RouteEntry {
            pattern: pattern.into(),
            requirement: Some(requirement),
        });
        self
    }

    /// The console's route declarations.
    pub fn console() -> Self {
        let admins = || Requirement::any_role([Role::ADMIN, Role::SUPER_ADMIN]);
        let user_editors = || Requirement::any_role([Role::ADMIN, Role::EDITOR, Role::SUPER_ADMIN]);

        Self::new()
            .public("/")
            .public("/login")
            .public("/register")
            .protect("/dashboard", Requirement::Authenticated)
            .protect("/profile", Requirement::Authenticated)
            .protect("/admin/users", admins())
            .protect("/admin/users/new", user_editors())
            .protect("/admin/users/:id/edit", user_editors())
    }

    /// Requirement of the first pattern matching `path`, if it is protected.
    pub fn requirement_for(&self, path: &str) -> Option<&Requirement> {
        let path = strip_query(path);
        self.routes
            .iter()
            .find(|r| pattern_matches(&r.pattern, path))
            .and_then(|r| r.requirement.as_ref())
    }

    /// Guard a navigation to `path`.
    ///
    /// Unprotected and unknown paths are allowed; the not-found page is a view
    /// concern.
    pub fn navigate<S>(&self, session: &S, path: &str) -> GuardOutcome
    where
        S: SessionView + ?Sized,
    {
        let Some(requirement) = self.requirement_for(path) else {
            return GuardOutcome::Allow;
        };

        let outcome = evaluate(session, requirement);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let decision = explain(session, requirement);
            tracing::debug!(
                path,
                outcome = ?decision.outcome,
                reason = %decision.reason,
                "route guard evaluated"
            );
        }
        outcome
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pat = segments(pattern);
    let mut actual = segments(path);
    loop {
        match (pat.next(), actual.next()) {
            (None, None) => return true,
            (Some(p), Some(a)) => {
                if !p.starts_with(':') && p != a {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
