use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Identity, Role};

/// Capability requirement attached to a route or UI affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated user.
    Authenticated,
    /// Any authenticated user holding at least one of these roles.
    ///
    /// An empty set behaves like `Authenticated`.
    AnyRole(BTreeSet<Role>),
}

impl Requirement {
    pub fn any_role<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    fn required_roles(&self) -> Option<&BTreeSet<Role>> {
        match self {
            Requirement::Authenticated => None,
            Requirement::AnyRole(roles) if roles.is_empty() => None,
            Requirement::AnyRole(roles) => Some(roles),
        }
    }
}

/// Result of guarding a navigation or action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOutcome {
    Allow,
    RedirectLogin,
    /// Authenticated but lacking every required role. Sends the user to the
    /// application root rather than an error page.
    RedirectForbidden,
}

impl GuardOutcome {
    pub const LOGIN_PATH: &'static str = "/login";
    pub const ROOT_PATH: &'static str = "/";

    pub fn is_allowed(self) -> bool {
        self == GuardOutcome::Allow
    }

    /// Where the router should go instead, if anywhere.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            GuardOutcome::Allow => None,
            GuardOutcome::RedirectLogin => Some(Self::LOGIN_PATH),
            GuardOutcome::RedirectForbidden => Some(Self::ROOT_PATH),
        }
    }
}

/// Read-only view of the current session, passed to the guard explicitly.
pub trait SessionView {
    fn identity(&self) -> Option<&Identity>;

    fn is_authenticated(&self) -> bool;
}

/// Decide whether the session satisfies `requirement`.
///
/// - Authentication is checked first, so an anonymous user always goes to login.
/// - Role matching is "any of": one shared role is enough.
/// - No state is kept between calls; re-evaluate on every render.
///
/// This is a convenience for the UI only; the server must enforce every
/// privileged operation on its own.
pub fn evaluate<S>(session: &S, requirement: &Requirement) -> GuardOutcome
where
    S: SessionView + ?Sized,
{
    if !session.is_authenticated() {
        return GuardOutcome::RedirectLogin;
    }

    let Some(required) = requirement.required_roles() else {
        return GuardOutcome::Allow;
    };

    let held = session.identity().map(|i| i.roles.as_slice()).unwrap_or_default();
    if held.iter().any(|r| required.contains(r)) {
        GuardOutcome::Allow
    } else {
        GuardOutcome::RedirectForbidden
    }
}

/// Convenience for affordances (menu entries, buttons) that hide rather than redirect.
pub fn can<S>(session: &S, requirement: &Requirement) -> bool
where
    S: SessionView + ?Sized,
{
    evaluate(session, requirement).is_allowed()
}

/// Detailed explanation of a guard decision, for structured debug logs.
#[derive(Debug, Clone, Serialize)]
pub struct GuardDecision {
    pub outcome: GuardOutcome,
    pub reason: String,
    pub required_roles: Vec<Role>,
    pub held_roles: Vec<Role>,
    /// The held role that satisfied the requirement, when one was needed.
    pub matched_role: Option<Role>,
}

/// Same decision as [`evaluate`], with the reasoning spelled out.
pub fn explain<S>(session: &S, requirement: &Requirement) -> GuardDecision
where
    S: SessionView + ?Sized,
{
    let required_roles: Vec<Role> = requirement
        .required_roles()
        .map(|r| r.iter().cloned().collect())
        .unwrap_or_default();
    let held_roles: Vec<Role> = session
        .identity()
        .map(|i| i.roles.clone())
        .unwrap_or_default();

    if !session.is_authenticated() {
        return GuardDecision {
            outcome: GuardOutcome::RedirectLogin,
            reason: "no authenticated session".to_string(),
            required_roles,
            held_roles,
            matched_role: None,
        };
    }

    let Some(required) = requirement.required_roles() else {
        return GuardDecision {
            outcome: GuardOutcome::Allow,
            reason: "any authenticated user is allowed".to_string(),
            required_roles,
            held_roles,
            matched_role: None,
        };
    };

    match session.identity().and_then(|i| i.first_matching_role(required)) {
        Some(role) => GuardDecision {
            outcome: GuardOutcome::Allow,
            reason: format!("holds required role '{role}'"),
            matched_role: Some(role.clone()),
            required_roles,
            held_roles,
        },
        None => GuardDecision {
            outcome: GuardOutcome::RedirectForbidden,
            reason: format!(
                "holds none of the required roles {:?}",
                required_roles.iter().map(Role::as_str).collect::<Vec<_>>()
            ),
            required_roles,
            held_roles,
            matched_role: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Fixed {
        identity: Option<Identity>,
    }

    impl SessionView for Fixed {
        fn identity(&self) -> Option<&Identity> {
            self.identity.as_ref()
        }

        fn is_authenticated(&self) -> bool {
            self.identity.is_some()
        }
    }

    fn signed_in(roles: &[Role]) -> Fixed {
        Fixed {
            identity: Some(Identity::new("alice").with_roles(roles.to_vec())),
        }
    }

    fn anonymous() -> Fixed {
        Fixed { identity: None }
    }

    #[test]
    fn anonymous_is_sent_to_login() {
        let s = anonymous();
        assert_eq!(evaluate(&s, &Requirement::Authenticated), GuardOutcome::RedirectLogin);
        assert_eq!(
            evaluate(&s, &Requirement::any_role([Role::ADMIN])),
            GuardOutcome::RedirectLogin
        );
        assert_eq!(
            evaluate(&s, &Requirement::AnyRole(BTreeSet::new())),
            GuardOutcome::RedirectLogin
        );
    }

    #[test]
    fn editor_is_forbidden_from_admin_only_routes() {
        let s = signed_in(&[Role::EDITOR]);
        let req = Requirement::any_role([Role::ADMIN, Role::SUPER_ADMIN]);
        let outcome = evaluate(&s, &req);
        assert_eq!(outcome, GuardOutcome::RedirectForbidden);
        assert_eq!(outcome.redirect_target(), Some("/"));
    }

    #[test]
    fn one_matching_role_is_enough() {
        let s = signed_in(&[Role::EDITOR]);
        let req = Requirement::any_role([Role::EDITOR, Role::ADMIN]);
        assert_eq!(evaluate(&s, &req), GuardOutcome::Allow);
    }

    #[test]
    fn roleless_user_passes_authenticated_only_requirements() {
        let s = signed_in(&[]);
        assert_eq!(evaluate(&s, &Requirement::Authenticated), GuardOutcome::Allow);
        assert_eq!(
            evaluate(&s, &Requirement::AnyRole(BTreeSet::new())),
            GuardOutcome::Allow
        );
        assert_eq!(
            evaluate(&s, &Requirement::any_role([Role::USER])),
            GuardOutcome::RedirectForbidden
        );
    }

    #[test]
    fn role_match_is_case_sensitive() {
        let s = signed_in(&[Role::new("role_admin")]);
        assert!(!can(&s, &Requirement::any_role([Role::ADMIN])));
    }

    #[test]
    fn explanation_names_the_matching_role() {
        let s = signed_in(&[Role::USER, Role::SUPER_ADMIN]);
        let d = explain(&s, &Requirement::any_role([Role::ADMIN, Role::SUPER_ADMIN]));
        assert_eq!(d.outcome, GuardOutcome::Allow);
        assert_eq!(d.matched_role, Some(Role::SUPER_ADMIN));

        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["outcome"], "allow");
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::USER),
            Just(Role::EDITOR),
            Just(Role::ADMIN),
            Just(Role::SUPER_ADMIN),
            "[A-Z_]{1,8}".prop_map(Role::from),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the outcome is a pure function of (authenticated, roles, requirement),
        /// and `explain` always agrees with `evaluate`.
        #[test]
        fn evaluation_is_deterministic(
            authenticated in any::<bool>(),
            held in prop::collection::vec(role_strategy(), 0..5),
            required in prop::collection::btree_set(role_strategy(), 0..5),
        ) {
            let session = if authenticated { signed_in(&held) } else { anonymous() };
            let req = Requirement::AnyRole(required.clone());

            let first = evaluate(&session, &req);
            prop_assert_eq!(first, evaluate(&session, &req));
            prop_assert_eq!(first, explain(&session, &req).outcome);

            let expected = if !authenticated {
                GuardOutcome::RedirectLogin
            } else if required.is_empty() || held.iter().any(|r| required.contains(r)) {
                GuardOutcome::Allow
            } else {
                GuardOutcome::RedirectForbidden
            };
            prop_assert_eq!(first, expected);
        }
    }
}
