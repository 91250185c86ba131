//! Command handlers. Each returns the JSON document printed on stdout.

use anyhow::{Context, bail};
use serde_json::{Value, json};

use portal_auth::permissions::CATALOG;
use portal_auth::{PermissionCode, RouteTable, explain};
use portal_core::{Credential, UserId};
use portal_directory::{PermissionDelegate, UserDirectory, toggle_permission};
use portal_session::{AuthorizationContext, KeyValueStore};

pub fn login<S: KeyValueStore>(
    ctx: &mut AuthorizationContext<S>,
    token: &str,
) -> anyhow::Result<Value> {
    let credential = Credential::from_bearer_header(token)
        .unwrap_or_else(|| Credential::new(token.trim()));
    let identity = ctx.login(credential).context("login failed")?;
    Ok(json!({ "authenticated": true, "identity": identity }))
}

pub fn whoami<S: KeyValueStore>(ctx: &AuthorizationContext<S>) -> Value {
    match ctx.identity() {
        Some(identity) => json!({ "authenticated": true, "identity": identity }),
        None => json!({ "authenticated": false }),
    }
}

/// Memory is reset even when clearing storage fails; the failure is surfaced
/// as a warning so the user knows the session may resume on next start.
pub fn logout<S: KeyValueStore>(ctx: &mut AuthorizationContext<S>) -> Value {
    match ctx.logout() {
        Ok(()) => json!({ "authenticated": false }),
        Err(err) => json!({
            "authenticated": false,
            "warning": format!("credential may still be stored: {err}"),
        }),
    }
}

pub fn check<S: KeyValueStore>(
    ctx: &AuthorizationContext<S>,
    routes: &RouteTable,
    path: &str,
) -> Value {
    let outcome = routes.navigate(ctx, path);
    let decision = routes.requirement_for(path).map(|req| explain(ctx, req));
    json!({
        "path": path,
        "outcome": outcome,
        "redirect": outcome.redirect_target(),
        "decision": decision,
    })
}

pub async fn me<D: UserDirectory + ?Sized>(directory: &D) -> anyhow::Result<Value> {
    let user = directory.me().await.context("fetching current account")?;
    Ok(serde_json::to_value(user)?)
}

pub async fn users<D: UserDirectory + ?Sized>(directory: &D) -> anyhow::Result<Value> {
    let users = directory.list_users().await.context("listing accounts")?;
    Ok(serde_json::to_value(users)?)
}

pub async fn permissions_get<D: PermissionDelegate + ?Sized>(
    delegate: &D,
    id: i64,
) -> anyhow::Result<Value> {
    let id = UserId::new(id);
    let granted = delegate
        .fetch_permissions(id)
        .await
        .with_context(|| format!("fetching permissions of user {id}"))?;
    Ok(json!({ "user_id": id, "permissions": granted }))
}

pub async fn permissions_toggle<D: PermissionDelegate + ?Sized>(
    delegate: &D,
    id: i64,
    code: &str,
) -> anyhow::Result<Value> {
    let code = parse_code(code)?;
    let id = UserId::new(id);
    let granted = toggle_permission(delegate, id, code.clone())
        .await
        .with_context(|| format!("toggling {code} for user {id}"))?;
    Ok(json!({
        "user_id": id,
        "code": code,
        "granted": granted.contains(&code),
        "permissions": granted,
    }))
}

pub fn permissions_catalog() -> Value {
    let entries: Vec<Value> = CATALOG
        .iter()
        .map(|code| match code.parts() {
            Some((domain, resource, action)) => json!({
                "code": code,
                "domain": domain,
                "resource": resource,
                "action": action,
            }),
            None => json!({ "code": code }),
        })
        .collect();
    Value::Array(entries)
}

/// Only catalogued codes are accepted; a typo would otherwise be granted verbatim.
fn parse_code(raw: &str) -> anyhow::Result<PermissionCode> {
    match CATALOG.iter().find(|code| code.as_str() == raw.trim()) {
        Some(code) => Ok(code.clone()),
        None => bail!("unknown permission code '{raw}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use portal_session::{MemoryStore, SessionStore};

    fn token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        format!("{header}.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    fn context() -> AuthorizationContext<MemoryStore> {
        AuthorizationContext::init(SessionStore::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn login_accepts_bearer_header_value() {
        let mut ctx = context();
        let out = login(&mut ctx, &format!("Bearer {}", token(r#"{"sub":"alice"}"#))).unwrap();
        assert_eq!(out["identity"]["username"], "alice");
        assert_eq!(whoami(&ctx)["authenticated"], true);
    }

    #[test]
    fn failed_login_is_an_error_and_leaves_session_empty() {
        let mut ctx = context();
        assert!(login(&mut ctx, "garbage").is_err());
        assert_eq!(whoami(&ctx), json!({ "authenticated": false }));
    }

    #[test]
    fn check_reports_redirect_and_reason() {
        let mut ctx = context();
        let routes = RouteTable::console();

        let out = check(&ctx, &routes, "/admin/users");
        assert_eq!(out["outcome"], "redirect_login");
        assert_eq!(out["redirect"], "/login");

        login(&mut ctx, &token(r#"{"sub":"ed","roles":["ROLE_EDITOR"]}"#)).unwrap();
        let out = check(&ctx, &routes, "/admin/users");
        assert_eq!(out["outcome"], "redirect_forbidden");
        assert_eq!(out["redirect"], "/");

        let out = check(&ctx, &routes, "/admin/users/3/edit");
        assert_eq!(out["outcome"], "allow");
        assert_eq!(out["decision"]["matched_role"], "ROLE_EDITOR");

        let out = check(&ctx, &routes, "/login");
        assert_eq!(out["outcome"], "allow");
        assert_eq!(out["decision"], Value::Null);
    }

    #[test]
    fn logout_reports_unauthenticated() {
        let mut ctx = context();
        login(&mut ctx, &token(r#"{"sub":"bob"}"#)).unwrap();
        assert_eq!(logout(&mut ctx), json!({ "authenticated": false }));
    }

    #[test]
    fn unknown_permission_codes_are_rejected() {
        assert!(parse_code("PROGRAM:ACADEMIC:DELETE").is_err());
        assert_eq!(
            parse_code(" IAM:MANAGE_USER_PERMISSIONS ").unwrap(),
            PermissionCode::MANAGE_USER_PERMISSIONS
        );
    }

    #[test]
    fn catalog_lists_every_code_with_parts() {
        let out = permissions_catalog();
        let entries = out.as_array().unwrap();
        assert_eq!(entries.len(), CATALOG.len());
        assert_eq!(entries[0]["domain"], "PROGRAM");
    }
}
