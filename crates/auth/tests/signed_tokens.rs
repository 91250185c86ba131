use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use portal_auth::{DecodeError, Role, decode};
use portal_core::Credential;
use serde_json::json;

fn mint(secret: &str, claims: serde_json::Value) -> Credential {
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt");
    Credential::new(token)
}

#[test]
fn decodes_server_issued_token() {
    let now = Utc::now();
    let c = mint(
        "server-secret",
        json!({
            "sub": "alice",
            "email": "alice@example.com",
            "roles": ["ROLE_ADMIN"],
            "iat": now.timestamp(),
            "exp": (now + ChronoDuration::minutes(10)).timestamp(),
        }),
    );

    let identity = decode(&c).unwrap();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.roles, vec![Role::ADMIN]);
    assert_eq!(identity.issued_at.unwrap().timestamp(), now.timestamp());
    assert!(identity.expires_at.unwrap() > now);
}

#[test]
fn signing_key_is_irrelevant_client_side() {
    let a = mint("one-secret", json!({ "sub": "bob" }));
    let b = mint("another-secret", json!({ "sub": "bob" }));
    assert_ne!(a, b);
    assert_eq!(decode(&a).unwrap(), decode(&b).unwrap());
}

#[test]
fn expired_token_is_not_rejected_locally() {
    let past = Utc::now() - ChronoDuration::days(30);
    let c = mint(
        "server-secret",
        json!({ "sub": "carol", "exp": past.timestamp() }),
    );
    assert_eq!(decode(&c).unwrap().username, "carol");
}

#[test]
fn spring_style_token_without_roles_has_no_elevated_role() {
    // Tokens minted from a bare username carry only sub/iat/exp.
    let now = Utc::now();
    let c = mint(
        "server-secret",
        json!({ "sub": "dave", "iat": now.timestamp(), "exp": now.timestamp() + 3600 }),
    );
    let identity = decode(&c).unwrap();
    assert!(identity.roles.is_empty());
    assert_eq!(identity.email, None);
}

#[test]
fn tampered_payload_is_a_decode_error() {
    let c = mint("server-secret", json!({ "sub": "erin" }));
    let mut parts: Vec<&str> = c.as_str().split('.').collect();
    parts[1] = "%%%";
    let tampered = Credential::new(parts.join("."));
    assert!(matches!(decode(&tampered), Err(DecodeError::Encoding(_))));
}
