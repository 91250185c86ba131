use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, general_purpose};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use portal_core::Credential;

use crate::{Identity, Role};

/// base64url, accepting payload segments with or without `=` padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    general_purpose::NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims the console reads from a bearer token payload.
///
/// Everything is optional at this level; `decode` decides what is required.
/// `iat` / `exp` are kept loose so an odd timestamp never breaks a session.
#[derive(Debug, Default, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(default)]
    iat: Option<Value>,
    #[serde(default)]
    exp: Option<Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token has no payload segment")]
    MissingPayload,

    #[error("payload is not valid base64url: {0}")]
    Encoding(String),

    #[error("payload is not a claims object: {0}")]
    Payload(String),

    #[error("token carries neither a 'sub' nor a 'username' claim")]
    MissingSubject,
}

/// Decode a credential into the identity it claims.
///
/// Only the structure is checked: the payload segment must be base64url JSON
/// carrying a subject. **Signature and expiry are not verified**: the result
/// drives what the console shows and where it navigates, never what the server
/// lets through.
pub fn decode(credential: &Credential) -> Result<Identity, DecodeError> {
    let payload = credential
        .as_str()
        .split('.')
        .nth(1)
        .ok_or(DecodeError::MissingPayload)?;

    let bytes = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|e| DecodeError::Encoding(e.to_string()))?;

    let claims: TokenClaims =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Payload(e.to_string()))?;

    let username = non_empty(claims.sub)
        .or_else(|| non_empty(claims.username))
        .ok_or(DecodeError::MissingSubject)?;

    Ok(Identity {
        username,
        email: claims.email,
        roles: claims
            .roles
            .unwrap_or_default()
            .into_iter()
            .map(Role::from)
            .collect(),
        issued_at: claims.iat.as_ref().and_then(numeric_date),
        expires_at: claims.exp.as_ref().and_then(numeric_date),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// JWT NumericDate: seconds since the epoch, possibly fractional.
fn numeric_date(value: &Value) -> Option<DateTime<Utc>> {
    let secs = value.as_f64()?;
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.trunc() as i64, 0)
}
