//! Token expiry evaluation.
//!
//! Tokens are JWTs issued by the backend. Only the payload is inspected:
//! the signature is the server's business, the client just needs `exp`
//! to decide whether a request is worth sending.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Base64URL engine that accepts payload segments with or without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is empty")]
    Empty,

    #[error("Invalid token: missing payload segment")]
    MissingPayload,

    #[error("Invalid token payload encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid token payload JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims this client cares about. Everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiration as seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    user_id: Option<Value>,
}

impl TokenClaims {
    /// The `user_id` claim as a string, if present.
    pub fn user_id(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.exp?;
        DateTime::from_timestamp_millis((exp * 1000.0) as i64)
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenError::MissingPayload)?;
    let bytes = URL_SAFE_LENIENT.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Whether `token` is expired at `now`.
///
/// Absent, empty, undecodable, and `exp`-less tokens all count as expired.
/// A token is valid only while `exp` is strictly in the future.
pub fn is_expired_at(token: Option<&str>, now: DateTime<Utc>) -> bool {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return true;
    };

    match decode_claims(token) {
        Ok(claims) => match claims.exp {
            Some(exp) => exp <= now.timestamp_millis() as f64 / 1000.0,
            None => {
                warn!("Token has no exp claim, treating as expired");
                true
            }
        },
        Err(e) => {
            warn!(error = %e, "Error decoding token");
            true
        }
    }
}

/// Whether `token` is expired right now.
pub fn is_expired(token: Option<&str>) -> bool {
    is_expired_at(token, Utc::now())
}

/// Expiry instant of `token`, if it can be decoded.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    decode_claims(token).ok()?.expires_at()
}
