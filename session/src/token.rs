//! Session token codec.
//!
//! DESIGN
//! ======
//! Tokens are compact three-segment credentials signed by the backend. No
//! key is available client-side, so the signature is never checked; the
//! payload segment is read only for routing hints (subject, role, expiry).
//! Every failure mode collapses into `None` so callers treat a corrupt token
//! exactly like a missing one.
//!
//! A token counts as expired once `now` enters the buffer window before its
//! `exp` claim. Requests issued just before real expiry would otherwise be
//! rejected by the backend mid-navigation.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::config::DEFAULT_EXPIRY_BUFFER_MS;
use crate::role::Role;
use crate::types::UserProfile;

/// Unverified payload claims.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Subject (user id). Issued as a string, tolerated as a number.
    #[serde(default, deserialize_with = "deserialize_subject")]
    pub sub: Option<String>,
    /// Raw role tag from the `type` claim.
    #[serde(default, rename = "type", alias = "role")]
    pub role: Option<String>,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub iat: Option<i64>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Subject parsed as a numeric user id.
    #[must_use]
    pub fn subject_id(&self) -> Option<i64> {
        self.sub.as_deref()?.trim().parse().ok()
    }

    /// Role tag parsed into [`Role`]; unknown tags yield `None`.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref()?.parse().ok()
    }

    /// Expiry in milliseconds since the Unix epoch.
    #[must_use]
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.exp.map(|secs| secs.saturating_mul(1000))
    }

    /// Issued-at in milliseconds since the Unix epoch.
    #[must_use]
    pub fn issued_at_ms(&self) -> Option<i64> {
        self.iat.map(|secs| secs.saturating_mul(1000))
    }
}

/// `true` when the token splits into exactly three non-empty segments.
#[must_use]
pub fn is_structurally_valid(token: &str) -> bool {
    let mut count = 0;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        count += 1;
    }
    count == 3
}

/// Decode the payload segment without verifying the signature.
#[must_use]
pub fn decode(token: &str) -> Option<Claims> {
    if !is_structurally_valid(token) {
        tracing::debug!("token rejected: expected three non-empty segments");
        return None;
    }
    let payload = token.split('.').nth(1)?;
    let bytes = decode_segment(payload)?;
    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "token payload is not valid claims JSON");
            None
        }
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|e| tracing::debug!(error = %e, "token payload is not base64"))
        .ok()
}

/// Expiry check against the wall clock with the default five-minute buffer.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_millis(), DEFAULT_EXPIRY_BUFFER_MS)
}

/// `true` if the token cannot be decoded, carries no `exp`, or
/// `now_ms >= exp - buffer_ms`.
#[must_use]
pub fn is_expired_at(token: &str, now_ms: i64, buffer_ms: i64) -> bool {
    let Some(expires_at) = decode(token).and_then(|claims| claims.expires_at_ms()) else {
        return true;
    };
    now_ms >= expires_at.saturating_sub(buffer_ms)
}

/// Numeric subject of the token.
#[must_use]
pub fn subject_id(token: &str) -> Option<i64> {
    decode(token)?.subject_id()
}

/// Minimal profile (id and role only) derived from the token's claims.
///
/// Unknown or missing role tags default to [`Role::Client`].
#[must_use]
pub fn fallback_profile(token: &str) -> Option<UserProfile> {
    let claims = decode(token)?;
    let id = claims.subject_id()?;
    Some(UserProfile::degraded(id, claims.role().unwrap_or(Role::Client)))
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

fn deserialize_subject<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(D::Error::custom("expected string or number subject")),
    }
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(Some(int));
            }
            #[allow(clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
            {
                return Ok(Some(float.trunc() as i64));
            }
            Err(D::Error::custom("expected integer-compatible timestamp"))
        }
        _ => Err(D::Error::custom("expected numeric timestamp")),
    }
}
