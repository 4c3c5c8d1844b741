//! Backend identity API seam and HTTP response policy.
//!
//! The transport lives in the `client` crate (`gloo-net` in the browser).
//! This module fixes what the session core needs from it and how raw HTTP
//! outcomes are classified, so every transport maps statuses the same way.
//!
//! ERROR HANDLING
//! ==============
//! `fetch_current_user` distinguishes "endpoint not there" (`Ok(None)`, the
//! caller degrades to token claims) from "session rejected / network down"
//! (`Err`, the caller purges the session).

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SessionError;
use crate::guard::Redirect;
use crate::types::{ApiEnvelope, AuthResponse, LoginRequest, RegisterRequest, UserProfile};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const ME_ENDPOINT: &str = "/auth/me";

/// Operations the session lifecycle calls on the backend.
///
/// Futures are `!Send`: the browser is single-threaded and `gloo-net`
/// futures cannot cross threads.
#[async_trait(?Send)]
pub trait IdentityApi {
    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, SessionError>;

    /// `GET /auth/me` with `token` as bearer. `Ok(None)` when the endpoint
    /// is unavailable.
    async fn fetch_current_user(&self, token: &str) -> Result<Option<UserProfile>, SessionError>;

    /// `POST /auth/register`.
    async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, SessionError>;
}

/// How an outgoing authenticated request should be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestAuth {
    /// No session; send without credentials.
    Anonymous,
    /// Attach `Authorization: Bearer <token>`.
    Bearer(String),
    /// Do not send. The session was purged; follow `redirect` if present.
    Refused { redirect: Option<Redirect> },
}

/// Login and register calls never trigger session-expiry handling.
#[must_use]
pub fn is_auth_endpoint(endpoint: &str) -> bool {
    let path = endpoint.split('?').next().unwrap_or(endpoint);
    path.ends_with(LOGIN_ENDPOINT) || path.ends_with(REGISTER_ENDPOINT)
}

/// `Authorization` header value for `token`.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Statuses meaning "`/auth/me` does not exist on this backend".
#[must_use]
pub fn is_unavailable_status(status: u16) -> bool {
    matches!(status, 404 | 405 | 501)
}

// Bare first: every envelope field is optional, so `Wrapped` would swallow
// a bare user object.
#[derive(Deserialize)]
#[serde(untagged)]
enum MeBody {
    Bare(UserProfile),
    Wrapped(ApiEnvelope<UserProfile>),
}

/// Parse a `/auth/me` body: `{ success, data: User }` or a bare `User`.
///
/// # Errors
///
/// Returns [`SessionError::Decode`] when neither shape matches.
pub fn parse_user_body(body: &str) -> Result<Option<UserProfile>, SessionError> {
    match serde_json::from_str::<MeBody>(body) {
        Ok(MeBody::Wrapped(envelope)) => Ok(envelope.data),
        Ok(MeBody::Bare(user)) => Ok(Some(user)),
        Err(e) => Err(SessionError::Decode(e.to_string())),
    }
}

/// Parse a `/auth/register` body.
///
/// # Errors
///
/// Returns [`SessionError::Decode`] when the body carries no user.
pub fn parse_register_body(body: &str) -> Result<UserProfile, SessionError> {
    parse_user_body(body)?.ok_or_else(|| SessionError::Decode("register response has no user".to_owned()))
}

/// Parse a `/auth/login` body.
///
/// # Errors
///
/// Returns [`SessionError::Decode`] when `access_token` is missing or empty.
pub fn parse_login_body(body: &str) -> Result<AuthResponse, SessionError> {
    let response: AuthResponse = serde_json::from_str(body).map_err(|e| SessionError::Decode(e.to_string()))?;
    if response.access_token.is_empty() {
        return Err(SessionError::Decode("empty access_token".to_owned()));
    }
    Ok(response)
}

/// Classify a non-success response from `endpoint`.
///
/// `retry_after` is the raw `Retry-After` header, used for 429 messages.
#[must_use]
pub fn error_from_response(endpoint: &str, status: u16, body: &str, retry_after: Option<&str>) -> SessionError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    let message = status_message(endpoint, status, detail.as_ref(), retry_after);
    if status == 401 {
        SessionError::Unauthorized(message)
    } else {
        SessionError::Rejected { status, message }
    }
}

/// User-facing text for an HTTP failure. A backend `detail` string wins
/// except for server errors.
#[must_use]
pub fn status_message(endpoint: &str, status: u16, detail: Option<&Value>, retry_after: Option<&str>) -> String {
    let detail_text = detail.and_then(Value::as_str).map(str::to_owned);
    let detail_list = detail.and_then(flatten_validation_errors);

    match status {
        400 => detail_text.unwrap_or_else(|| "Invalid data. Check the information provided.".to_owned()),
        401 if is_auth_endpoint(endpoint) => {
            detail_text.unwrap_or_else(|| "Invalid credentials. Check your email and password.".to_owned())
        }
        401 => "Session expired. Please log in again.".to_owned(),
        403 => detail_text.unwrap_or_else(|| "You do not have permission to perform this action.".to_owned()),
        404 => detail_text.unwrap_or_else(|| "Resource not found.".to_owned()),
        422 => match (detail_list, detail_text) {
            (Some(list), _) => format!("Validation error: {list}"),
            (None, Some(text)) => text,
            (None, None) => "Validation error. Check the data provided.".to_owned(),
        },
        429 => match retry_after {
            Some(secs) => format!("Too many attempts. Try again in {secs} seconds."),
            None => "Too many attempts. Please wait a moment before trying again.".to_owned(),
        },
        500..=504 => "Server error. Please try again later.".to_owned(),
        _ => match (detail_list, detail_text) {
            (Some(list), _) => format!("Error: {list}"),
            (None, Some(text)) => text,
            (None, None) => "An unexpected error occurred.".to_owned(),
        },
    }
}

/// Flatten a FastAPI-style `detail` array into `field: msg, field: msg`.
fn flatten_validation_errors(detail: &Value) -> Option<String> {
    let items = detail.as_array()?;
    let parts: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Object(obj) => match obj.get("msg").and_then(Value::as_str) {
                Some(msg) => {
                    let field = obj
                        .get("loc")
                        .and_then(Value::as_array)
                        .filter(|loc| loc.len() > 1)
                        .and_then(|loc| loc.last())
                        .map_or_else(|| "field".to_owned(), |v| v.as_str().map_or_else(|| v.to_string(), str::to_owned));
                    format!("{field}: {msg}")
                }
                None => item.to_string(),
            },
            other => other.to_string(),
        })
        .collect();
    Some(parts.join(", "))
}
