//! REST client for the marketplace backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning a network error, since the backend is
//! only ever called from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every non-success status is classified by `session::api`, so the guard,
//! the forms and the authenticated-call helper all see the same
//! `SessionError` variants and user-facing messages.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use session::api::{self, IdentityApi, RequestAuth};
#[cfg(feature = "hydrate")]
use session::api::{LOGIN_ENDPOINT, REGISTER_ENDPOINT};
use session::types::AuthResponse;
use session::{LoginRequest, ProfilePatch, Redirect, RegisterRequest, SessionError, UserProfile};

use crate::state::auth::ClientSession;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Backend base URL, fixed at build time.
pub fn api_base_url() -> &'static str {
    option_env!("MARKETPLACE_API_URL").unwrap_or(DEFAULT_API_URL)
}

fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

/// A finished HTTP exchange, reduced to what status classification needs.
#[cfg(any(test, feature = "hydrate"))]
struct RawResponse {
    status: u16,
    body: String,
    retry_after: Option<String>,
}

#[cfg(any(test, feature = "hydrate"))]
impl RawResponse {
    fn into_body(self, endpoint: &str) -> Result<String, SessionError> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            Err(api::error_from_response(endpoint, self.status, &self.body, self.retry_after.as_deref()))
        }
    }
}

/// Classify a `/auth/me` exchange. Missing-endpoint statuses mean
/// "unavailable", not failure.
#[cfg(any(test, feature = "hydrate"))]
fn identity_from_response(raw: RawResponse) -> Result<Option<UserProfile>, SessionError> {
    if api::is_unavailable_status(raw.status) {
        return Ok(None);
    }
    let body = raw.into_body(api::ME_ENDPOINT)?;
    api::parse_user_body(&body)
}

#[cfg(feature = "hydrate")]
async fn send(request: gloo_net::http::Request) -> Result<RawResponse, SessionError> {
    let resp = request.send().await.map_err(network)?;
    let status = resp.status();
    let retry_after = resp.headers().get("retry-after");
    let body = resp.text().await.map_err(network)?;
    Ok(RawResponse { status, body, retry_after })
}

#[cfg(feature = "hydrate")]
fn network(e: gloo_net::Error) -> SessionError {
    SessionError::Network(e.to_string())
}

#[cfg(not(feature = "hydrate"))]
fn not_in_browser() -> SessionError {
    SessionError::Network("not available on server".to_owned())
}

/// [`IdentityApi`] over `fetch`.
#[derive(Clone, Debug)]
pub struct HttpIdentityApi {
    base_url: String,
}

impl HttpIdentityApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }
}

impl Default for HttpIdentityApi {
    fn default() -> Self {
        Self::new(api_base_url())
    }
}

#[async_trait(?Send)]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, SessionError> {
        #[cfg(feature = "hydrate")]
        {
            let req = gloo_net::http::Request::post(&self.url(LOGIN_ENDPOINT))
                .json(request)
                .map_err(network)?;
            let body = send(req).await?.into_body(LOGIN_ENDPOINT)?;
            api::parse_login_body(&body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(not_in_browser())
        }
    }

    async fn fetch_current_user(&self, token: &str) -> Result<Option<UserProfile>, SessionError> {
        #[cfg(feature = "hydrate")]
        {
            let req = gloo_net::http::Request::get(&self.url(api::ME_ENDPOINT))
                .header("Authorization", &api::bearer(token))
                .build()
                .map_err(network)?;
            identity_from_response(send(req).await?)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(not_in_browser())
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, SessionError> {
        #[cfg(feature = "hydrate")]
        {
            let req = gloo_net::http::Request::post(&self.url(REGISTER_ENDPOINT))
                .json(request)
                .map_err(network)?;
            let body = send(req).await?.into_body(REGISTER_ENDPOINT)?;
            api::parse_register_body(&body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(not_in_browser())
        }
    }
}

// =============================================================================
// AUTHENTICATED CALLS
// =============================================================================

/// Failure of an authenticated call plus the navigation the session policy
/// asks for, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFailure {
    pub error: SessionError,
    pub redirect: Option<Redirect>,
}

impl From<SessionError> for CallFailure {
    fn from(error: SessionError) -> Self {
        Self { error, redirect: None }
    }
}

/// Apply the 401 policy to a finished authenticated exchange.
#[cfg(any(test, feature = "hydrate"))]
fn settle_authorized(
    session: &ClientSession,
    endpoint: &str,
    current_path: &str,
    raw: RawResponse,
) -> Result<String, CallFailure> {
    if raw.status == 401 {
        let redirect = session.handle_unauthorized(endpoint, current_path);
        let error = api::error_from_response(endpoint, raw.status, &raw.body, None);
        return Err(CallFailure { error, redirect });
    }
    Ok(raw.into_body(endpoint)?)
}

/// `GET endpoint` with the session's bearer token attached.
///
/// # Errors
///
/// Returns a [`CallFailure`] whose `redirect` is set when the session was
/// purged (expired token before sending, 401 after).
pub async fn authorized_get(session: &ClientSession, endpoint: &str, current_path: &str) -> Result<String, CallFailure> {
    let token = match session.authorize_request(endpoint) {
        RequestAuth::Refused { redirect } => {
            return Err(CallFailure { error: SessionError::Expired, redirect });
        }
        RequestAuth::Anonymous => None,
        RequestAuth::Bearer(token) => Some(token),
    };

    #[cfg(feature = "hydrate")]
    {
        let mut builder = gloo_net::http::Request::get(&endpoint_url(api_base_url(), endpoint));
        if let Some(token) = &token {
            builder = builder.header("Authorization", &api::bearer(token));
        }
        let req = builder.build().map_err(network)?;
        let raw = send(req).await?;
        settle_authorized(session, endpoint, current_path, raw)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, current_path);
        Err(not_in_browser().into())
    }
}

/// Re-read the signed-in profile from `/auth/me` and merge it into the
/// session.
///
/// # Errors
///
/// See [`authorized_get`]; a body without a user is a decode error.
pub async fn refresh_profile(session: &ClientSession, current_path: &str) -> Result<UserProfile, CallFailure> {
    let body = authorized_get(session, api::ME_ENDPOINT, current_path).await?;
    let user = api::parse_user_body(&body)?
        .ok_or_else(|| SessionError::Decode("identity response has no user".to_owned()))?;
    session.update_user(patch_from(&user));
    Ok(user)
}

fn patch_from(user: &UserProfile) -> ProfilePatch {
    ProfilePatch {
        name: Some(user.name.clone()),
        email: Some(user.email.clone()),
        role: Some(user.role),
    }
}
