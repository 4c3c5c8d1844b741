//! Edge interceptor middleware.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs before any page renders. Reads the session token from the
//! `auth_token` cookie (or an `Authorization: Bearer` header), asks
//! `session::EdgeRules` for a decision and applies it: pass, pass while
//! expiring a corrupt cookie, or redirect to login. Never calls the backend
//! and never checks expiry or role; the browser guard does that.

#[cfg(test)]
#[path = "edge_test.rs"]
mod edge_test;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use session::{EdgeDecision, edge};
use time::Duration;

use crate::state::AppState;

/// `axum::middleware::from_fn_with_state` entry point.
pub async fn intercept(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if edge::is_exempt(&path) {
        return next.run(request).await;
    }

    let token = request_token(&jar, request.headers(), state.edge.cookie_name());
    let decision = state.edge.decide(&path, token.as_deref());
    if decision != EdgeDecision::Pass {
        tracing::debug!(%path, ?decision, "edge intercepted request");
    }

    match decision {
        EdgeDecision::Pass => next.run(request).await,
        EdgeDecision::PassClearingCookie => {
            let response = next.run(request).await;
            (clearing_jar(state.edge.cookie_name(), state.cookie_secure), response).into_response()
        }
        EdgeDecision::Redirect { location, clear_cookie } => {
            let jar = clear_cookie.then(|| clearing_jar(state.edge.cookie_name(), state.cookie_secure));
            redirect_response(&location, jar)
        }
    }
}

/// Session token carried by the request: the cookie wins, then a bearer
/// header. Empty values count as absent.
pub fn request_token(jar: &CookieJar, headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = jar.get(cookie_name).map(Cookie::value).filter(|v| !v.is_empty());
    if let Some(value) = from_cookie {
        return Some(value.to_owned());
    }
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Jar that expires the session cookie. Not `HttpOnly`: the browser session
/// reads and writes the same cookie through `document.cookie`.
pub fn clearing_jar(cookie_name: &str, secure: bool) -> CookieJar {
    let cookie = Cookie::build((cookie_name.to_owned(), ""))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO);
    CookieJar::new().add(cookie)
}

pub fn redirect_response(location: &str, jar: Option<CookieJar>) -> Response {
    match jar {
        Some(jar) => (jar, Redirect::temporary(location)).into_response(),
        None => Redirect::temporary(location).into_response(),
    }
}
