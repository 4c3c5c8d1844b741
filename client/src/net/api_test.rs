use super::*;
use session::{Role, SessionConfig, SessionManager, SessionStorage};

use crate::util::browser_storage::{DocumentCookies, LocalStore};

fn raw(status: u16, body: &str) -> RawResponse {
    RawResponse { status, body: body.to_owned(), retry_after: None }
}

fn detached_session() -> ClientSession {
    let config = SessionConfig::default();
    let storage = SessionStorage::new(LocalStore, DocumentCookies, &config);
    SessionManager::new(HttpIdentityApi::new("http://api.test"), storage, config)
}

#[test]
fn endpoint_url_joins_without_double_slash() {
    assert_eq!(endpoint_url("http://api.test/", "/auth/me"), "http://api.test/auth/me");
    assert_eq!(HttpIdentityApi::new("http://api.test").url("/auth/login"), "http://api.test/auth/login");
}

#[test]
fn default_base_url_points_at_local_backend() {
    if option_env!("MARKETPLACE_API_URL").is_none() {
        assert_eq!(api_base_url(), DEFAULT_API_URL);
    }
}

#[test]
fn identity_missing_endpoint_is_unavailable() {
    assert_eq!(identity_from_response(raw(404, "")), Ok(None));
    assert_eq!(identity_from_response(raw(501, "")), Ok(None));
}

#[test]
fn identity_rejection_is_an_error() {
    let err = identity_from_response(raw(401, r#"{"detail":"Token expired"}"#)).unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn identity_success_parses_envelope() {
    let body = r#"{"success":true,"data":{"id":4,"name":"Bia","email":"b@x.com","type":"supplier","created_at":""}}"#;
    let user = identity_from_response(raw(200, body)).unwrap().unwrap();
    assert_eq!(user.role, Role::Supplier);
}

#[test]
fn rate_limited_body_keeps_retry_after() {
    let resp = RawResponse { status: 429, body: String::new(), retry_after: Some("30".to_owned()) };
    let err = resp.into_body("/auth/login").unwrap_err();
    assert_eq!(err.user_message(), "Too many attempts. Try again in 30 seconds.");
}

#[test]
fn unauthorized_call_asks_to_return_after_login() {
    let session = detached_session();
    let failure = settle_authorized(&session, "/reviews", "/dashboard", raw(401, "")).unwrap_err();
    assert_eq!(failure.redirect, Some(Redirect::login_returning_to("/dashboard")));
    assert_eq!(failure.error.user_message(), "Session expired. Please log in again.");
}

#[test]
fn unauthorized_login_call_has_no_redirect() {
    let session = detached_session();
    let failure = settle_authorized(&session, "/auth/login", "/login", raw(401, "")).unwrap_err();
    assert_eq!(failure.redirect, None);
}

#[test]
fn successful_authorized_call_returns_body() {
    let session = detached_session();
    assert_eq!(settle_authorized(&session, "/reviews", "/", raw(200, "[]")), Ok("[]".to_owned()));
}

#[test]
fn patch_carries_every_profile_field() {
    let user = UserProfile {
        id: 1,
        name: "Caio".to_owned(),
        email: "c@x.com".to_owned(),
        role: Role::Admin,
        created_at: String::new(),
    };
    let patch = patch_from(&user);
    assert_eq!(patch.name.as_deref(), Some("Caio"));
    assert_eq!(patch.role, Some(Role::Admin));
}
