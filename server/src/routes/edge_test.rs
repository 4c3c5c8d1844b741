use super::*;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Request as HttpRequest, StatusCode, header};
use axum::routing::get;
use session::SessionConfig;
use tower::ServiceExt;

use crate::config::ServerConfig;

const STRUCTURED: &str = "aaa.bbb.ccc";

fn test_state() -> AppState {
    AppState::new(&ServerConfig { port: 0, cookie_secure: false, session: SessionConfig::default() })
}

fn stub_router() -> Router {
    let router = Router::new()
        .route("/", get(|| async { "home" }))
        .route("/dashboard", get(|| async { "dashboard" }))
        .route("/admin/users", get(|| async { "users" }))
        .route("/login", get(|| async { "login" }))
        .route("/pkg/app.js", get(|| async { "js" }));
    crate::routes::guarded(router, test_state())
}

async fn send(request: HttpRequest<Body>) -> Response {
    stub_router().oneshot(request).await.unwrap()
}

fn get_request(path: &str) -> HttpRequest<Body> {
    HttpRequest::builder().uri(path).body(Body::empty()).unwrap()
}

fn with_cookie(path: &str, cookie: &str) -> HttpRequest<Body> {
    HttpRequest::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn location(response: &Response) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_owned())
}

// =============================================================================
// request_token
// =============================================================================

#[test]
fn request_token_prefers_cookie() {
    let jar = CookieJar::new().add(Cookie::new("auth_token", "from.cookie.value"));
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from.header.value"));
    assert_eq!(request_token(&jar, &headers, "auth_token").as_deref(), Some("from.cookie.value"));
}

#[test]
fn request_token_falls_back_to_bearer() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer x.y.z"));
    assert_eq!(request_token(&CookieJar::new(), &headers, "auth_token").as_deref(), Some("x.y.z"));
}

#[test]
fn request_token_ignores_empty_values_and_other_schemes() {
    let jar = CookieJar::new().add(Cookie::new("auth_token", ""));
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert_eq!(request_token(&jar, &headers, "auth_token"), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert_eq!(request_token(&jar, &headers, "auth_token"), None);
}

#[test]
fn request_token_reads_configured_cookie_name() {
    let jar = CookieJar::new().add(Cookie::new("sid", "a.b.c"));
    assert_eq!(request_token(&jar, &HeaderMap::new(), "sid").as_deref(), Some("a.b.c"));
    assert_eq!(request_token(&jar, &HeaderMap::new(), "auth_token"), None);
}

// =============================================================================
// response helpers
// =============================================================================

#[test]
fn clearing_jar_expires_cookie_at_root() {
    let jar = clearing_jar("auth_token", true);
    let cookie = jar.get("auth_token").unwrap();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.http_only(), None);
}

#[test]
fn redirect_response_is_temporary() {
    let response = redirect_response("/login", None);
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");
    assert!(set_cookie(&response).is_none());
}

// =============================================================================
// middleware
// =============================================================================

#[tokio::test]
async fn protected_without_token_redirects_with_return_path() {
    let response = send(get_request("/dashboard")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard");
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn nested_protected_path_redirects() {
    let response = send(get_request("/admin/users")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?redirect=%2Fadmin%2Fusers");
}

#[tokio::test]
async fn protected_with_garbage_cookie_redirects_and_clears() {
    let response = send(with_cookie("/dashboard", "auth_token=garbage")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard&expired=true");
    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn protected_with_structured_cookie_passes() {
    let response = send(with_cookie("/dashboard", &format!("auth_token={STRUCTURED}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn protected_with_bearer_header_passes() {
    let request = HttpRequest::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {STRUCTURED}"))
        .body(Body::empty())
        .unwrap();
    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_path_with_garbage_cookie_passes_and_clears() {
    let response = send(with_cookie("/", "auth_token=garbage")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn auth_page_without_token_passes() {
    let response = send(get_request("/login")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn exempt_asset_skips_cookie_check() {
    let response = send(with_cookie("/pkg/app.js", "auth_token=garbage")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
}
