//! Token and fake-backend helpers shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use crate::api::IdentityApi;
use crate::error::SessionError;
use crate::role::Role;
use crate::token::now_millis;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};

/// Assemble an unsigned three-segment token around `claims`.
pub fn make_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// Token for `sub` / `role` expiring `secs_from_now` seconds from now.
pub fn token_expiring_in(sub: i64, role: &str, secs_from_now: i64) -> String {
    let now = now_millis() / 1000;
    make_token(&json!({ "sub": sub.to_string(), "type": role, "iat": now, "exp": now + secs_from_now }))
}

pub fn live_token(sub: i64, role: &str) -> String {
    token_expiring_in(sub, role, 3600)
}

pub fn expired_token(sub: i64, role: &str) -> String {
    token_expiring_in(sub, role, -60)
}

pub fn profile(id: i64, role: Role) -> UserProfile {
    UserProfile {
        id,
        name: format!("user-{id}"),
        email: format!("user{id}@example.com"),
        role,
        created_at: "2024-05-01T12:00:00".to_owned(),
    }
}

/// Scripted [`IdentityApi`] that counts calls and yields once per fetch so
/// concurrent callers genuinely overlap.
#[derive(Default)]
pub struct FakeApi {
    pub me_calls: Cell<usize>,
    pub login_calls: Cell<usize>,
    pub register_calls: Cell<usize>,
    pub me_results: RefCell<VecDeque<Result<Option<UserProfile>, SessionError>>>,
    pub login_result: RefCell<Option<Result<String, SessionError>>>,
}

impl FakeApi {
    pub fn with_me(result: Result<Option<UserProfile>, SessionError>) -> Self {
        let api = Self::default();
        api.me_results.borrow_mut().push_back(result);
        api
    }

    pub fn with_login(token: Result<String, SessionError>, me: Result<Option<UserProfile>, SessionError>) -> Self {
        let api = Self::with_me(me);
        *api.login_result.borrow_mut() = Some(token);
        api
    }
}

#[async_trait(?Send)]
impl IdentityApi for FakeApi {
    async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse, SessionError> {
        self.login_calls.set(self.login_calls.get() + 1);
        let result = self
            .login_result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(SessionError::Network("no scripted login".to_owned())));
        result.map(|access_token| AuthResponse { access_token, token_type: Some("bearer".to_owned()) })
    }

    async fn fetch_current_user(&self, _token: &str) -> Result<Option<UserProfile>, SessionError> {
        self.me_calls.set(self.me_calls.get() + 1);
        tokio::task::yield_now().await;
        self.me_results.borrow_mut().pop_front().unwrap_or(Ok(None))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, SessionError> {
        self.register_calls.set(self.register_calls.get() + 1);
        Ok(UserProfile {
            id: 100,
            name: request.name.clone(),
            email: request.email.clone(),
            role: request.role,
            created_at: String::new(),
        })
    }
}
