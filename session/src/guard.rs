//! Guard states, redirect targets and the pure policy checks behind
//! [`crate::SessionManager::evaluate`].
//!
//! STATE MACHINE
//! =============
//! `Uninitialized -> Checking -> { Authorized | Redirecting }`. Both
//! right-hand states are terminal for a render pass: a redirect is emitted
//! once and never re-evaluated against its own destination by the component
//! that issued it.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use url::form_urlencoded;

use crate::config::SessionConfig;
use crate::role::Role;
use crate::types::UserProfile;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    /// Nothing evaluated yet.
    #[default]
    Uninitialized,
    /// Waiting on the client (server pass) or on an identity fetch.
    Checking,
    /// Children may render.
    Authorized,
    /// Render nothing; navigate to the target.
    Redirecting(Redirect),
}

impl GuardState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Authorized | Self::Redirecting(_))
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirecting(target) => Some(target),
            _ => None,
        }
    }
}

/// Where a failed guard (or edge check) sends the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Redirect {
    /// Login page, optionally returning to `return_to` afterwards and
    /// optionally flagged as a session expiry.
    Login { return_to: Option<String>, expired: bool },
    /// Neutral landing page after a role mismatch.
    Neutral,
}

impl Redirect {
    /// Plain login prompt, no query flags.
    #[must_use]
    pub fn login() -> Self {
        Self::Login { return_to: None, expired: false }
    }

    /// Login prompt that returns to `path` after signing in.
    #[must_use]
    pub fn login_returning_to(path: &str) -> Self {
        Self::Login { return_to: Some(path.to_owned()), expired: false }
    }

    /// Login prompt with the "session expired" message.
    #[must_use]
    pub fn expired() -> Self {
        Self::Login { return_to: None, expired: true }
    }

    /// Resolve into a site-relative URL.
    #[must_use]
    pub fn to_url(&self, config: &SessionConfig) -> String {
        match self {
            Self::Neutral => config.neutral_path.clone(),
            Self::Login { return_to, expired } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if let Some(path) = return_to {
                    query.append_pair("redirect", path);
                }
                if *expired {
                    query.append_pair("expired", "true");
                }
                let query = query.finish();
                if query.is_empty() {
                    config.login_path.clone()
                } else {
                    format!("{}?{query}", config.login_path)
                }
            }
        }
    }
}

/// Role comparison step of the guard.
#[must_use]
pub fn role_permits(required: Option<Role>, user: &UserProfile) -> bool {
    match (required, user.role) {
        (None, _)
        | (Some(Role::Client), Role::Client)
        | (Some(Role::Supplier), Role::Supplier)
        | (Some(Role::Admin), Role::Admin) => true,
        (Some(Role::Client | Role::Supplier | Role::Admin), _) => false,
    }
}

/// Sanitize a `redirect` query value into a same-site path; anything else
/// falls back to `/`.
#[must_use]
pub fn safe_return_path(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path.to_owned(),
        _ => "/".to_owned(),
    }
}
