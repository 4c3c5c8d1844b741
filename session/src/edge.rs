//! Pre-render request filter.
//!
//! SYSTEM CONTEXT
//! ==============
//! The SSR host runs [`EdgeRules::decide`] before any page code. At that
//! point only the cookie mirror is visible and no network round-trip is
//! affordable, so the check is purely structural: "is there a token, and
//! does it have three segments". Expiry and role enforcement are left to
//! the guard, which runs in the browser with the full session.

#[cfg(test)]
#[path = "edge_test.rs"]
mod edge_test;

use crate::config::SessionConfig;
use crate::guard::Redirect;
use crate::token;

const EXEMPT_PREFIXES: &[&str] = &["/api", "/pkg", "/healthz", "/favicon.ico"];
const EXEMPT_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "gif", "webp"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathClass {
    /// Requires any session.
    Protected,
    /// Login / register.
    AuthOnly,
    Public,
}

/// Outcome of the edge check for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Let the request through untouched.
    Pass,
    /// Let the request through but expire the corrupt session cookie.
    PassClearingCookie,
    /// Short-circuit with a redirect.
    Redirect { location: String, clear_cookie: bool },
}

/// Static prefix configuration consulted by the edge check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRules {
    protected: Vec<String>,
    auth_only: Vec<String>,
    config: SessionConfig,
}

impl EdgeRules {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            protected: normalize(&config.protected_prefixes),
            auth_only: normalize(&config.auth_prefixes),
            config: config.clone(),
        }
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    #[must_use]
    pub fn classify(&self, path: &str) -> PathClass {
        if self.protected.iter().any(|prefix| path_matches(path, prefix)) {
            PathClass::Protected
        } else if self.auth_only.iter().any(|prefix| path_matches(path, prefix)) {
            PathClass::AuthOnly
        } else {
            PathClass::Public
        }
    }

    /// Decide what to do with a request for `path` carrying `token`
    /// (cookie value, or bearer header).
    #[must_use]
    pub fn decide(&self, path: &str, token: Option<&str>) -> EdgeDecision {
        let protected = self.classify(path) == PathClass::Protected;
        let token = token.filter(|t| !t.is_empty());

        match token {
            None if protected => EdgeDecision::Redirect {
                location: Redirect::login_returning_to(path).to_url(&self.config),
                clear_cookie: false,
            },
            None => EdgeDecision::Pass,
            Some(raw) if !token::is_structurally_valid(raw) => {
                tracing::debug!(%path, "malformed session cookie");
                if protected {
                    let target = Redirect::Login { return_to: Some(path.to_owned()), expired: true };
                    EdgeDecision::Redirect { location: target.to_url(&self.config), clear_cookie: true }
                } else {
                    EdgeDecision::PassClearingCookie
                }
            }
            Some(_) => EdgeDecision::Pass,
        }
    }
}

impl Default for EdgeRules {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// Assets, API calls and health probes bypass the edge check.
#[must_use]
pub fn is_exempt(path: &str) -> bool {
    if EXEMPT_PREFIXES.iter().any(|prefix| path_matches(path, prefix)) {
        return true;
    }
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| EXEMPT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/users`
/// but not `/administrator`.
#[must_use]
pub fn path_matches(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn normalize(prefixes: &[String]) -> Vec<String> {
    prefixes
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| if p.starts_with('/') { p.to_owned() } else { format!("/{p}") })
        .collect()
}
