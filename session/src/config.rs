//! Static session configuration shared by the client and the SSR host.
//!
//! DESIGN
//! ======
//! Both execution contexts must agree on key names, cookie name and path
//! prefixes, so they live in one typed struct instead of scattered constants.

/// Persistent-store key holding the raw session token.
pub const DEFAULT_TOKEN_KEY: &str = "auth_token";
/// Persistent-store key holding the serialized [`crate::UserProfile`].
pub const DEFAULT_USER_KEY: &str = "user_data";
/// Cookie mirroring the session token for pre-render interception.
pub const DEFAULT_COOKIE_NAME: &str = "auth_token";
/// Cookie lifetime in days.
pub const DEFAULT_COOKIE_TTL_DAYS: u32 = 7;
/// A token expiring within this window is treated as already expired.
pub const DEFAULT_EXPIRY_BUFFER_MS: i64 = 5 * 60 * 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub token_key: String,
    pub user_key: String,
    pub cookie_name: String,
    pub cookie_ttl_days: u32,
    pub expiry_buffer_ms: i64,
    /// Login route; receives `redirect` and `expired` query parameters.
    pub login_path: String,
    /// Landing route for silent role-mismatch redirects.
    pub neutral_path: String,
    /// Path prefixes that require any session.
    pub protected_prefixes: Vec<String>,
    /// Login/register prefixes; authenticated users are sent away from them.
    pub auth_prefixes: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_owned(),
            user_key: DEFAULT_USER_KEY.to_owned(),
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            cookie_ttl_days: DEFAULT_COOKIE_TTL_DAYS,
            expiry_buffer_ms: DEFAULT_EXPIRY_BUFFER_MS,
            login_path: "/login".to_owned(),
            neutral_path: "/".to_owned(),
            protected_prefixes: vec!["/dashboard".to_owned(), "/admin".to_owned()],
            auth_prefixes: vec!["/login".to_owned(), "/register".to_owned()],
        }
    }
}
