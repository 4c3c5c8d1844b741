//! Server configuration parsed from environment variables.
//!
//! Optional:
//! - `PORT`: listen port, default 3000
//! - `EDGE_PROTECTED_PREFIXES`: comma list, default `/dashboard,/admin`
//! - `EDGE_AUTH_PREFIXES`: comma list, default `/login,/register`
//! - `COOKIE_SECURE`: boolean word, default false
//!
//! `main` loads a `.env` file first when one exists.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use session::SessionConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub cookie_secure: bool,
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Build typed config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let mut session = SessionConfig::default();
        if let Some(prefixes) = lookup("EDGE_PROTECTED_PREFIXES").map(|raw| parse_prefixes(&raw)) {
            session.protected_prefixes = prefixes;
        }
        if let Some(prefixes) = lookup("EDGE_AUTH_PREFIXES").map(|raw| parse_prefixes(&raw)) {
            session.auth_prefixes = prefixes;
        }

        let cookie_secure = lookup("COOKIE_SECURE")
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(false);

        Ok(Self { port, cookie_secure, session })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}
