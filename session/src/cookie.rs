//! `document.cookie` / `Cookie:` header text helpers.
//!
//! Values are written verbatim. Session tokens are base64url segments joined
//! by dots, which are all cookie-safe octets.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Assignment string that sets `name` for `ttl_days` on the whole site.
#[must_use]
pub fn assignment(name: &str, value: &str, ttl_days: u32) -> String {
    let max_age = u64::from(ttl_days) * SECONDS_PER_DAY;
    format!("{name}={value}; max-age={max_age}; path=/; SameSite=Lax")
}

/// Assignment string that expires `name` immediately.
#[must_use]
pub fn deletion(name: &str) -> String {
    format!("{name}=; max-age=0; path=/; SameSite=Lax")
}

/// Find a non-empty cookie value in a `name=value; other=value` string.
#[must_use]
pub fn lookup(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
