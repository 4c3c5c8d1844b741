use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", " On "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "No"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_invalid_returns_none() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// ServerConfig
// =============================================================================

#[test]
fn defaults_when_environment_is_empty() {
    let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(!config.cookie_secure);
    assert_eq!(config.session, SessionConfig::default());
}

#[test]
fn prefixes_are_comma_lists() {
    let config = ServerConfig::from_lookup(lookup_from(&[
        ("EDGE_PROTECTED_PREFIXES", " /dashboard, /admin ,/orders,, "),
        ("EDGE_AUTH_PREFIXES", "/signin"),
    ]))
    .unwrap();
    assert_eq!(config.session.protected_prefixes, vec!["/dashboard", "/admin", "/orders"]);
    assert_eq!(config.session.auth_prefixes, vec!["/signin"]);
}

#[test]
fn port_and_cookie_flag_are_read() {
    let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "8080"), ("COOKIE_SECURE", "yes")])).unwrap();
    assert_eq!(config.port, 8080);
    assert!(config.cookie_secure);
}

#[test]
fn unreadable_cookie_flag_falls_back_to_insecure() {
    let config = ServerConfig::from_lookup(lookup_from(&[("COOKIE_SECURE", "maybe")])).unwrap();
    assert!(!config.cookie_secure);
}

#[test]
fn invalid_port_is_an_error() {
    let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("http".to_owned()));
}
