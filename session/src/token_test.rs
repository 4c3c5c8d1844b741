use super::*;
use crate::test_support::{expired_token, live_token, make_token, token_expiring_in};
use serde_json::json;

const NOW_MS: i64 = 1_700_000_000_000;

fn token_with_exp_ms(exp_ms: i64) -> String {
    make_token(&json!({ "sub": "7", "type": "client", "exp": exp_ms / 1000 }))
}

// =============================================================================
// structure
// =============================================================================

#[test]
fn wrong_segment_counts_never_decode() {
    for token in ["", "abc", "a.b", "a.b.c.d", "a.b.c.d.e"] {
        assert!(!is_structurally_valid(token), "{token:?}");
        assert_eq!(decode(token), None, "{token:?}");
        assert!(is_expired(token), "{token:?}");
    }
}

#[test]
fn empty_segments_are_structurally_invalid() {
    assert!(!is_structurally_valid("a..c"));
    assert!(!is_structurally_valid(".b.c"));
    assert!(!is_structurally_valid("a.b."));
}

#[test]
fn three_segments_are_structurally_valid_even_if_undecodable() {
    assert!(is_structurally_valid("not.base64!.sig"));
    assert_eq!(decode("not.base64!.sig"), None);
}

// =============================================================================
// decode
// =============================================================================

#[test]
fn decode_reads_claims() {
    let token = make_token(&json!({ "sub": "42", "type": "supplier", "iat": 10, "exp": 20 }));
    let claims = decode(&token).unwrap();
    assert_eq!(claims.subject_id(), Some(42));
    assert_eq!(claims.role(), Some(Role::Supplier));
    assert_eq!(claims.issued_at_ms(), Some(10_000));
    assert_eq!(claims.expires_at_ms(), Some(20_000));
}

#[test]
fn decode_accepts_numeric_subject_and_role_alias() {
    let token = make_token(&json!({ "sub": 8, "role": "admin" }));
    let claims = decode(&token).unwrap();
    assert_eq!(claims.subject_id(), Some(8));
    assert_eq!(claims.role(), Some(Role::Admin));
}

#[test]
fn decode_accepts_padded_payload() {
    let unpadded = make_token(&json!({ "sub": "1" }));
    let mut parts: Vec<String> = unpadded.split('.').map(str::to_owned).collect();
    while parts[1].len() % 4 != 0 {
        parts[1].push('=');
    }
    let padded = parts.join(".");
    assert_eq!(decode(&padded).and_then(|c| c.subject_id()), Some(1));
}

#[test]
fn decode_rejects_non_json_payload() {
    let payload = URL_SAFE_NO_PAD.encode("not json");
    assert_eq!(decode(&format!("h.{payload}.s")), None);
}

#[test]
fn decode_rejects_wrongly_typed_claims() {
    let token = make_token(&json!({ "sub": ["x"] }));
    assert_eq!(decode(&token), None);
}

// =============================================================================
// expiry
// =============================================================================

#[test]
fn token_beyond_buffer_is_live() {
    let token = token_with_exp_ms(NOW_MS + DEFAULT_EXPIRY_BUFFER_MS + 1000);
    assert!(!is_expired_at(&token, NOW_MS, DEFAULT_EXPIRY_BUFFER_MS));
}

#[test]
fn token_inside_buffer_is_expired() {
    let token = token_with_exp_ms(NOW_MS + DEFAULT_EXPIRY_BUFFER_MS - 1000);
    assert!(is_expired_at(&token, NOW_MS, DEFAULT_EXPIRY_BUFFER_MS));
}

#[test]
fn token_exactly_at_buffer_edge_is_expired() {
    let token = token_with_exp_ms(NOW_MS + DEFAULT_EXPIRY_BUFFER_MS);
    assert!(is_expired_at(&token, NOW_MS, DEFAULT_EXPIRY_BUFFER_MS));
}

#[test]
fn token_in_the_past_is_expired() {
    let token = token_with_exp_ms(NOW_MS - 60_000);
    assert!(is_expired_at(&token, NOW_MS, DEFAULT_EXPIRY_BUFFER_MS));
}

#[test]
fn token_without_exp_is_expired() {
    let token = make_token(&json!({ "sub": "1", "type": "client" }));
    assert!(is_expired_at(&token, NOW_MS, DEFAULT_EXPIRY_BUFFER_MS));
}

#[test]
fn wall_clock_expiry_matches_generated_tokens() {
    assert!(!is_expired(&live_token(1, "client")));
    assert!(is_expired(&expired_token(1, "client")));
    assert!(is_expired(&token_expiring_in(1, "client", 120)));
}

// =============================================================================
// subject / fallback profile
// =============================================================================

#[test]
fn subject_id_parses_numeric_subject() {
    assert_eq!(subject_id(&live_token(55, "client")), Some(55));
    assert_eq!(subject_id(&make_token(&json!({ "sub": "abc" }))), None);
    assert_eq!(subject_id("garbage"), None);
}

#[test]
fn fallback_profile_uses_subject_and_role_only() {
    let user = fallback_profile(&live_token(5, "supplier")).unwrap();
    assert_eq!(user.id, 5);
    assert_eq!(user.role, Role::Supplier);
    assert!(user.name.is_empty());
    assert!(user.email.is_empty());
}

#[test]
fn fallback_profile_defaults_unknown_role_to_client() {
    let token = make_token(&json!({ "sub": "5", "type": "superuser" }));
    assert_eq!(fallback_profile(&token).unwrap().role, Role::Client);
}

#[test]
fn fallback_profile_requires_subject() {
    assert_eq!(fallback_profile(&make_token(&json!({ "type": "admin" }))), None);
}
