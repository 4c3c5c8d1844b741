use super::*;
use crate::test_support::profile;

#[test]
fn login_redirect_encodes_return_path() {
    let config = SessionConfig::default();
    assert_eq!(Redirect::login_returning_to("/admin").to_url(&config), "/login?redirect=%2Fadmin");
    assert_eq!(
        Redirect::login_returning_to("/dashboard/media?tab=2").to_url(&config),
        "/login?redirect=%2Fdashboard%2Fmedia%3Ftab%3D2"
    );
}

#[test]
fn expired_and_plain_login_urls() {
    let config = SessionConfig::default();
    assert_eq!(Redirect::expired().to_url(&config), "/login?expired=true");
    assert_eq!(Redirect::login().to_url(&config), "/login");
}

#[test]
fn login_redirect_can_carry_both_flags() {
    let target = Redirect::Login { return_to: Some("/admin".to_owned()), expired: true };
    assert_eq!(target.to_url(&SessionConfig::default()), "/login?redirect=%2Fadmin&expired=true");
}

#[test]
fn neutral_redirect_uses_configured_path() {
    let config = SessionConfig { neutral_path: "/home".to_owned(), ..SessionConfig::default() };
    assert_eq!(Redirect::Neutral.to_url(&config), "/home");
}

#[test]
fn guard_state_terminality() {
    assert!(!GuardState::Uninitialized.is_terminal());
    assert!(!GuardState::Checking.is_terminal());
    assert!(GuardState::Authorized.is_terminal());
    assert!(GuardState::Redirecting(Redirect::Neutral).is_terminal());
    assert_eq!(GuardState::Redirecting(Redirect::Neutral).redirect(), Some(&Redirect::Neutral));
    assert_eq!(GuardState::Authorized.redirect(), None);
}

#[test]
fn role_permits_matches_exact_role_only() {
    let supplier = profile(1, Role::Supplier);
    assert!(role_permits(None, &supplier));
    assert!(role_permits(Some(Role::Supplier), &supplier));
    assert!(!role_permits(Some(Role::Admin), &supplier));
    assert!(!role_permits(Some(Role::Client), &supplier));
}

#[test]
fn admin_is_not_implicitly_a_supplier() {
    assert!(!role_permits(Some(Role::Supplier), &profile(1, Role::Admin)));
}

#[test]
fn safe_return_path_keeps_site_paths() {
    assert_eq!(safe_return_path(Some("/dashboard/media")), "/dashboard/media");
}

#[test]
fn safe_return_path_rejects_offsite_targets() {
    assert_eq!(safe_return_path(None), "/");
    assert_eq!(safe_return_path(Some("https://evil.example")), "/");
    assert_eq!(safe_return_path(Some("//evil.example")), "/");
    assert_eq!(safe_return_path(Some("/\\evil.example")), "/");
    assert_eq!(safe_return_path(Some("")), "/");
}
