use super::*;

#[test]
fn expired_flag_shows_notice() {
    assert_eq!(login_notice(Some("true")), Some(EXPIRED_NOTICE));
    assert_eq!(login_notice(Some("false")), None);
    assert_eq!(login_notice(None), None);
}

#[test]
fn post_login_target_keeps_same_site_paths() {
    assert_eq!(post_login_target(Some("/dashboard")), "/dashboard");
    assert_eq!(post_login_target(None), "/");
}

#[test]
fn post_login_target_rejects_offsite_redirects() {
    assert_eq!(post_login_target(Some("https://evil.example")), "/");
    assert_eq!(post_login_target(Some("//evil.example")), "/");
}

#[test]
fn validate_login_input_reports_first_problem() {
    assert_eq!(validate_login_input("", "pw"), Err("Enter your email.".to_owned()));
    assert_eq!(validate_login_input("nope", "pw"), Err("Invalid email.".to_owned()));
    assert_eq!(validate_login_input("a@b.com", ""), Err("Password is required.".to_owned()));
    assert_eq!(validate_login_input(" a@b.com ", "pw"), Ok(()));
}
