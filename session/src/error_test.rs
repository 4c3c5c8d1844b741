use super::*;

#[test]
fn user_message_passes_backend_text_through() {
    let err = SessionError::Rejected { status: 403, message: "Admin access required".to_owned() };
    assert_eq!(err.user_message(), "Admin access required");
    assert_eq!(err.status(), Some(403));
}

#[test]
fn network_error_hides_transport_detail() {
    let err = SessionError::Network("dns error: no record".to_owned());
    assert!(!err.user_message().contains("dns"));
    assert_eq!(err.status(), None);
}

#[test]
fn unauthorized_reports_401() {
    assert_eq!(SessionError::Unauthorized("Invalid credentials".to_owned()).status(), Some(401));
}
