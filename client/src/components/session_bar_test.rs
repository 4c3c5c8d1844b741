use super::*;
use session::UserProfile;

fn signed_in(role: Role) -> AuthState {
    AuthState::authenticated(UserProfile::degraded(1, role), "a.b.c".to_owned())
}

#[test]
fn role_labels() {
    assert_eq!(role_label(Role::Client), "Client");
    assert_eq!(role_label(Role::Admin), "Administrator");
}

#[test]
fn role_home_points_at_role_area() {
    assert_eq!(role_home(&signed_in(Role::Supplier)), Some("/dashboard"));
    assert_eq!(role_home(&signed_in(Role::Admin)), Some("/admin"));
    assert_eq!(role_home(&signed_in(Role::Client)), None);
    assert_eq!(role_home(&AuthState::default()), None);
}
