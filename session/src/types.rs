//! Wire DTOs exchanged with the marketplace backend.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON (`type` for the role, snake_case
//! timestamps) so the same structs serialize into `user_data` and parse
//! `/auth/me` responses without a mapping layer.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::role::Role;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 120;
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// The authenticated user as cached in [`crate::AuthState`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", alias = "role")]
    pub role: Role,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
}

/// Partial profile update merged by [`crate::SessionManager::update_user`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UserProfile {
    /// Minimal profile built from token claims when the identity endpoint
    /// cannot supply one.
    #[must_use]
    pub fn degraded(id: i64, role: Role) -> Self {
        Self { id, name: String::new(), email: String::new(), role, created_at: String::new() }
    }

    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Trim and check the submitted credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] when the email is missing or
    /// malformed, or the password is empty.
    pub fn new(email: &str, password: &str) -> Result<Self, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::Validation("Enter your email.".to_owned()));
        }
        if !looks_like_email(email) {
            return Err(SessionError::Validation("Invalid email.".to_owned()));
        }
        if password.is_empty() {
            return Err(SessionError::Validation("Password is required.".to_owned()));
        }
        Ok(Self { email: email.to_owned(), password: password.to_owned() })
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: Role,
}

impl RegisterRequest {
    /// Check field rules mirrored from the backend's registration schema.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] with the first failing rule.
    pub fn validate(&self) -> Result<(), SessionError> {
        let name_len = self.name.trim().chars().count();
        if name_len < NAME_MIN_LENGTH {
            return Err(SessionError::Validation(format!(
                "Name must have at least {NAME_MIN_LENGTH} characters."
            )));
        }
        if name_len > NAME_MAX_LENGTH {
            return Err(SessionError::Validation(format!(
                "Name must have at most {NAME_MAX_LENGTH} characters."
            )));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(SessionError::Validation("Invalid email.".to_owned()));
        }
        validate_password(&self.password)
    }
}

/// Password rule: minimum length, one uppercase letter, one digit.
///
/// # Errors
///
/// Returns [`SessionError::Validation`] describing the missing requirement.
pub fn validate_password(password: &str) -> Result<(), SessionError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(SessionError::Validation(format!(
            "Password must have at least {PASSWORD_MIN_LENGTH} characters."
        )));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(SessionError::Validation(
            "Password must contain at least one uppercase letter.".to_owned(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(SessionError::Validation("Password must contain at least one number.".to_owned()));
    }
    Ok(())
}

fn looks_like_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !raw.chars().any(char::is_whitespace)
}

/// Body of a successful `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `{ success, data, message }` envelope used by most backend responses.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}
