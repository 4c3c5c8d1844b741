//! In-memory auth cache consulted by UI code before any network call.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::role::Role;
use crate::types::{ProfilePatch, UserProfile};

/// Current user and token. Either both are present or neither is; the
/// fields are private so that holds by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<UserProfile>,
    token: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn authenticated(user: UserProfile, token: String) -> Self {
        Self { user: Some(user), token: Some(token) }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Merge `patch` into the cached user. Returns the updated profile, or
    /// `None` when nobody is logged in.
    pub(crate) fn update_user(&mut self, patch: ProfilePatch) -> Option<&UserProfile> {
        let user = self.user.as_mut()?;
        user.apply(patch);
        Some(user)
    }
}
