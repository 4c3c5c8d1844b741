//! Closed set of account roles issued by the backend.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role carried in the token's `type` claim and the user profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Event client browsing suppliers.
    Client,
    /// Supplier managing a listing, media and contact form.
    Supplier,
    /// Platform moderator.
    Admin,
}

/// Error returned when a role string is not one of the known tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Wire tag for this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Supplier => "supplier",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "supplier" => Ok(Self::Supplier),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
