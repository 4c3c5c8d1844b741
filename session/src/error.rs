//! Session error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Storage and decode problems never reach the user; the guard turns them
//! into redirects. Only explicit user actions (login, register) surface a
//! [`SessionError`], via [`SessionError::user_message`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of a session-lifecycle operation.
///
/// `Clone` so a single in-flight identity result can be handed to every
/// waiting guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Transport failure before any HTTP status was received.
    #[error("connection error: {0}")]
    Network(String),
    /// The backend answered 401.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Any other non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The stored token expired before the request was sent.
    #[error("session expired")]
    Expired,
    /// The backend issued a token the client cannot read.
    #[error("session token could not be decoded")]
    InvalidToken,
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),
    /// A success response whose body did not match the expected schema.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl SessionError {
    /// Text suitable for showing next to a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Connection error. Check your internet connection and try again.".to_owned(),
            Self::Unauthorized(message) | Self::Rejected { message, .. } | Self::Validation(message) => {
                message.clone()
            }
            Self::Expired => "Session expired. Please log in again.".to_owned(),
            Self::InvalidToken | Self::Decode(_) => "Unexpected response from the server.".to_owned(),
        }
    }

    /// HTTP status behind this error, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
