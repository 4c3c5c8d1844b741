//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Protected pages render their content through `RequireAuth`; login and
//! register install the signed-in redirect. Everything else is presentation.

pub mod admin;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod register;
