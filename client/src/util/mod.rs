//! Browser-facing helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `browser_storage` adapts localStorage and `document.cookie` to the session
//! crate's store traits; `auth` holds the route guard component.

pub mod auth;
pub mod browser_storage;
