//! Networking for the marketplace backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` implements the session crate's `IdentityApi` over `fetch` and wraps
//! other authenticated calls in the session's request policy.

pub mod api;
