//! Client-side session lifecycle for the marketplace front end.
//!
//! This crate owns everything between "the backend handed us a token" and
//! "this page may render": token decoding and liveness, the two mirrored
//! storage locations, the in-memory auth cache, the guard policy, and the
//! structural pre-filter the SSR host runs before any page code. It has no
//! browser or server dependency; the `client` and `server` crates plug their
//! own storage backends and HTTP transport into the seams defined here.

pub mod api;
pub mod config;
pub mod cookie;
pub mod edge;
pub mod error;
pub mod guard;
pub mod manager;
pub mod role;
pub mod state;
pub mod storage;
pub mod token;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{IdentityApi, RequestAuth};
pub use config::SessionConfig;
pub use edge::{EdgeDecision, EdgeRules, PathClass};
pub use error::SessionError;
pub use guard::{GuardState, Redirect};
pub use manager::SessionManager;
pub use role::Role;
pub use state::AuthState;
pub use storage::{CookieStore, Detached, KeyValueStore, MemoryCookies, MemoryStore, SessionStorage};
pub use types::{LoginRequest, ProfilePatch, RegisterRequest, UserProfile};
