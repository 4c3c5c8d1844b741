//! Dual token storage.
//!
//! ARCHITECTURE
//! ============
//! The token lives in two places: a persistent page-scoped store (survives
//! reloads, invisible to the SSR host) and a cookie (sent with every page
//! request, so the edge interceptor can see it). [`SessionStorage`] composes
//! one backend of each kind behind a single `get`/`set`/`clear` contract so
//! no call site can update one location and forget the other.
//!
//! The browser backends live in the `client` crate; this module ships
//! in-memory backends for tests and a [`Detached`] backend for contexts with
//! no page environment.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::types::UserProfile;

/// Persistent page-scoped key/value store (`localStorage` in the browser).
pub trait KeyValueStore {
    /// `false` when running without a page environment (server render).
    fn is_available(&self) -> bool {
        true
    }
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// Request-visible cookie jar (`document.cookie` in the browser).
pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str, ttl_days: u32);
    fn remove(&self, name: &str);
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// In-memory [`CookieStore`] that also remembers each cookie's TTL.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    jar: RefCell<HashMap<String, (String, u32)>>,
}

impl MemoryCookies {
    #[must_use]
    pub fn ttl_days(&self, name: &str) -> Option<u32> {
        self.jar.borrow().get(name).map(|(_, ttl)| *ttl)
    }
}

impl CookieStore for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.borrow().get(name).map(|(value, _)| value.clone())
    }

    fn set(&self, name: &str, value: &str, ttl_days: u32) {
        self.jar.borrow_mut().insert(name.to_owned(), (value.to_owned(), ttl_days));
    }

    fn remove(&self, name: &str) {
        self.jar.borrow_mut().remove(name);
    }
}

/// Backend for execution contexts without a document or window. Reads
/// nothing, writes nothing, and reports itself unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl KeyValueStore for Detached {
    fn is_available(&self) -> bool {
        false
    }

    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) {}

    fn remove_item(&self, _key: &str) {}
}

impl CookieStore for Detached {
    fn get(&self, _name: &str) -> Option<String> {
        None
    }

    fn set(&self, _name: &str, _value: &str, _ttl_days: u32) {}

    fn remove(&self, _name: &str) {}
}

/// What [`SessionStorage::reconcile`] changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// Both locations already agreed (or both were empty).
    Unchanged,
    /// Cookie was empty; copied from the persistent store.
    CookieFromPersistent,
    /// Persistent store was empty; copied from the cookie.
    PersistentFromCookie,
    /// Locations disagreed; cookie overwritten with the persistent value.
    CookieOverwritten,
    /// No page environment; nothing to reconcile.
    Skipped,
}

/// The token mirrored across a persistent store and a cookie.
pub struct SessionStorage<P, C> {
    persistent: P,
    cookies: C,
    token_key: String,
    user_key: String,
    cookie_name: String,
    ttl_days: u32,
}

impl<P: KeyValueStore, C: CookieStore> SessionStorage<P, C> {
    #[must_use]
    pub fn new(persistent: P, cookies: C, config: &SessionConfig) -> Self {
        Self {
            persistent,
            cookies,
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
            cookie_name: config.cookie_name.clone(),
            ttl_days: config.cookie_ttl_days,
        }
    }

    /// Raw persistent backend, for diagnostics and tests.
    pub fn persistent(&self) -> &P {
        &self.persistent
    }

    /// Raw cookie backend, for diagnostics and tests.
    pub fn cookies(&self) -> &C {
        &self.cookies
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.persistent.is_available()
    }

    /// Token from the persistent store (the source of truth client-side).
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.persistent.get_item(&self.token_key).filter(|t| !t.is_empty())
    }

    /// Token from the cookie mirror.
    #[must_use]
    pub fn cookie_token(&self) -> Option<String> {
        self.cookies.get(&self.cookie_name).filter(|t| !t.is_empty())
    }

    /// Write the token to both locations with the configured cookie TTL.
    pub fn set(&self, token: &str) {
        self.set_with_ttl(token, self.ttl_days);
    }

    /// Write the token to the persistent store, then the cookie. Skipped
    /// entirely without a page environment.
    pub fn set_with_ttl(&self, token: &str, ttl_days: u32) {
        if !self.is_available() {
            tracing::debug!("no page environment; token write skipped");
            return;
        }
        self.persistent.set_item(&self.token_key, token);
        self.cookies.set(&self.cookie_name, token, ttl_days);
    }

    /// Remove token, cached profile and cookie. Idempotent.
    pub fn clear(&self) {
        self.persistent.remove_item(&self.token_key);
        self.persistent.remove_item(&self.user_key);
        self.cookies.remove(&self.cookie_name);
    }

    /// Bring the two locations back into agreement. The persistent store
    /// wins when both hold different values.
    pub fn reconcile(&self) -> Reconciled {
        if !self.is_available() {
            return Reconciled::Skipped;
        }
        let outcome = match (self.get(), self.cookie_token()) {
            (None, None) => Reconciled::Unchanged,
            (Some(stored), None) => {
                self.cookies.set(&self.cookie_name, &stored, self.ttl_days);
                Reconciled::CookieFromPersistent
            }
            (None, Some(cookie)) => {
                self.persistent.set_item(&self.token_key, &cookie);
                Reconciled::PersistentFromCookie
            }
            (Some(stored), Some(cookie)) if stored != cookie => {
                self.cookies.set(&self.cookie_name, &stored, self.ttl_days);
                Reconciled::CookieOverwritten
            }
            (Some(_), Some(_)) => Reconciled::Unchanged,
        };
        if outcome != Reconciled::Unchanged {
            tracing::debug!(?outcome, "token storage reconciled");
        }
        outcome
    }

    /// Cached profile from the persistent store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Decode`] when the stored JSON is corrupt.
    pub fn load_user(&self) -> Result<Option<UserProfile>, SessionError> {
        let Some(raw) = self.persistent.get_item(&self.user_key) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::Decode(e.to_string()))
    }

    pub fn save_user(&self, user: &UserProfile) {
        if !self.is_available() {
            return;
        }
        match serde_json::to_string(user) {
            Ok(raw) => self.persistent.set_item(&self.user_key, &raw),
            Err(e) => tracing::warn!(error = %e, "failed to serialize user profile"),
        }
    }
}
