//! Session context for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionManager` per page process, created by the root `App` and
//! reached through Leptos context. The `auth` signal mirrors the manager's
//! auth state so headers and menus re-render on login and logout.
//!
//! DESIGN
//! ======
//! The manager is `!Send` (interior mutability, browser futures), so it sits
//! in a local `StoredValue`. It is created in the browser only; during SSR
//! no session is provided and guarded pages render their checking
//! placeholder. The signal starts empty and is filled after hydration so
//! server and client markup agree.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use leptos::prelude::*;
use session::{AuthState, SessionConfig, SessionManager, SessionStorage};

use crate::net::api::HttpIdentityApi;
use crate::util::browser_storage::{DocumentCookies, LocalStore};

pub type ClientSession = SessionManager<HttpIdentityApi, LocalStore, DocumentCookies>;

/// Copyable handle to the page's session, provided via context.
#[derive(Clone, Copy)]
pub struct SessionHandle {
    manager: StoredValue<Rc<ClientSession>, LocalStorage>,
    auth: RwSignal<AuthState>,
}

impl SessionHandle {
    pub fn new(manager: ClientSession) -> Self {
        Self {
            manager: StoredValue::new_local(Rc::new(manager)),
            auth: RwSignal::new(AuthState::default()),
        }
    }

    pub fn manager(&self) -> Rc<ClientSession> {
        self.manager.get_value()
    }

    pub fn auth(&self) -> ReadSignal<AuthState> {
        self.auth.read_only()
    }

    /// Copy the manager's auth state into the signal. Call after anything
    /// that may have changed it.
    pub fn sync(&self) {
        self.auth.set(self.manager().auth_state());
    }
}

/// Session backed by `localStorage`, `document.cookie` and the configured
/// backend URL.
pub fn browser_session() -> ClientSession {
    let config = SessionConfig::default();
    let storage = SessionStorage::new(LocalStore, DocumentCookies, &config);
    SessionManager::new(HttpIdentityApi::default(), storage, config)
}

/// Create the session and put it in context. Browser only.
pub fn provide_session() {
    #[cfg(feature = "hydrate")]
    {
        let handle = SessionHandle::new(browser_session());
        provide_context(handle);
        Effect::new(move || {
            handle.manager().init();
            handle.sync();
        });
    }
}

pub fn use_session() -> Option<SessionHandle> {
    use_context::<SessionHandle>()
}

/// Label for the signed-in user: name, else email, else `User #id`.
pub fn display_name(state: &AuthState) -> Option<String> {
    let user = state.user()?;
    let label = [user.name.trim(), user.email.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .map_or_else(|| format!("User #{}", user.id), str::to_owned);
    Some(label)
}
