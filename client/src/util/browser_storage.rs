//! Browser-backed session storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! `LocalStore` maps the session's persistent store onto `localStorage`;
//! `DocumentCookies` maps the cookie mirror onto `document.cookie`, which is
//! what the SSR host's edge middleware reads on the next page request.
//!
//! TRADE-OFFS
//! ==========
//! Browser access is best-effort: a missing window, blocked storage or a
//! rejected cookie write is swallowed. Off the browser (SSR, native tests)
//! both backends report unavailable and never touch anything, so the guard
//! defers to the hydrated client.

use session::cookie;
use session::{CookieStore, KeyValueStore};

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn is_available(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            local_storage().is_some()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            false
        }
    }

    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(key, value);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }

    fn remove_item(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}

/// `document.cookie`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

impl CookieStore for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let header = html_document()?.cookie().ok()?;
            cookie::lookup(&header, name)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = name;
            None
        }
    }

    fn set(&self, name: &str, value: &str, ttl_days: u32) {
        write_cookie(&cookie::assignment(name, value, ttl_days));
    }

    fn remove(&self, name: &str) {
        write_cookie(&cookie::deletion(name));
    }
}

fn write_cookie(assignment: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(doc) = html_document() {
            let _ = doc.set_cookie(assignment);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = assignment;
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
fn html_document() -> Option<web_sys::HtmlDocument> {
    use wasm_bindgen::JsCast;

    web_sys::window()?.document()?.dyn_into::<web_sys::HtmlDocument>().ok()
}
