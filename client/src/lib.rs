//! # client
//!
//! Leptos + WASM front end for the marketplace.
//!
//! Pages here are thin shells; the interesting part is wiring the `session`
//! crate into the browser: `localStorage` and `document.cookie` backends, an
//! HTTP identity client over `gloo-net`, and the `RequireAuth` guard
//! component that every protected page renders through.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic and log hooks, then hydrate the
/// server-rendered document.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
