//! Header strip showing who is signed in, with login/logout links.

#[cfg(test)]
#[path = "session_bar_test.rs"]
mod session_bar_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::{AuthState, Role};

use crate::state::auth::{display_name, use_session};

/// Human label for a role tag.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Client => "Client",
        Role::Supplier => "Supplier",
        Role::Admin => "Administrator",
    }
}

/// Home link for the signed-in user's role, if it has one.
pub fn role_home(state: &AuthState) -> Option<&'static str> {
    match state.role()? {
        Role::Supplier => Some("/dashboard"),
        Role::Admin => Some("/admin"),
        Role::Client => None,
    }
}

#[component]
pub fn SessionBar() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let auth = move || session.map(|s| s.auth().get()).unwrap_or_default();

    let on_logout = move |_| {
        if let Some(session) = session {
            session.manager().logout();
            session.sync();
        }
        navigate("/login", NavigateOptions::default());
    };

    view! {
        <header class="session-bar">
            <a class="session-bar__brand" href="/">"Marketplace"</a>
            <Show
                when=move || auth().is_authenticated()
                fallback=|| {
                    view! {
                        <nav class="session-bar__links">
                            <a href="/login">"Sign in"</a>
                            <a href="/register">"Create account"</a>
                        </nav>
                    }
                }
            >
                <nav class="session-bar__links">
                    <span class="session-bar__user">{move || display_name(&auth()).unwrap_or_default()}</span>
                    <span class="session-bar__role">{move || auth().role().map(role_label)}</span>
                    {move || role_home(&auth()).map(|href| view! { <a href=href>"My area"</a> })}
                    <button class="session-bar__logout" on:click=on_logout.clone()>"Log out"</button>
                </nav>
            </Show>
        </header>
    }
}
