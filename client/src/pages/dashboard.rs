//! Supplier dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Supplier-only route. Shows the cached profile and lets the supplier
//! re-read it from the backend, which exercises the authenticated-call
//! policy: an expired or rejected session ends here in a login redirect.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use session::{AuthState, Role};

use crate::components::session_bar::SessionBar;
use crate::state::auth::use_session;
use crate::util::auth::RequireAuth;

/// `(label, value)` rows for the profile card.
pub fn profile_rows(state: &AuthState) -> Vec<(&'static str, String)> {
    let Some(user) = state.user() else {
        return Vec::new();
    };
    let or_dash = |s: &str| if s.trim().is_empty() { "-".to_owned() } else { s.to_owned() };
    vec![
        ("Name", or_dash(user.name.as_str())),
        ("Email", or_dash(user.email.as_str())),
        ("Member since", or_dash(user.created_at.split('T').next().unwrap_or_default())),
    ]
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <SessionBar/>
        <RequireAuth role=Role::Supplier>
            <SupplierPanel/>
        </RequireAuth>
    }
}

#[component]
fn SupplierPanel() -> impl IntoView {
    let session = use_session();
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let rows = move || session.map(|s| profile_rows(&s.auth().get())).unwrap_or_default();

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();
    #[cfg(feature = "hydrate")]
    let location = leptos_router::hooks::use_location();

    let on_refresh = move |_| {
        if busy.get() {
            return;
        }
        let Some(session) = session else {
            return;
        };
        busy.set(true);
        info.set("Refreshing profile...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let path = location.pathname.get_untracked();
            leptos::task::spawn_local(async move {
                let manager = session.manager();
                match crate::net::api::refresh_profile(&manager, &path).await {
                    Ok(_) => info.set("Profile up to date.".to_owned()),
                    Err(failure) => {
                        info.set(failure.error.user_message());
                        if let Some(target) = failure.redirect {
                            navigate(&target.to_url(manager.config()), leptos_router::NavigateOptions::default());
                        }
                    }
                }
                session.sync();
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
            busy.set(false);
        }
    };

    view! {
        <main class="dashboard-page">
            <h1>"Supplier dashboard"</h1>
            <dl class="profile-card">
                <For each=rows key=|(label, _)| *label let:row>
                    <dt>{row.0}</dt>
                    <dd>{row.1}</dd>
                </For>
            </dl>
            <button class="dashboard-button" on:click=on_refresh disabled=move || busy.get()>
                "Refresh profile"
            </button>
            <Show when=move || !info.get().is_empty()>
                <p class="dashboard-message">{move || info.get()}</p>
            </Show>
        </main>
    }
}
