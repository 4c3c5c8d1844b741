//! Administration area. Admin role only.

use leptos::prelude::*;
use session::Role;

use crate::components::session_bar::SessionBar;
use crate::state::auth::{display_name, use_session};
use crate::util::auth::RequireAuth;

#[component]
pub fn AdminPage() -> impl IntoView {
    let session = use_session();
    let who = move || session.and_then(|s| display_name(&s.auth().get())).unwrap_or_default();

    view! {
        <SessionBar/>
        <RequireAuth role=Role::Admin>
            <main class="admin-page">
                <h1>"Administration"</h1>
                <p>"Signed in as " {who}</p>
            </main>
        </RequireAuth>
    }
}
