//! Public landing page. Also the neutral target of role-mismatch redirects.

use leptos::prelude::*;

use crate::components::session_bar::SessionBar;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <SessionBar/>
        <main class="home-page">
            <h1>"Find suppliers for your event"</h1>
            <p>"Browse catering, venues, music and decoration from trusted suppliers."</p>
        </main>
    }
}
