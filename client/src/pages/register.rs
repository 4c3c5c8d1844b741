//! Account creation page. Does not sign in; a successful registration
//! continues to the login page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use session::{Redirect, RegisterRequest, Role, SessionConfig};

use crate::state::auth::use_session;
use crate::util::auth::install_signed_in_redirect;

/// Account type picked in the form. Administrators are never self-created.
pub fn parse_role_choice(value: &str) -> Role {
    match value.parse::<Role>() {
        Ok(Role::Supplier) => Role::Supplier,
        _ => Role::Client,
    }
}

/// Where to go after registering, carrying the caller's `redirect` along.
pub fn post_register_target(redirect: Option<&str>, config: &SessionConfig) -> String {
    match redirect.filter(|r| !r.is_empty()) {
        Some(path) => Redirect::login_returning_to(path).to_url(config),
        None => Redirect::login().to_url(config),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    install_signed_in_redirect();

    let session = use_session();
    let query = leptos_router::hooks::use_query_map();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Client);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = RegisterRequest {
            name: name.get().trim().to_owned(),
            email: email.get().trim().to_owned(),
            password: password.get(),
            role: role.get(),
        };
        if let Err(e) = request.validate() {
            error.set(Some(e.user_message()));
            return;
        }
        let Some(session) = session else {
            return;
        };
        let requested = query.with_untracked(|q| q.get("redirect"));
        let target = post_register_target(requested.as_deref(), session.manager().config());
        error.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match session.manager().register(&request).await {
                    Ok(_) => navigate(&target, leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        error.set(Some(e.user_message()));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (session, target, request);
            busy.set(false);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create account"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Full name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password (8+ characters, one uppercase, one digit)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <select class="login-input" on:change=move |ev| role.set(parse_role_choice(&event_target_value(&ev)))>
                        <option value="client" selected=move || role.get() == Role::Client>"I am organizing an event"</option>
                        <option value="supplier" selected=move || role.get() == Role::Supplier>"I am a supplier"</option>
                    </select>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <p class="login-card__subtitle">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
