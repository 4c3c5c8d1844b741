//! Login page: email and password against the marketplace backend.
//!
//! Honors the `redirect` query parameter (where to go after signing in) and
//! `expired=true` (show the session-expired notice).

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use session::LoginRequest;
use session::guard::safe_return_path;

use crate::state::auth::use_session;
use crate::util::auth::install_signed_in_redirect;

pub const EXPIRED_NOTICE: &str = "Your session expired. Please log in again.";
const NO_SESSION_MESSAGE: &str = "Sign-in is unavailable until the page finishes loading.";

/// Notice shown above the form for the `expired` query value.
pub fn login_notice(expired: Option<&str>) -> Option<&'static str> {
    (expired == Some("true")).then_some(EXPIRED_NOTICE)
}

/// Where to go after a successful login.
pub fn post_login_target(redirect: Option<&str>) -> String {
    safe_return_path(redirect)
}

/// Check the form before any request. Returns the message to show.
pub fn validate_login_input(email: &str, password: &str) -> Result<(), String> {
    LoginRequest::new(email, password).map(|_| ()).map_err(|e| e.user_message())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    install_signed_in_redirect();

    let session = use_session();
    let query = use_query_map();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let notice = move || query.with(|q| login_notice(q.get("expired").as_deref()));

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = email.get();
        let password_value = password.get();
        if let Err(message) = validate_login_input(&email_value, &password_value) {
            error.set(Some(message));
            return;
        }
        let Some(session) = session else {
            error.set(Some(NO_SESSION_MESSAGE.to_owned()));
            return;
        };
        let target = post_login_target(query.with_untracked(|q| q.get("redirect")).as_deref());
        error.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let manager = session.manager();
                match manager.login(&email_value, &password_value).await {
                    Ok(_) => {
                        session.sync();
                        navigate(&target, leptos_router::NavigateOptions::default());
                    }
                    Err(e) => {
                        error.set(Some(e.user_message()));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (session, target);
            busy.set(false);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                {move || notice().map(|text| view! { <p class="login-message login-message--notice">{text}</p> })}
                <form class="login-form" on:submit=on_submit>
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
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <p class="login-card__subtitle">
                    "No account yet? "
                    <a href="/register">"Create one"</a>
                </p>
            </div>
        </div>
    }
}
