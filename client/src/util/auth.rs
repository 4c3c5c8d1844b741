//! Route guard component and its decision helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page renders through [`RequireAuth`]. It runs the session
//! guard for the current path, renders children only once the decision is
//! `Authorized`, and performs the redirect otherwise. The page never sees a
//! half-decided session. The guard re-runs on navigation and whenever the
//! signed-in flag flips; only the latest run may apply its decision.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;
use session::{GuardState, Role, SessionConfig};

#[cfg(feature = "hydrate")]
use session::AuthState;

#[cfg(feature = "hydrate")]
use crate::state::auth::use_session;

/// Site-relative URL to navigate to for a guard decision, if any.
pub fn navigation_target(state: &GuardState, config: &SessionConfig) -> Option<String> {
    state.redirect().map(|target| target.to_url(config))
}

pub fn should_render(state: &GuardState) -> bool {
    *state == GuardState::Authorized
}

/// The placeholder is shown while undecided; a redirect renders nothing.
pub fn shows_placeholder(state: &GuardState) -> bool {
    !state.is_terminal()
}

/// Numbers guard runs so only the most recent one may apply its decision.
#[derive(Clone, Debug, Default)]
pub struct GuardRuns(Arc<AtomicU64>);

impl GuardRuns {
    /// Start a run, superseding every earlier one.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, run: u64) -> bool {
        self.0.load(Ordering::SeqCst) == run
    }

    /// Supersede all runs, e.g. when the component unmounts.
    pub fn cancel(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Render `children` only for a session the guard authorizes, optionally
/// requiring `role`.
#[component]
pub fn RequireAuth(#[prop(optional)] role: Option<Role>, children: ChildrenFn) -> impl IntoView {
    let guard = RwSignal::new(GuardState::Uninitialized);

    #[cfg(feature = "hydrate")]
    {
        use leptos_router::NavigateOptions;
        use leptos_router::hooks::{use_location, use_navigate};

        let location = use_location();
        let navigate = use_navigate();
        let runs = GuardRuns::default();
        let runs_on_cleanup = runs.clone();

        if let Some(session) = use_session() {
            let signed_in = Memo::new(move |_| session.auth().with(AuthState::is_authenticated));
            Effect::new(move |previous: Option<String>| {
                let path = location.pathname.get();
                signed_in.track();
                if previous.as_deref() != Some(path.as_str()) {
                    guard.set(GuardState::Checking);
                }
                let run = runs.begin();
                let runs = runs.clone();
                let navigate = navigate.clone();
                let task_path = path.clone();
                leptos::task::spawn_local(async move {
                    let manager = session.manager();
                    let mut state = manager.evaluate(&task_path, role).await;
                    if state == GuardState::Checking {
                        // Superseded by a logout or login mid-fetch.
                        state = manager.evaluate(&task_path, role).await;
                    }
                    if runs.is_current(run) {
                        if let Some(url) = navigation_target(&state, manager.config()) {
                            leptos::logging::log!("guard redirect {task_path} -> {url}");
                            navigate(&url, NavigateOptions { replace: true, ..NavigateOptions::default() });
                        }
                        guard.set(state);
                    }
                    session.sync();
                });
                path
            });
        }
        on_cleanup(move || runs_on_cleanup.cancel());
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = role;

    view! {
        <Show
            when=move || should_render(&guard.get())
            fallback=move || {
                shows_placeholder(&guard.get())
                    .then(|| view! { <p class="guard-checking">"Checking session..."</p> })
            }
        >
            {children()}
        </Show>
    }
}

/// On login/register pages, send an already signed-in visitor on to the
/// `redirect` query target (same-site paths only, else `/`).
pub fn install_signed_in_redirect() {
    #[cfg(feature = "hydrate")]
    {
        use leptos_router::NavigateOptions;
        use leptos_router::hooks::{use_location, use_navigate, use_query_map};

        let Some(session) = use_session() else {
            return;
        };
        let location = use_location();
        let query = use_query_map();
        let navigate = use_navigate();
        Effect::new(move || {
            let requested = query.with(|q| q.get("redirect"));
            let manager = session.manager();
            manager.init();
            let path = location.pathname.get_untracked();
            if let Some(target) = manager.auth_only_redirect(&path, requested.as_deref()) {
                navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        });
    }
}
