//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves the Leptos SSR app, its static bundle under `/pkg` and a health
//! probe. Every request passes the edge interceptor first; assets and the
//! probe are exempt inside the middleware itself.

pub mod edge;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Put the edge interceptor and request tracing in front of `router`.
pub fn guarded(router: Router, state: AppState) -> Router {
    router
        .layer(middleware::from_fn_with_state(state, edge::intercept))
        .layer(TraceLayer::new_for_http())
}

/// Leptos SSR frontend with `/pkg` assets and `/healthz`.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded.
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    let router = Router::new()
        .route("/healthz", get(healthz))
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")));
    Ok(guarded(router, state))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
