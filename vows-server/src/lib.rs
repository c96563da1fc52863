//! HTTP surface of the vows wedding site.
//!
//! Public routes cover RSVPs, the schedule, the gallery and the registry;
//! `/api/admin/*` routes require the configured admin bearer token.

pub mod auth;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use vows_core::photo::UPLOADS_URL_PREFIX;

pub use state::AppState;

/// Build the full router for `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .merge(routes::rsvp::router())
        .merge(routes::events::router())
        .merge(routes::photos::router())
        .merge(routes::registry::router())
        .merge(routes::site::router())
        .merge(routes::admin::router(state.clone()))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(state.config.uploads_path()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
