//! Songbook Server - HTTP API for the music track catalog.
//!
//! The server exposes CRUD endpoints for tracks plus a derived statistics
//! view, all backed by a SQLite store. Persistence, filtering and
//! aggregation are delegated to the database's query language; the crate
//! itself only validates requests, shapes responses and wires the two
//! together.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
///
/// Constructed once at startup and passed by value into the router; there
/// is no global singleton.
#[derive(Clone)]
pub struct AppState {
    pub pool: db::Pool,
}

/// Build the application router with middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
