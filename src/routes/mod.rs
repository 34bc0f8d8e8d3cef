//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server is an API backend for two browser frontends (the pixel-grid
//! editor and the productivity tracker); it serves JSON plus the JPEG
//! export, with session cookies carrying identity. Everything under `/api`
//! requires a valid session except the OAuth entry points.

pub mod auth;
pub mod designs;
pub mod logs;
pub mod options;
pub mod schedule;
pub mod tracker;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/auth/github", get(auth::github_redirect))
        .route("/auth/github/callback", get(auth::github_callback))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/options", get(options::list).post(options::create))
        .route("/api/options/{id}", axum::routing::delete(options::delete))
        .route("/api/schedule", get(schedule::list).post(schedule::create))
        .route("/api/schedule/current", get(schedule::current))
        .route("/api/schedule/{id}", axum::routing::delete(schedule::delete))
        .route("/api/tracker/active", get(tracker::active))
        .route("/api/tracker/start", post(tracker::start))
        .route("/api/tracker/stop", post(tracker::stop))
        .route("/api/tracker/switch", post(tracker::switch))
        .route("/api/logs", get(logs::list))
        .route("/api/stats", get(logs::stats))
        .route("/api/designs", get(designs::list).post(designs::create))
        .route(
            "/api/designs/{id}",
            get(designs::get_one).put(designs::update).delete(designs::delete),
        )
        .route("/api/designs/{id}/paint", post(designs::paint))
        .route("/api/designs/{id}/export.jpg", get(designs::export_jpg))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
