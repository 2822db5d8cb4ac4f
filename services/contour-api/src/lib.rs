//! Contour API Service Library
//!
//! HTTP front end for the map-to-terrain pipeline: uploads become textures
//! (with bounds when georeferenced), elevation images become normalized
//! heightmaps, and the remote AI collaborators are proxied behind JSON
//! endpoints.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod state;
pub mod uploads;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/upload", post(handlers::upload::upload_handler))
        .route(
            "/api/extract-bounds",
            post(handlers::bounds::extract_bounds_handler),
        )
        .route(
            "/api/generate-heightmap",
            post(handlers::heightmap::generate_heightmap_handler),
        )
        .route("/api/heightmap", post(handlers::heightmap::heightmap_handler))
        .route("/api/stylize", post(handlers::stylize::stylize_handler))
        .route("/api/narrate", post(handlers::narrate::narrate_handler))
        .route("/api/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
