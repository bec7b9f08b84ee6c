//! Axum router configuration

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{active_tracks, health_check, version_check};
use super::tracks::{create_track, delete_track, get_track};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        // Debug endpoints
        .route("/debug/tracks", get(active_tracks))
        // Tracks
        .route("/tracks", post(create_track))
        .route("/tracks/{id}", get(get_track).delete(delete_track))
        // Middleware
        .layer(DefaultBodyLimit::max(state.config.limits.max_upload_bytes()))
        .layer(TraceLayer::new_for_http());

    let router = if state.config.cors_enabled {
        // Track elements fetch cross-origin, so the player page needs CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::DELETE,
                Method::OPTIONS,
                Method::HEAD,
            ])
            .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
            .max_age(Duration::from_secs(3600));
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
