//! HTTP request handlers
//!
//! Shared error type plus the health, version and debug endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::registry::ResourceRegistry;
use crate::state::AppState;

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    TrackNotFound(String),
    TrackLimit(usize),
    Unprocessable(String),
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::TrackNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Track not found: {}", id))
            }
            HttpError::TrackLimit(max) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Track limit reached ({} live tracks)", max),
            ),
            HttpError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            HttpError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, body).into_response()
    }
}

impl From<ConvertError> for HttpError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::InvalidSource(_)
            | ConvertError::InvalidLoadResult
            | ConvertError::MalformedUtf8 { .. } => HttpError::Unprocessable(err.to_string()),
            _ => HttpError::InternalError(err.to_string()),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("webvtt-server v", env!("CARGO_PKG_VERSION"))
}

/// Live track list
#[derive(Debug, Serialize)]
pub struct TrackListResponse {
    pub count: usize,
    pub memory_bytes: usize,
    pub tracks: Vec<TrackInfo>,
}

#[derive(Debug, Serialize)]
pub struct TrackInfo {
    pub url: String,
    pub size: usize,
    pub age_secs: u64,
}

/// Debug endpoint listing live handles
/// GET /debug/tracks
pub async fn active_tracks(State(state): State<Arc<AppState>>) -> Json<TrackListResponse> {
    let tracks: Vec<TrackInfo> = state
        .registry
        .entries()
        .into_iter()
        .map(|(handle, entry)| TrackInfo {
            url: handle.into(),
            size: entry.resource.len(),
            age_secs: entry.age_secs(),
        })
        .collect();

    Json(TrackListResponse {
        count: state.registry.len(),
        memory_bytes: state.registry.memory_bytes(),
        tracks,
    })
}
