//! Track handlers
//!
//! Upload a subtitle blob, resolve the resulting handle, release it.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::handlers::HttpError;
use crate::converter::MemoryConverter;
use crate::resource::{Blob, VTT_MIME};
use crate::state::AppState;

/// Response after creating a track
#[derive(Debug, Serialize)]
pub struct CreateTrackResponse {
    /// Registry id of the handle
    pub id: String,
    /// Handle URL, usable as a track source
    pub url: String,
    /// Size of the WebVTT document in bytes
    pub size: usize,
}

fn parse_id(id: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(id).map_err(|_| HttpError::TrackNotFound(id.to_string()))
}

/// Convert an uploaded subtitle blob into a track
/// POST /tracks
pub async fn create_track(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    if !state.try_reserve_slot() {
        return Err(HttpError::TrackLimit(state.config.limits.max_tracks));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let blob = Blob::new(body, content_type);

    match convert_upload(&state, blob).await {
        Ok(response) => Ok((StatusCode::CREATED, Json(response)).into_response()),
        Err(e) => {
            state.release_slot();
            Err(e)
        }
    }
}

/// Convert and register one upload. The reserved slot passes to the track
/// only once it is registered.
async fn convert_upload(state: &AppState, blob: Blob) -> Result<CreateTrackResponse, HttpError> {
    let converter = MemoryConverter::in_memory(blob, state.registry.clone())
        .with_config(state.config.converter.clone());
    let handle = converter.get_handle().await?;
    let id = handle
        .id()
        .ok_or_else(|| HttpError::InternalError(format!("Handle without id: {}", handle)))?;
    let size = converter.output().await.map(|b| b.len()).unwrap_or(0);

    state.register_track(id, Arc::new(converter));

    Ok(CreateTrackResponse {
        id: id.to_string(),
        url: handle.into(),
        size,
    })
}

/// Resolve a handle to its WebVTT document
/// GET /tracks/{id}
pub async fn get_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let blob = state
        .registry
        .get(&parse_id(&id)?)
        .ok_or(HttpError::TrackNotFound(id))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(VTT_MIME));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Ok((headers, blob.data().clone()).into_response())
}

/// Release a track, revoking its handle
/// DELETE /tracks/{id}
pub async fn delete_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let converter = state
        .remove_track(&parse_id(&id)?)
        .ok_or(HttpError::TrackNotFound(id))?;

    converter.release().await;
    Ok(StatusCode::NO_CONTENT)
}
