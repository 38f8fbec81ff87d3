use axum::{
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

const X_FRAMERATE: HeaderName = HeaderName::from_static("x-framerate");

#[derive(Debug, Default, Deserialize)]
pub struct CaptureQuery {
    pub source: Option<String>,
}

/// `GET /api/capture_image?source=<index>`: 302 to the still-image locator.
pub async fn capture_image_handler(
    State(state): State<AppState>,
    Query(query): Query<CaptureQuery>,
) -> AppResult<Response> {
    let still = state
        .gateway
        .resolve_still_image(query.source.as_deref())
        .map_err(|err| AppError::from(err).as_text())?;

    Ok((StatusCode::FOUND, [(header::LOCATION, still.location)]).into_response())
}

/// `GET /api/capture_binary?source=<index>`: raw payload as a download.
pub async fn capture_binary_handler(
    State(state): State<AppState>,
    Query(query): Query<CaptureQuery>,
) -> AppResult<Response> {
    let capture = state
        .gateway
        .resolve_raw_capture(query.source.as_deref())
        .await
        .map_err(|err| AppError::from(err).as_text())?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", capture.filename),
        ),
        (header::CACHE_CONTROL, "no-store".to_string()),
        (X_FRAMERATE, capture.frame_rate.to_string()),
    ];

    Ok((StatusCode::OK, headers, capture.bytes).into_response())
}
