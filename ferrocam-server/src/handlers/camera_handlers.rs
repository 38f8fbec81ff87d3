use axum::{Json, body::Bytes, extract::State};
use tracing::warn;

use ferrocam_model::{
    CameraInfoResponse, SetCameraConfigRequest, SetCameraConfigResponse,
};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// `GET /api/get_camera_info`: the full registry snapshot.
pub async fn get_camera_info_handler(
    State(state): State<AppState>,
) -> Json<CameraInfoResponse> {
    Json(CameraInfoResponse {
        cameras: state.registry.list(),
    })
}

/// `POST /api/set_camera_config`.
///
/// The body is buffered whole and parsed here rather than by the `Json`
/// extractor: any parse failure, content type included, is the same 400.
pub async fn set_camera_config_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SetCameraConfigResponse>> {
    let request: SetCameraConfigRequest = serde_json::from_slice(&body)
        .map_err(|err| {
            warn!(error = %err, "rejected set_camera_config body");
            AppError::malformed_body()
        })?;

    // An unknown camera wins over a bad quality value.
    if !state.registry.contains(&request.index) {
        warn!(index = %request.index, "configuration for unknown camera");
        return Err(AppError::not_found("Camera not found"));
    }
    let patch = request.patch().map_err(|err| {
        warn!(index = %request.index, error = %err, "configuration rejected");
        AppError::bad_request("Invalid quality")
    })?;

    match state.registry.apply_config(&request.index, &patch) {
        Ok(_) => Ok(Json(SetCameraConfigResponse {
            success: true,
            message: "Camera configuration updated successfully".into(),
        })),
        Err(err) => {
            warn!(index = %request.index, error = %err, "configuration rejected");
            Err(err.into())
        }
    }
}
