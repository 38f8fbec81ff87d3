use axum::{
    Router,
    routing::{get, post},
};
use ferrocam_model::routes;

use crate::{
    handlers::{camera_handlers, capture_handlers, ping},
    infra::app_state::AppState,
};

/// Camera API routes, mounted at their absolute `/api/...` paths.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            routes::CAMERA_INFO,
            get(camera_handlers::get_camera_info_handler),
        )
        .route(
            routes::SET_CAMERA_CONFIG,
            post(camera_handlers::set_camera_config_handler),
        )
        .route(
            routes::CAPTURE_IMAGE,
            get(capture_handlers::capture_image_handler),
        )
        .route(
            routes::CAPTURE_BINARY,
            get(capture_handlers::capture_binary_handler),
        )
}

pub fn create_public_router() -> Router<AppState> {
    Router::new().route(routes::PING, get(ping::ping_handler))
}
