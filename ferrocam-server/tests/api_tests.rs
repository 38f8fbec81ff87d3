use std::fs;

use axum::http::StatusCode;
use axum_test::TestServer;
use ferrocam_config::{ConfigLoader, EnvConfig};
use ferrocam_model::{
    CameraInfoResponse, ErrorResponse, Ident, Resolution, SetCameraConfigResponse,
    routes,
};
use ferrocam_server::{AppState, create_app};
use serde_json::json;
use tempfile::TempDir;

fn demo_server_with(env: EnvConfig) -> TestServer {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("ferrocam.toml");
    fs::write(&path, "").expect("write config");

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env)
        .expect("load config")
        .config;
    let state = AppState::from_config(config).expect("seed registry");
    TestServer::new(create_app(state)).expect("test server")
}

fn demo_server() -> TestServer {
    demo_server_with(EnvConfig::default())
}

#[tokio::test]
async fn fresh_registry_lists_three_cameras() {
    let server = demo_server();

    let response = server.get(routes::CAMERA_INFO).await;
    response.assert_status_ok();
    let body: CameraInfoResponse = response.json();

    let indices: Vec<_> = body.cameras.iter().map(|c| c.index.clone()).collect();
    assert_eq!(
        indices,
        vec![Ident::Number(0), Ident::Number(1), Ident::Number(2)]
    );
}

#[tokio::test]
async fn wire_shape_uses_camel_case_fields() {
    let server = demo_server();

    let body: serde_json::Value = server.get(routes::CAMERA_INFO).await.json();
    let front = &body["cameras"][0];
    assert_eq!(front["index"], json!(0));
    assert_eq!(front["currentImageFormat"], json!(1));
    assert_eq!(front["currentImageFormatDescription"], json!("RGB 5-6-5 640x480"));
    assert_eq!(front["currentResolution"], json!({"width": 640, "height": 480}));
    assert_eq!(front["src"], json!("https://picsum.photos/640/480"));
    assert_eq!(front["imageFormats"][1]["quality"]["step"], json!(1));
}

#[tokio::test]
async fn format_change_is_visible_in_the_next_listing() {
    let server = demo_server();

    let response = server
        .post(routes::SET_CAMERA_CONFIG)
        .json(&json!({"index": 0, "image_format": 2}))
        .await;
    response.assert_status_ok();
    let body: SetCameraConfigResponse = response.json();
    assert!(body.success);
    assert_eq!(body.message, "Camera configuration updated successfully");

    let listing: CameraInfoResponse = server.get(routes::CAMERA_INFO).await.json();
    let camera = &listing.cameras[0];
    assert_eq!(camera.current_image_format, Ident::Number(2));
    assert_eq!(
        camera.current_image_format_description.as_deref(),
        Some("RGB 8-8-8 640x480")
    );
    assert_eq!(camera.current_resolution, Resolution::new(640, 480));
    assert_eq!(camera.src, "https://picsum.photos/640/480");
}

#[tokio::test]
async fn resolution_change_moves_the_capture_redirect() {
    let server = demo_server();

    server
        .post(routes::SET_CAMERA_CONFIG)
        .json(&json!({"index": "1", "image_format": 3, "jpeg_quality": 70}))
        .await
        .assert_status_ok();

    let response = server
        .get(routes::CAPTURE_IMAGE)
        .add_query_param(routes::SOURCE_PARAM, "1")
        .await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "https://picsum.photos/1080/720"
    );
}

#[tokio::test]
async fn malformed_body_is_rejected_without_side_effects() {
    let server = demo_server();
    let before: CameraInfoResponse = server.get(routes::CAMERA_INFO).await.json();

    for body in ["not-json", r#"{"image_format": 2}"#, r#"{"index": 0, "jpeg_quality": "high"}"#] {
        let response = server.post(routes::SET_CAMERA_CONFIG).text(body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid JSON in request body");
    }

    let after: CameraInfoResponse = server.get(routes::CAMERA_INFO).await.json();
    assert_eq!(before, after);
}

#[tokio::test]
async fn unknown_camera_in_set_config_is_a_json_404() {
    let server = demo_server();

    let response = server
        .post(routes::SET_CAMERA_CONFIG)
        .json(&json!({"index": 99, "jpeg_quality": 70}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"error": "Camera not found"}));
}

#[tokio::test]
async fn numeric_indices_outside_u64_are_unknown_cameras() {
    let server = demo_server();

    for body in [
        json!({"index": -1, "jpeg_quality": 70}),
        json!({"index": 1.5, "jpeg_quality": 70}),
        json!({"index": -1, "jpeg_quality": 85.5}),
    ] {
        let response = server.post(routes::SET_CAMERA_CONFIG).json(&body).await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({"error": "Camera not found"}));
    }
}

#[tokio::test]
async fn whole_float_index_names_the_same_camera() {
    let server = demo_server();

    let response = server
        .post(routes::SET_CAMERA_CONFIG)
        .json(&json!({"index": 0.0, "jpeg_quality": 70}))
        .await;
    response.assert_status_ok();

    let info: CameraInfoResponse = server.get(routes::CAMERA_INFO).await.json();
    assert_eq!(info.cameras[0].current_quality, Some(70));
}

#[tokio::test]
async fn unstorable_quality_is_an_invalid_quality() {
    let server = demo_server();
    let before: CameraInfoResponse = server.get(routes::CAMERA_INFO).await.json();

    for quality in [json!(85.5), json!(-5), json!(5_000_000_000u64)] {
        let response = server
            .post(routes::SET_CAMERA_CONFIG)
            .json(&json!({"index": 0, "image_format": 2, "jpeg_quality": quality}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "Invalid quality"}));
    }

    let after: CameraInfoResponse = server.get(routes::CAMERA_INFO).await.json();
    assert_eq!(before, after);
}

#[tokio::test]
async fn capture_source_with_leading_zero_is_not_a_known_camera() {
    let server = demo_server();

    let response = server
        .get(routes::CAPTURE_IMAGE)
        .add_query_param(routes::SOURCE_PARAM, "01")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Camera not found");
}

#[tokio::test]
async fn unknown_format_is_a_json_400() {
    let server = demo_server();

    let response = server
        .post(routes::SET_CAMERA_CONFIG)
        .json(&json!({"index": 0, "image_format": 42}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid image format"}));
}

#[tokio::test]
async fn strict_policy_rejects_out_of_range_quality() {
    let server = demo_server_with(EnvConfig {
        quality_policy: Some("strict".into()),
        ..EnvConfig::default()
    });

    let response = server
        .post(routes::SET_CAMERA_CONFIG)
        .json(&json!({"index": 2, "jpeg_quality": 12}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid quality"}));
}

#[tokio::test]
async fn capture_image_errors_are_plain_text() {
    let server = demo_server();

    let response = server
        .get(routes::CAPTURE_IMAGE)
        .add_query_param(routes::SOURCE_PARAM, "99")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Camera not found");

    let response = server.get(routes::CAPTURE_IMAGE).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Missing source parameter");
}

#[tokio::test]
async fn capture_binary_is_an_attachment() {
    let server = demo_server();

    let response = server
        .get(routes::CAPTURE_BINARY)
        .add_query_param(routes::SOURCE_PARAM, "0")
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/octet-stream");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"camera_0_raw.bin\""
    );
    assert_eq!(response.header("x-framerate"), "30");
    assert_eq!(response.header("cache-control"), "no-store");
    assert_eq!(response.as_bytes().as_ref(), b"Mock binary data for camera 0");

    let response = server
        .get(routes::CAPTURE_BINARY)
        .add_query_param(routes::SOURCE_PARAM, "7")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Camera not found");
}

#[tokio::test]
async fn ping_reports_the_version() {
    let server = demo_server();

    let body: serde_json::Value = server.get(routes::PING).await.json();
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}
