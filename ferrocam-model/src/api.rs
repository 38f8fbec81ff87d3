//! Wire types and route constants for the camera HTTP API.

use crate::{
    camera::Camera, error::ModelError, ident::Ident, patch::ConfigPatch,
};

macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Route definitions shared by the server router and the HTTP client.
pub mod routes {
    pub const PING: &str = "/ping";

    pub const CAMERA_INFO: &str = api_path!("/get_camera_info");
    pub const CAPTURE_IMAGE: &str = api_path!("/capture_image");
    pub const CAPTURE_BINARY: &str = api_path!("/capture_binary");
    pub const SET_CAMERA_CONFIG: &str = api_path!("/set_camera_config");

    /// Query parameter naming the camera for capture routes.
    pub const SOURCE_PARAM: &str = "source";
}

/// `GET /api/get_camera_info` response body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraInfoResponse {
    pub cameras: Vec<Camera>,
}

/// `jpeg_quality` as it arrived on the wire.
///
/// Only whole numbers that fit a `u32` can be stored. Any other JSON number
/// is kept so the request fails as an invalid quality instead of as
/// malformed JSON.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum WireQuality {
    Whole(u32),
    Other(f64),
}

/// `POST /api/set_camera_config` request body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetCameraConfigRequest {
    pub index: Ident,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub image_format: Option<Ident>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub jpeg_quality: Option<WireQuality>,
}

impl SetCameraConfigRequest {
    pub fn new(index: impl Into<Ident>, patch: ConfigPatch) -> Self {
        Self {
            index: index.into(),
            image_format: patch.image_format,
            jpeg_quality: patch.quality.map(WireQuality::Whole),
        }
    }

    /// The registry patch this request asks for. Fails when `jpeg_quality`
    /// is fractional, negative or too large to store.
    pub fn patch(&self) -> Result<ConfigPatch, ModelError> {
        let quality = match self.jpeg_quality {
            None => None,
            Some(WireQuality::Whole(value)) => Some(value),
            Some(WireQuality::Other(value)) => {
                return Err(ModelError::UnrepresentableQuality {
                    value: value.to_string(),
                });
            }
        };
        Ok(ConfigPatch {
            image_format: self.image_format.clone(),
            quality,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetCameraConfigResponse {
    pub success: bool,
    pub message: String,
}

/// JSON error body used by configuration-mutating routes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn set_config_request_accepts_partial_bodies() {
        let req: SetCameraConfigRequest =
            serde_json::from_str(r#"{"index": 1, "jpeg_quality": 70}"#)
                .unwrap();
        assert_eq!(req.index, Ident::Number(1));
        assert_eq!(req.patch().unwrap(), ConfigPatch::quality(70));

        let req: SetCameraConfigRequest =
            serde_json::from_str(r#"{"index": "0", "image_format": 2}"#)
                .unwrap();
        assert_eq!(req.index, Ident::Number(0));
        assert_eq!(req.patch().unwrap(), ConfigPatch::format(2u64));
    }

    #[test]
    fn set_config_request_requires_index() {
        let parsed = serde_json::from_str::<SetCameraConfigRequest>(
            r#"{"image_format": 2}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn non_integer_quality_parses_but_yields_no_patch() {
        for body in [
            r#"{"index": 0, "jpeg_quality": 85.5}"#,
            r#"{"index": 0, "jpeg_quality": -5}"#,
            r#"{"index": 0, "jpeg_quality": 5000000000}"#,
        ] {
            let req: SetCameraConfigRequest =
                serde_json::from_str(body).unwrap();
            assert!(matches!(
                req.patch(),
                Err(ModelError::UnrepresentableQuality { .. })
            ));
        }

        let req = SetCameraConfigRequest::new(1u64, ConfigPatch::quality(70));
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"index":1,"jpeg_quality":70}"#
        );
    }
}
