use std::{fmt, path::Path, time::Duration};

use bytes::Bytes;
use ferrocam_model::{
    Camera, CameraInfoResponse, ConfigPatch, ErrorResponse, Ident,
    SetCameraConfigRequest, SetCameraConfigResponse, routes,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, Result};

/// Transport settings for [`ApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Per-request timeout. `None` waits as long as the server takes.
    pub request_timeout: Option<Duration>,
}

/// A raw capture downloaded from `capture_binary`.
#[derive(Debug, Clone)]
pub struct RawDownload {
    /// Filename from `Content-Disposition`, when the server sent one.
    pub filename: Option<String>,
    /// Value of the `X-Framerate` header, when present and numeric.
    pub frame_rate: Option<f64>,
    pub bytes: Bytes,
}

/// HTTP client for the camera API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    // Separate client so capture_image can read the 302 instead of following it
    no_redirect: Client,
    base_url: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the server at `base_url` with default options.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    pub fn with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = Client::builder();
        let mut no_redirect_builder =
            Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
            no_redirect_builder = no_redirect_builder.timeout(timeout);
        }

        info!(base_url = %base_url, "creating camera API client");

        Ok(Self {
            client: builder.build()?,
            no_redirect: no_redirect_builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a route constant onto the base URL.
    pub fn build_url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    fn capture_request(
        &self,
        client: &Client,
        route: &str,
        index: &Ident,
    ) -> RequestBuilder {
        client
            .get(self.build_url(route))
            .query(&[(routes::SOURCE_PARAM, index.to_string())])
    }

    /// `GET /api/get_camera_info`.
    pub async fn fetch_cameras(&self) -> Result<Vec<Camera>> {
        let response = self
            .client
            .get(self.build_url(routes::CAMERA_INFO))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        let info: CameraInfoResponse = serde_json::from_slice(&body)?;
        debug!(count = info.cameras.len(), "fetched camera info");
        Ok(info.cameras)
    }

    /// `POST /api/set_camera_config`.
    pub async fn set_camera_config(
        &self,
        index: impl Into<Ident>,
        patch: ConfigPatch,
    ) -> Result<SetCameraConfigResponse> {
        let request = SetCameraConfigRequest::new(index, patch);
        let response = self
            .client
            .post(self.build_url(routes::SET_CAMERA_CONFIG))
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Resolve the still-image locator without following the redirect.
    pub async fn capture_image_location(
        &self,
        index: impl Into<Ident>,
    ) -> Result<String> {
        let index = index.into();
        let response = self
            .capture_request(&self.no_redirect, routes::CAPTURE_IMAGE, &index)
            .send()
            .await?;

        if !response.status().is_redirection() {
            return Err(error_from_response(response).await);
        }

        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or(ClientError::MissingHeader("Location"))
    }

    /// Download the raw capture of a camera.
    pub async fn capture_binary(
        &self,
        index: impl Into<Ident>,
    ) -> Result<RawDownload> {
        let index = index.into();
        let response = self
            .capture_request(&self.client, routes::CAPTURE_BINARY, &index)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let headers = response.headers();
        let filename = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition);
        let frame_rate = headers
            .get("x-framerate")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());

        Ok(RawDownload {
            filename,
            frame_rate,
            bytes: response.bytes().await?,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Map an error status to a typed error. Configuration routes answer with
/// `{"error": ...}`, capture routes with plain text.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|parsed| parsed.error)
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        other => ClientError::Status {
            status: other.as_u16(),
            body: message,
        },
    }
}

/// Bare file name from a `Content-Disposition` header. Directory parts are
/// dropped so the name can never point outside the caller's directory.
fn filename_from_disposition(value: &str) -> Option<String> {
    let raw = value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let raw = raw.trim_matches('"').replace('\\', "/");
    Path::new(&raw)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(
            normalize_base_url(" http://camera.local:8080/ ").unwrap(),
            "http://camera.local:8080"
        );
        assert_eq!(
            normalize_base_url("http://gateway/cams/").unwrap(),
            "http://gateway/cams"
        );
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn routes_join_onto_the_base() {
        let client = ApiClient::new("http://gateway/cams/").unwrap();
        assert_eq!(
            client.build_url(routes::CAMERA_INFO),
            "http://gateway/cams/api/get_camera_info"
        );
    }

    #[test]
    fn disposition_filename_is_unquoted() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"camera_1_raw.bin\""),
            Some("camera_1_raw.bin".to_string())
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }

    #[test]
    fn disposition_filename_drops_directories() {
        for (header, expected) in [
            ("attachment; filename=\"../../.bashrc\"", Some(".bashrc")),
            ("attachment; filename=\"/etc/passwd\"", Some("passwd")),
            ("attachment; filename=\"..\\..\\evil.bin\"", Some("evil.bin")),
            ("attachment; filename=\"..\"", None),
            ("attachment; filename=\"cams/..\"", None),
            ("attachment; filename=\"/\"", None),
        ] {
            assert_eq!(
                filename_from_disposition(header).as_deref(),
                expected,
                "{header}"
            );
        }
    }
}
