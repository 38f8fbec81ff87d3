use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use ferrocam_core::QualityPolicy;
use ferrocam_model::Camera;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub preview: FilePreviewConfig,
    #[serde(default)]
    pub registry: FileRegistryConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cameras_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cameras: Vec<Camera>,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_headers: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePreviewConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileRegistryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_policy: Option<QualityPolicy>,
}

/// Device list file: either a bare array of cameras or the
/// `get_camera_info` response shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum CameraListFile {
    Bare(Vec<Camera>),
    Wrapped { cameras: Vec<Camera> },
}

impl CameraListFile {
    pub(crate) fn into_cameras(self) -> Vec<Camera> {
        match self {
            Self::Bare(cameras) | Self::Wrapped { cameras } => cameras,
        }
    }
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allowed_methods: Option<Vec<String>>,
    pub cors_allowed_headers: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
    pub preview_url_template: Option<String>,
    /// Raw `QUALITY_POLICY` text; parsed during composition so a typo is
    /// reported instead of silently ignored.
    pub quality_policy: Option<String>,
    pub cameras_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();

        env_config.config_path =
            std::env::var("FERROCAM_CONFIG").ok().map(PathBuf::from);
        env_config.server_host = std::env::var("SERVER_HOST").ok();
        env_config.server_port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok());

        env_config.cors_allowed_origins = parse_csv_var("CORS_ALLOWED_ORIGINS");
        env_config.cors_allowed_methods = parse_csv_var("CORS_ALLOWED_METHODS");
        env_config.cors_allowed_headers = parse_csv_var("CORS_ALLOWED_HEADERS");

        env_config.dev_mode = parse_bool_var("DEV_MODE");
        env_config.preview_url_template = std::env::var("PREVIEW_URL_TEMPLATE")
            .ok()
            .filter(|value| !value.trim().is_empty());
        env_config.quality_policy = std::env::var("QUALITY_POLICY")
            .ok()
            .filter(|value| !value.trim().is_empty());
        env_config.cameras_path =
            std::env::var("CAMERAS_PATH").ok().map(PathBuf::from);

        env_config
    }
}

fn parse_csv_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| split_csv(&raw))
}

pub(crate) fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| parse_bool(&raw))
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_values_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_csv(" GET, POST ,,OPTIONS "),
            vec!["GET", "POST", "OPTIONS"]
        );
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
