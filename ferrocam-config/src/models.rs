use std::{
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
};

use ferrocam_core::{
    CameraError, PreviewLocator, QualityPolicy, RegistryOptions,
};
use ferrocam_model::Camera;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub preview: PreviewConfig,
    pub registry: RegistryConfig,
    pub cameras: Vec<Camera>,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn registry_options(&self) -> Result<RegistryOptions, CameraError> {
        Ok(RegistryOptions {
            locator: PreviewLocator::new(self.preview.url_template.clone())?,
            quality_policy: self.registry.quality_policy,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub url_template: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub quality_policy: QualityPolicy,
}

/// Where the camera list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSource {
    /// `[[cameras]]` tables of this config file.
    Inline(PathBuf),
    /// A JSON device list file.
    File(PathBuf),
    /// Nothing configured; the built-in demo fleet.
    Demo,
}

#[derive(Debug, Clone)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub camera_source: CameraSource,
}
