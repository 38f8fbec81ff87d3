use std::{fmt, sync::Arc};

use ferrocam_config::Config;
use ferrocam_core::{CameraError, CaptureGateway, DeviceRegistry};

/// Shared handler state. Cloning is cheap; everything behind it is `Arc`ed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<DeviceRegistry>,
    pub gateway: CaptureGateway,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cameras", &self.registry.len())
            .field("dev_mode", &self.config.dev_mode)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Seed the registry from the configured camera list.
    pub fn from_config(config: Config) -> Result<Self, CameraError> {
        let options = config.registry_options()?;
        let registry =
            Arc::new(DeviceRegistry::new(config.cameras.clone(), options)?);
        Ok(Self::new(Arc::new(config), registry))
    }

    pub fn new(config: Arc<Config>, registry: Arc<DeviceRegistry>) -> Self {
        let gateway = CaptureGateway::new(Arc::clone(&registry));
        Self {
            config,
            registry,
            gateway,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
