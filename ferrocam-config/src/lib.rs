//! Shared configuration library for Ferrocam.
//!
//! Values are resolved per key from the environment, then the TOML config
//! file, then built-in defaults. The camera device list comes from inline
//! `[[cameras]]` tables, a JSON device list file, or the demo fleet.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    CameraSource, Config, ConfigMetadata, CorsConfig, PreviewConfig,
    RegistryConfig, ServerConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
