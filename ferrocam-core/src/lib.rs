//! # Ferrocam Core
//!
//! Server-side rules of the camera configuration protocol.
//!
//! - [`DeviceRegistry`]: the authoritative camera store. Applies partial
//!   configuration patches with per-camera serialization and keeps the
//!   derived fields (`currentImageFormatDescription`, `currentResolution`,
//!   `src`) in step with the active format.
//! - [`CaptureGateway`]: maps a capture request to a redirect target or a raw
//!   payload from a pluggable [`RawCaptureSource`].
//! - [`PreviewLocator`]: renders the preview resource locator from a
//!   camera's resolution.

pub mod capture;
pub mod error;
pub mod fleet;
pub mod preview;
pub mod registry;

pub use capture::{
    CaptureGateway, RawCapture, RawCaptureSource, StillImage,
    SyntheticRawSource,
};
pub use error::{CameraError, Result};
pub use fleet::demo_fleet;
pub use preview::{DEFAULT_PREVIEW_TEMPLATE, PreviewLocator};
pub use registry::{DeviceRegistry, QualityPolicy, RegistryOptions};
