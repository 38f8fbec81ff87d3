//! Core data model definitions shared across Ferrocam crates.
//!
//! Everything here is plain data plus the pure invariant checks that go with
//! it. The registry in `ferrocam-core` decides when those checks run; the
//! server and client only move these types across the wire.

pub mod api;
pub mod camera;
pub mod error;
pub mod ident;
pub mod patch;

pub use api::{
    CameraInfoResponse, ErrorResponse, SetCameraConfigRequest,
    SetCameraConfigResponse, WireQuality, routes,
};
pub use camera::{Camera, ImageFormat, QualityRange, Resolution};
pub use error::{ModelError, Result as ModelResult};
pub use ident::Ident;
pub use patch::ConfigPatch;
