use std::{fmt, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use ferrocam_model::{Camera, Ident};
use tracing::debug;

use crate::{
    error::{CameraError, Result},
    registry::DeviceRegistry,
};

/// Supplies the opaque raw output of a camera.
#[async_trait]
pub trait RawCaptureSource: Send + Sync {
    async fn capture(&self, camera: &Camera) -> Result<Bytes>;
}

/// Raw source that returns a short text payload naming the camera.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticRawSource;

#[async_trait]
impl RawCaptureSource for SyntheticRawSource {
    async fn capture(&self, camera: &Camera) -> Result<Bytes> {
        Ok(Bytes::from(format!(
            "Mock binary data for camera {}",
            camera.index
        )))
    }
}

/// Where a still image of a camera can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    pub index: Ident,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct RawCapture {
    pub index: Ident,
    pub bytes: Bytes,
    pub filename: String,
    pub frame_rate: f64,
}

impl RawCapture {
    pub fn filename_for(index: &Ident) -> String {
        format!("camera_{index}_raw.bin")
    }
}

/// Resolves capture requests against the registry's current state.
#[derive(Clone)]
pub struct CaptureGateway {
    registry: Arc<DeviceRegistry>,
    raw_source: Arc<dyn RawCaptureSource>,
}

impl fmt::Debug for CaptureGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGateway")
            .field("cameras", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl CaptureGateway {
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self::with_raw_source(registry, Arc::new(SyntheticRawSource))
    }

    pub fn with_raw_source(
        registry: Arc<DeviceRegistry>,
        raw_source: Arc<dyn RawCaptureSource>,
    ) -> Self {
        Self {
            registry,
            raw_source,
        }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Parse the `source` query value; absent or blank is a missing parameter.
    pub fn parse_source(source: Option<&str>) -> Result<Ident> {
        match source.map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(Ident::from(raw)),
            _ => Err(CameraError::MissingParameter("source")),
        }
    }

    fn snapshot(&self, index: &Ident) -> Result<Camera> {
        self.registry
            .get(index)
            .ok_or_else(|| CameraError::NotFound(index.clone()))
    }

    pub fn resolve_still_image(&self, source: Option<&str>) -> Result<StillImage> {
        let index = Self::parse_source(source)?;
        let camera = self.snapshot(&index)?;
        let location = self.registry.locator().render(&camera);
        debug!(index = %index, location = %location, "resolved still image");
        Ok(StillImage { index, location })
    }

    pub async fn resolve_raw_capture(
        &self,
        source: Option<&str>,
    ) -> Result<RawCapture> {
        let index = Self::parse_source(source)?;
        let camera = self.snapshot(&index)?;
        let bytes = self.raw_source.capture(&camera).await?;
        debug!(index = %index, bytes = bytes.len(), "captured raw payload");
        Ok(RawCapture {
            filename: RawCapture::filename_for(&index),
            index,
            bytes,
            frame_rate: camera.current_frame_rate,
        })
    }
}
