use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use ferrocam_model::{Camera, ConfigPatch, Ident};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{CameraError, Result},
    fleet::demo_fleet,
    preview::PreviewLocator,
};

/// How the registry treats a quality outside the active format's range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPolicy {
    /// Store the value as given and log a warning.
    #[default]
    Permissive,
    /// Reject the patch with [`CameraError::InvalidQuality`].
    Strict,
    /// Snap to the nearest legal value.
    Clamp,
}

impl FromStr for QualityPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!(
                "unknown quality policy '{other}' (expected permissive, strict or clamp)"
            )),
        }
    }
}

impl fmt::Display for QualityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
            Self::Clamp => "clamp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    pub locator: PreviewLocator,
    pub quality_policy: QualityPolicy,
}

#[derive(Debug)]
struct CameraSlot {
    state: RwLock<Camera>,
}

/// Authoritative store of camera state.
///
/// The set of cameras is fixed at construction; only their configuration
/// changes afterwards. Each camera sits behind its own lock, so writes to one
/// index never wait on another and a reader always sees a whole camera.
#[derive(Debug)]
pub struct DeviceRegistry {
    slots: BTreeMap<Ident, Arc<CameraSlot>>,
    locator: PreviewLocator,
    quality_policy: QualityPolicy,
}

impl DeviceRegistry {
    pub fn new(cameras: Vec<Camera>, options: RegistryOptions) -> Result<Self> {
        let RegistryOptions {
            locator,
            quality_policy,
        } = options;

        let mut slots = BTreeMap::new();
        for mut camera in cameras {
            refresh_derived(&mut camera, &locator);
            camera.validate()?;

            let index = camera.index.clone();
            if slots.contains_key(&index) {
                return Err(CameraError::DuplicateIndex(index));
            }
            slots.insert(
                index,
                Arc::new(CameraSlot {
                    state: RwLock::new(camera),
                }),
            );
        }

        info!(
            cameras = slots.len(),
            quality_policy = %quality_policy,
            preview_template = locator.template(),
            "device registry initialized"
        );

        Ok(Self {
            slots,
            locator,
            quality_policy,
        })
    }

    /// Registry seeded with [`demo_fleet`].
    pub fn demo(options: RegistryOptions) -> Result<Self> {
        Self::new(demo_fleet(), options)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, index: &Ident) -> bool {
        self.slots.contains_key(index)
    }

    pub fn locator(&self) -> &PreviewLocator {
        &self.locator
    }

    /// Snapshot of every camera, ascending by index.
    pub fn list(&self) -> Vec<Camera> {
        self.slots
            .values()
            .map(|slot| slot.state.read().clone())
            .collect()
    }

    pub fn get(&self, index: &Ident) -> Option<Camera> {
        self.slots.get(index).map(|slot| slot.state.read().clone())
    }

    /// Apply a partial configuration change to one camera.
    ///
    /// The new state is computed on a copy and published only once every
    /// check has passed, so a rejected patch leaves the camera untouched.
    /// Returns the camera as stored after the update.
    pub fn apply_config(
        &self,
        index: &Ident,
        patch: &ConfigPatch,
    ) -> Result<Camera> {
        let slot = self
            .slots
            .get(index)
            .ok_or_else(|| CameraError::NotFound(index.clone()))?;

        let updated = {
            let mut current = slot.state.write();
            let mut next = current.clone();

            if let Some(format_id) = &patch.image_format {
                let format = next.format(format_id).cloned().ok_or_else(|| {
                    CameraError::InvalidFormat {
                        index: index.clone(),
                        format: format_id.clone(),
                    }
                })?;
                next.current_image_format = format.id;
            }

            if let Some(quality) = patch.quality {
                next.current_quality = Some(self.resolve_quality(&next, quality)?);
            }

            refresh_derived(&mut next, &self.locator);
            *current = next;
            current.clone()
        };

        info!(
            index = %index,
            format = %updated.current_image_format,
            quality = ?updated.current_quality,
            width = updated.current_resolution.width,
            height = updated.current_resolution.height,
            "camera configuration updated"
        );

        Ok(updated)
    }

    fn resolve_quality(&self, camera: &Camera, quality: u32) -> Result<u32> {
        let Some(range) = camera.active_format().and_then(|f| f.quality) else {
            debug!(
                index = %camera.index,
                quality,
                "active format has no quality range; storing value as given"
            );
            return Ok(quality);
        };

        if range.contains(quality) {
            return Ok(quality);
        }

        match self.quality_policy {
            QualityPolicy::Permissive => {
                warn!(
                    index = %camera.index,
                    quality,
                    min = range.min,
                    max = range.max,
                    step = ?range.step,
                    "accepting quality outside the active format's range"
                );
                Ok(quality)
            }
            QualityPolicy::Strict => Err(CameraError::InvalidQuality {
                index: camera.index.clone(),
                quality,
                min: range.min,
                max: range.max,
            }),
            QualityPolicy::Clamp => {
                let clamped = range.clamp(quality);
                debug!(
                    index = %camera.index,
                    requested = quality,
                    clamped,
                    "clamped quality into the active format's range"
                );
                Ok(clamped)
            }
        }
    }
}

/// Recompute the fields that are cached views of the active format.
fn refresh_derived(camera: &mut Camera, locator: &PreviewLocator) {
    if let Some(format) = camera.active_format() {
        let description = format.description.clone();
        let resolution = format.implied_resolution();
        camera.current_image_format_description = Some(description);
        if let Some(resolution) = resolution {
            camera.current_resolution = resolution;
        }
    }
    camera.src = locator.render(camera);
}
