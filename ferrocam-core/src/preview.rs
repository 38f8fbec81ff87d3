use ferrocam_model::{Camera, Resolution};

use crate::error::{CameraError, Result};

/// Placeholder image service used when no preview template is configured.
pub const DEFAULT_PREVIEW_TEMPLATE: &str =
    "https://picsum.photos/{width}/{height}";

/// Renders the preview resource locator of a camera from its resolution.
///
/// Both `Camera::src` and the still-capture redirect target come from here,
/// so the next capture after a format switch reflects the new resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLocator {
    template: String,
}

impl Default for PreviewLocator {
    fn default() -> Self {
        Self {
            template: DEFAULT_PREVIEW_TEMPLATE.to_string(),
        }
    }
}

impl PreviewLocator {
    /// Supported placeholders: `{width}`, `{height}` and `{index}`.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("{width}") || !template.contains("{height}") {
            return Err(CameraError::InvalidTemplate(template));
        }
        Ok(Self { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn render(&self, camera: &Camera) -> String {
        self.render_parts(&camera.index.to_string(), camera.current_resolution)
    }

    fn render_parts(&self, index: &str, resolution: Resolution) -> String {
        self.template
            .replace("{width}", &resolution.width.to_string())
            .replace("{height}", &resolution.height.to_string())
            .replace("{index}", index)
    }
}
