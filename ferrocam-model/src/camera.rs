use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::ModelError, ident::Ident};

static RESOLUTION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,5})\s*[xX×]\s*(\d{1,5})").expect("resolution pattern")
});

/// Output size of a capture mode, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extract the last `<W>x<H>` token from a human-readable label such as
    /// `"RGB 5-6-5 640x480"`.
    pub fn parse_from_label(label: &str) -> Option<Self> {
        let caps = RESOLUTION_TOKEN.captures_iter(label).last()?;
        let width = caps.get(1)?.as_str().parse().ok()?;
        let height = caps.get(2)?.as_str().parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

/// Legal bounds for the encoding quality of one image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityRange {
    pub min: u32,
    pub max: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub step: Option<u32>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub default: Option<u32>,
}

impl QualityRange {
    pub const fn new(min: u32, max: u32, step: u32, default: u32) -> Self {
        Self {
            min,
            max,
            step: Some(step),
            default: Some(default),
        }
    }

    fn reachable(&self, value: u32) -> bool {
        match self.step {
            Some(step) if step > 0 => (value - self.min) % step == 0,
            _ => true,
        }
    }

    /// `true` when `value` lies in `[min, max]` and is a whole number of
    /// steps above `min`.
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max && self.reachable(value)
    }

    /// Nearest legal value to `value`.
    pub fn clamp(&self, value: u32) -> u32 {
        let bounded = value.clamp(self.min, self.max);
        let Some(step) = self.step.filter(|s| *s > 0) else {
            return bounded;
        };
        let offset = bounded - self.min;
        let below = self.min + (offset / step) * step;
        let above = below + step;
        if above <= self.max && above - bounded < bounded - below {
            above
        } else {
            below
        }
    }

    pub fn validate(&self, format: &Ident) -> Result<(), ModelError> {
        let invalid = |reason| ModelError::InvalidQualityRange {
            format: format.clone(),
            reason,
        };
        if self.min > self.max {
            return Err(invalid("min is greater than max"));
        }
        if self.step == Some(0) {
            return Err(invalid("step must be positive"));
        }
        if let Some(default) = self.default {
            if default < self.min || default > self.max {
                return Err(invalid("default is outside [min, max]"));
            }
            if !self.reachable(default) {
                return Err(invalid("default is not reachable from min by step"));
            }
        }
        Ok(())
    }
}

/// A supported capture mode of a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageFormat {
    pub id: Ident,
    pub description: String,
    /// Absent for lossless/raw formats with no adjustable quality.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub quality: Option<QualityRange>,
    /// Explicit output size; when absent it is read from the description.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub resolution: Option<Resolution>,
}

impl ImageFormat {
    pub fn new(id: impl Into<Ident>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            quality: None,
            resolution: None,
        }
    }

    pub fn with_quality(mut self, quality: QualityRange) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn implied_resolution(&self) -> Option<Resolution> {
        self.resolution
            .or_else(|| Resolution::parse_from_label(&self.description))
    }
}

/// A logical capture device exposed by the host.
///
/// Field names follow the JSON contract (`currentImageFormat`, ...). The
/// description, resolution and `src` fields are derived views owned by the
/// registry; they are recomputed on every write rather than set directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Camera {
    pub index: Ident,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub src: String,
    pub current_frame_rate: f64,
    pub current_image_format: Ident,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub current_image_format_description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub current_quality: Option<u32>,
    pub current_resolution: Resolution,
    pub image_formats: Vec<ImageFormat>,
}

impl Camera {
    pub fn format(&self, id: &Ident) -> Option<&ImageFormat> {
        self.image_formats.iter().find(|format| &format.id == id)
    }

    pub fn active_format(&self) -> Option<&ImageFormat> {
        self.format(&self.current_image_format)
    }

    /// Whether `currentQuality` is legal for the active format.
    ///
    /// `None` when there is nothing to judge: no stored quality, or an active
    /// format without a quality range.
    pub fn quality_in_range(&self) -> Option<bool> {
        let quality = self.current_quality?;
        let range = self.active_format()?.quality?;
        Some(range.contains(quality))
    }

    /// Structural invariants: unique format ids, a known active format, a
    /// matching cached description and well-formed quality ranges.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.image_formats.len());
        for format in &self.image_formats {
            if !seen.insert(&format.id) {
                return Err(ModelError::DuplicateFormat {
                    camera: self.index.clone(),
                    format: format.id.clone(),
                });
            }
            if let Some(range) = &format.quality {
                range.validate(&format.id)?;
            }
        }

        let active = self.active_format().ok_or_else(|| {
            ModelError::UnknownActiveFormat {
                camera: self.index.clone(),
                format: self.current_image_format.clone(),
            }
        })?;

        if let Some(description) = &self.current_image_format_description
            && description != &active.description
        {
            return Err(ModelError::StaleDescription {
                camera: self.index.clone(),
            });
        }

        Ok(())
    }
}
