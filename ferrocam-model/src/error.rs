use std::fmt::{self, Display};

use crate::ident::Ident;

/// Errors produced by model validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// `currentImageFormat` names no entry of `imageFormats`.
    UnknownActiveFormat { camera: Ident, format: Ident },
    /// Two entries of `imageFormats` share an id.
    DuplicateFormat { camera: Ident, format: Ident },
    /// The cached description disagrees with the active format.
    StaleDescription { camera: Ident },
    /// A quality range violates `min <= default <= max` or step reachability.
    InvalidQualityRange { format: Ident, reason: &'static str },
    /// A requested quality is not a whole number that fits a `u32`.
    UnrepresentableQuality { value: String },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownActiveFormat { camera, format } => write!(
                f,
                "camera {camera}: active format {format} is not a supported format"
            ),
            ModelError::DuplicateFormat { camera, format } => write!(
                f,
                "camera {camera}: format id {format} is listed more than once"
            ),
            ModelError::StaleDescription { camera } => write!(
                f,
                "camera {camera}: format description does not match the active format"
            ),
            ModelError::InvalidQualityRange { format, reason } => {
                write!(f, "format {format}: invalid quality range ({reason})")
            }
            ModelError::UnrepresentableQuality { value } => {
                write!(f, "quality {value} is not a whole number in u32 range")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
