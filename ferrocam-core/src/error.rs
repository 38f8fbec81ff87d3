use ferrocam_model::{Ident, ModelError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("camera {0} not found")]
    NotFound(Ident),

    #[error("camera {index}: image format {format} is not supported")]
    InvalidFormat { index: Ident, format: Ident },

    #[error(
        "camera {index}: quality {quality} is not a legal value in {min}..={max}"
    )]
    InvalidQuality {
        index: Ident,
        quality: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid camera definition: {0}")]
    InvalidSeed(#[from] ModelError),

    #[error("camera index {0} is defined more than once")]
    DuplicateIndex(Ident),

    #[error(
        "invalid preview template `{0}`: it must contain {{width}} and {{height}}"
    )]
    InvalidTemplate(String),

    #[error("capture failed: {0}")]
    Capture(String),
}

pub type Result<T> = std::result::Result<T, CameraError>;
