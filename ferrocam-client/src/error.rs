use thiserror::Error;

/// Failures talking to the camera API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or protocol failure below HTTP semantics.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered but the body did not decode.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The base URL given to the client is not a valid absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("camera not found: {0}")]
    NotFound(String),

    #[error("request rejected: {0}")]
    BadRequest(String),

    /// Any other unexpected status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response is missing the {0} header")]
    MissingHeader(&'static str),
}

pub type Result<T> = std::result::Result<T, ClientError>;
