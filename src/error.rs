// ============================================================================
// Error Types
// ============================================================================

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing CLI combination.
    #[error("usage: {0}")]
    Usage(String),

    /// Malformed resolution string, API body or image data.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("image {0} does not exist on picsum.photos")]
    NotFound(u32),

    /// Display resolution could not be queried.
    #[error("resolution query failed: {0}")]
    Query(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("theming failed: {0}")]
    Theme(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
