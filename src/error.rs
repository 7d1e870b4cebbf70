use thiserror::Error;

/// The main error type for the ditherlab crate
#[derive(Debug, Error)]
pub enum DitherError {
    /// A required attribute is missing from the parameter map, has the wrong
    /// kind, or lies outside its declared domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Buffer dimensions are zero (possibly after scaling) or don't match
    /// the pixel data.
    #[error("dimension mismatch ({width}x{height}): {reason}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    /// Registry lookup by name failed.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    /// Error occurred while decoding or encoding an image
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error occurred during I/O operations (file read/write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a process config
    #[error("json error: {0}")]
    Json(#[from] json::Error),

    /// Process config is well-formed JSON but semantically wrong
    #[error("config error: {0}")]
    Config(String),
}

impl DitherError {
    pub(crate) fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DitherError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

// Convenience type alias for Results using DitherError
pub type Result<T = ()> = std::result::Result<T, DitherError>;
