use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the review pipeline.
///
/// `ImageNotFound`, `ImageLoad` and `Inference` are per-photo conditions:
/// the review loop absorbs them as skips. `ModelLoad` and `Page` mean no
/// later iteration can succeed, so they abort the whole run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No visible photo found after {attempts} attempts")]
    ImageNotFound { attempts: u32 },

    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Page driver error: {0}")]
    Page(String),

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the review loop may absorb this error as a skipped photo.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ImageNotFound { .. } | Error::ImageLoad(_) | Error::Inference(_)
        )
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageLoad(err.to_string())
    }
}

impl From<ort::Error> for Error {
    fn from(err: ort::Error) -> Self {
        Error::Inference(err.to_string())
    }
}
