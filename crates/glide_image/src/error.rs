//! Image error types

use thiserror::Error;

/// Errors produced while resolving, fetching or decoding an image
///
/// None of these are fatal to the carousel: a failed cell shows its
/// placeholder and may be retried once it is evicted and becomes visible
/// again.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// The source string could not be turned into a URI
    #[error("malformed image URI {source_str:?}: {reason}")]
    MalformedUri { source_str: String, reason: String },

    /// Reading a file or platform asset failed
    #[error("failed to load image file: {0}")]
    FileLoad(String),

    /// Network fetch failed (or networking is not compiled in)
    #[error("network error: {0}")]
    Network(String),

    /// Bytes were fetched but could not be decoded
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Invalid base64 payload or data URI
    #[error("invalid base64 image data: {0}")]
    Base64(String),

    /// The request was cancelled before it produced a bitmap
    #[error("image load cancelled")]
    Cancelled,
}

impl ImageError {
    pub(crate) fn malformed(source: &str, reason: impl Into<String>) -> Self {
        ImageError::MalformedUri {
            source_str: source.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the source string itself rather than the fetch
    pub fn is_malformed(&self) -> bool {
        matches!(self, ImageError::MalformedUri { .. })
    }
}

impl From<image::ImageError> for ImageError {
    fn from(e: image::ImageError) -> Self {
        ImageError::Decode(e.to_string())
    }
}

impl From<base64::DecodeError> for ImageError {
    fn from(e: base64::DecodeError) -> Self {
        ImageError::Base64(e.to_string())
    }
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
