//! Carousel error types
//!
//! Runtime conditions (bad URIs, failed fetches, out-of-range pages, empty
//! lists) never surface as errors; they degrade to placeholders, clamps and
//! no-ops. Only loading a configuration can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or validating a [`CarouselConfig`](crate::CarouselConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse carousel config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid carousel config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
