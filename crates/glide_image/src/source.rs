//! Image source resolution
//!
//! Carousel entries are plain strings. Before a fetch is issued the string is
//! resolved into an [`ImageSource`]:
//!
//! - `data:image/png;base64,...` → [`ImageSource::Data`]
//! - absolute URLs (`https://...`) → [`ImageSource::Url`]
//! - `file://` URLs and relative paths → [`ImageSource::File`]
//!
//! With encoding disabled, a string containing characters that are not valid
//! in a URL (spaces, non-ASCII, `<`, `|`, bad `%` escapes, ...) is rejected as
//! malformed. With encoding enabled those characters are percent-encoded by
//! the URL parser instead.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::{ImageError, Result};

/// A resolved image location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Remote resource
    Url(Url),
    /// Local file (absolute or relative to the working directory)
    File(PathBuf),
    /// Inline base64 payload or `data:` URI
    Data(String),
}

impl ImageSource {
    /// Resolve a raw carousel entry
    ///
    /// `encode` mirrors the carousel's `enable_encode_url` switch.
    pub fn resolve(raw: &str, encode: bool) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ImageError::malformed(raw, "empty source"));
        }

        if trimmed.starts_with("data:") {
            if !trimmed.contains(";base64,") {
                return Err(ImageError::malformed(raw, "data URI without base64 payload"));
            }
            return Ok(ImageSource::Data(trimmed.to_string()));
        }

        if !encode {
            check_encoded(raw)?;
        }

        match Url::parse(trimmed) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(ImageSource::File)
                .map_err(|_| ImageError::malformed(raw, "file URL without a local path")),
            Ok(url) => Ok(ImageSource::Url(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(ImageSource::File(PathBuf::from(trimmed)))
            }
            Err(e) => Err(ImageError::malformed(raw, e.to_string())),
        }
    }

    /// Key used by cache tiers; identical for sources that resolve the same
    pub fn cache_key(&self) -> String {
        match self {
            ImageSource::Url(url) => url.as_str().to_string(),
            ImageSource::File(path) => format!("file:{}", path.display()),
            ImageSource::Data(data) => data.clone(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageSource::Url(_))
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Url(url) => write!(f, "{url}"),
            ImageSource::File(path) => write!(f, "{}", path.display()),
            // Payloads can be megabytes; only show the header
            ImageSource::Data(data) => {
                let header = data.split(',').next().unwrap_or("data:");
                write!(f, "{header},...")
            }
        }
    }
}

fn needs_encoding(c: char) -> bool {
    c.is_ascii_control()
        || c == ' '
        || !c.is_ascii()
        || matches!(c, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
}

/// Reject strings that would only be valid after percent-encoding
fn check_encoded(raw: &str) -> Result<()> {
    if let Some(c) = raw.trim().chars().find(|&c| needs_encoding(c)) {
        return Err(ImageError::malformed(
            raw,
            format!("unencoded character {c:?}"),
        ));
    }

    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(ImageError::malformed(raw, "invalid percent escape"));
            }
        }
    }
    Ok(())
}
