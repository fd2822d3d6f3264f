//! Decoded bitmaps

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;

use crate::error::{ImageError, Result};
use crate::source::ImageSource;

/// Decoded RGBA image ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Raw RGBA pixel data
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Bitmap {
    /// Wrap `width * height` RGBA pixels, four bytes each
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let wanted = rgba_len(width, height);
        if wanted != Some(pixels.len()) {
            return Err(ImageError::Decode(format!(
                "{width}x{height} bitmap needs {} RGBA bytes, buffer has {}",
                wanted.map_or_else(|| "too many".to_string(), |n| n.to_string()),
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Load a local source synchronously
    ///
    /// Remote URLs are not handled here; they need an async loader (see the
    /// `network` feature).
    pub fn decode(source: &ImageSource) -> Result<Self> {
        match source {
            ImageSource::File(path) => {
                let data = std::fs::read(path)
                    .map_err(|e| ImageError::FileLoad(format!("{}: {}", path.display(), e)))?;
                Self::from_bytes(&data)
            }
            ImageSource::Data(data) => Self::from_base64(data),
            ImageSource::Url(url) => Err(ImageError::Network(format!(
                "{url}: URL loading requires the 'network' feature"
            ))),
        }
    }

    /// Decode an encoded file body; the format is sniffed from its header
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        image::load_from_memory(data)
            .map(Self::from_dynamic_image)
            .map_err(ImageError::from)
    }

    /// Decode a base64 payload, bare or wrapped in a `data:` URI
    pub fn from_base64(data: &str) -> Result<Self> {
        let payload = match data.strip_prefix("data:") {
            Some(uri) => uri
                .split_once(";base64,")
                .map(|(_media_type, payload)| payload)
                .ok_or_else(|| {
                    ImageError::Base64("data URI carries no ;base64, payload".to_string())
                })?,
            None => data,
        };

        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_bytes(&bytes)
    }

    fn from_dynamic_image(img: DynamicImage) -> Self {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            pixels: rgba.into_raw(),
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width / height; 0 for an empty bitmap
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}
