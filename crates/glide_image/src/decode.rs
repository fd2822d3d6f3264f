//! Synchronous decoding loader for local sources

use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::error::ImageError;
use crate::fetch::{ImageLoader, LoadRequest};

/// Decodes files and data URIs on the calling thread
///
/// The completion is posted before `load` returns, but it is still only
/// observed when the owner drains its completion channel. Remote URLs fail
/// with [`ImageError::Network`]; wrap a network-capable loader for those.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodingLoader;

impl DecodingLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageLoader for DecodingLoader {
    fn load(&mut self, request: LoadRequest) {
        if request.is_cancelled() {
            request.completer.complete(Err(ImageError::Cancelled), false);
            return;
        }

        let result = Bitmap::decode(&request.source).map(Arc::new);
        if let Err(e) = &result {
            tracing::debug!(index = request.index, source = %request.source, "decode failed: {}", e);
        }
        request.completer.complete(result, false);
    }
}
