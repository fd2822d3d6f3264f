//! Network loader (requires the `network` feature)

use std::sync::Arc;

use tokio::runtime::Handle;
use url::Url;

use crate::bitmap::Bitmap;
use crate::decode::DecodingLoader;
use crate::error::{ImageError, Result};
use crate::fetch::{ImageLoader, LoadRequest};
use crate::source::ImageSource;

/// Fetches remote URLs on a tokio runtime; local sources are decoded inline
#[derive(Debug, Clone)]
pub struct NetworkLoader {
    runtime: Handle,
    client: reqwest::Client,
    local: DecodingLoader,
}

impl NetworkLoader {
    /// Spawn fetches onto the given runtime
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            client: reqwest::Client::new(),
            local: DecodingLoader::new(),
        }
    }

    /// Use the runtime of the calling context
    ///
    /// Returns `None` outside of a tokio runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

async fn fetch(client: reqwest::Client, url: Url) -> Result<Bitmap> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ImageError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ImageError::Network(format!(
            "HTTP error: {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImageError::Network(e.to_string()))?;

    Bitmap::from_bytes(&bytes)
}

impl ImageLoader for NetworkLoader {
    fn load(&mut self, request: LoadRequest) {
        let LoadRequest {
            index,
            source,
            completer,
        } = request;

        let url = match source {
            ImageSource::Url(url) => url,
            local => {
                self.local.load(LoadRequest {
                    index,
                    source: local,
                    completer,
                });
                return;
            }
        };

        let client = self.client.clone();

        self.runtime.spawn(async move {
            if completer.is_cancelled() {
                completer.complete(Err(ImageError::Cancelled), false);
                return;
            }

            let result = fetch(client, url).await.map(Arc::new);
            if let Err(e) = &result {
                tracing::warn!(index, "image fetch failed: {}", e);
            }
            completer.complete(result, false);
        });
    }
}
