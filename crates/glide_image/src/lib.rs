//! Glide Image
//!
//! Everything the carousel needs from the image subsystem, expressed as a
//! contract plus a few reference implementations:
//!
//! - [`ImageSource`]: resolves raw strings (URLs, paths, data URIs), with
//!   optional percent-encoding
//! - [`Bitmap`]: decoded RGBA pixels
//! - [`ImageLoader`]: fire-and-forget loading with [`LoadTicket`]s,
//!   [`CancelToken`]s and channel-delivered [`LoadCompletion`]s
//! - [`DecodingLoader`]: decodes local files and data URIs
//! - [`MemoryCache`]: LRU memory tier that reports cache hits
//! - `NetworkLoader`: reqwest + tokio fetcher (`network` feature)

pub mod bitmap;
pub mod cache;
pub mod decode;
pub mod error;
pub mod fetch;
#[cfg(feature = "network")]
pub mod network;
pub mod source;

pub use bitmap::Bitmap;
pub use cache::MemoryCache;
pub use decode::DecodingLoader;
pub use error::{ImageError, Result};
pub use fetch::{
    completion_channel, CancelToken, Completer, ImageLoader, LoadCompletion, LoadRequest,
    LoadTicket,
};
#[cfg(feature = "network")]
pub use network::NetworkLoader;
pub use source::ImageSource;
