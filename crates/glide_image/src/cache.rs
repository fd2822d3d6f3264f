//! In-memory cache tier
//!
//! [`MemoryCache`] wraps any loader with an LRU of decoded bitmaps. Hits
//! complete immediately and are flagged `from_memory_cache`, which the
//! carousel uses to skip its fade-in. Misses are forwarded to the inner
//! loader and the result is cached when it arrives, even if the request was
//! cancelled in the meantime.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::bitmap::Bitmap;
use crate::fetch::{ImageLoader, LoadRequest};

/// Default number of bitmaps kept in memory
pub const DEFAULT_CAPACITY: usize = 32;

type SharedEntries = Arc<Mutex<LruCache<String, Arc<Bitmap>>>>;

/// LRU memory tier in front of another loader
#[derive(Debug)]
pub struct MemoryCache<L> {
    inner: L,
    entries: SharedEntries,
}

impl<L: ImageLoader> MemoryCache<L> {
    pub fn new(inner: L) -> Self {
        Self::with_capacity(inner, NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn with_capacity(inner: L, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<String, Arc<Bitmap>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cached bitmaps
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Whether a source with this cache key is resident
    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains(key)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: ImageLoader> ImageLoader for MemoryCache<L> {
    fn load(&mut self, request: LoadRequest) {
        let key = request.source.cache_key();

        let hit = self.entries().get(&key).cloned();
        if let Some(bitmap) = hit {
            tracing::trace!(index = request.index, "memory cache hit");
            request.completer.complete(Ok(bitmap), true);
            return;
        }

        let entries = Arc::clone(&self.entries);
        let LoadRequest {
            index,
            source,
            completer,
        } = request;
        let completer = completer.on_success(move |bitmap| {
            entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .put(key, Arc::clone(bitmap));
        });

        self.inner.load(LoadRequest {
            index,
            source,
            completer,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodingLoader;
    use crate::fetch::{completion_channel, CancelToken, Completer, LoadTicket};
    use crate::source::ImageSource;
    use slotmap::SlotMap;

    const RED_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_second_load_is_served_from_memory() {
        let mut tickets: SlotMap<LoadTicket, ()> = SlotMap::with_key();
        let (tx, rx) = completion_channel();
        let mut cache = MemoryCache::new(DecodingLoader::new());
        let source = ImageSource::resolve(RED_PIXEL, false).unwrap();

        for _ in 0..2 {
            cache.load(LoadRequest {
                index: 0,
                source: source.clone(),
                completer: Completer::new(tickets.insert(()), CancelToken::new(), tx.clone()),
            });
        }

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert!(!first.from_memory_cache);
        assert!(second.from_memory_cache);
        assert!(cache.contains(&source.cache_key()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut tickets: SlotMap<LoadTicket, ()> = SlotMap::with_key();
        let (tx, rx) = completion_channel();
        let mut cache = MemoryCache::new(DecodingLoader::new());

        cache.load(LoadRequest {
            index: 0,
            source: ImageSource::resolve("missing/file.png", false).unwrap(),
            completer: Completer::new(tickets.insert(()), CancelToken::new(), tx),
        });

        assert!(rx.try_recv().unwrap().result.is_err());
        assert!(cache.is_empty());
    }
}
