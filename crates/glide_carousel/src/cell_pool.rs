//! Image cell pool
//!
//! One cell per list index. Cells have positional identity: index `i`
//! always maps to cell `i`, growing appends and shrinking truncates.
//!
//! Every issued load gets a [`LoadTicket`] from a slot map. Evicting a cell
//! removes its ticket, so a completion that arrives afterwards no longer
//! resolves and is dropped as stale.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use glide_image::{
    completion_channel, Bitmap, CancelToken, Completer, ImageError, ImageLoader, ImageSource,
    LoadCompletion, LoadRequest, LoadTicket,
};
use slotmap::SlotMap;

/// How a freshly loaded bitmap appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Shown immediately (served from the memory cache)
    None,
    FadeIn(Duration),
}

#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub bitmap: Arc<Bitmap>,
    pub transition: Transition,
}

/// Load state of one cell
#[derive(Debug, Clone, Default)]
pub enum CellState {
    #[default]
    Unloaded,
    Loading(LoadTicket),
    Loaded(LoadedImage),
    /// Shown as a placeholder; retried only after an eviction
    Failed(ImageError),
}

impl CellState {
    pub fn is_unloaded(&self) -> bool {
        matches!(self, CellState::Unloaded)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CellState::Loading(_))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CellState::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CellState::Failed(_))
    }

    pub fn bitmap(&self) -> Option<&Arc<Bitmap>> {
        match self {
            CellState::Loaded(loaded) => Some(&loaded.bitmap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageCell {
    source: String,
    caption: Option<String>,
    state: CellState,
}

impl ImageCell {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }
}

/// Cells created and removed by [`CellPool::reconcile`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub removed: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.removed == 0
    }
}

/// Result of [`CellPool::load_image_for_index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A request went out under this ticket
    Issued(LoadTicket),
    /// The cell is loading, loaded or failed; nothing was issued
    AlreadyActive,
    /// The source did not resolve; the cell is now failed
    Failed,
    OutOfRange,
}

#[derive(Debug)]
struct InFlight {
    index: usize,
    token: CancelToken,
}

/// Owns every cell and the loads issued for them
#[derive(Debug)]
pub struct CellPool {
    cells: Vec<ImageCell>,
    in_flight: SlotMap<LoadTicket, InFlight>,
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
    fade_duration: Duration,
}

impl Default for CellPool {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

impl CellPool {
    pub fn new(fade_duration: Duration) -> Self {
        let (sender, receiver) = completion_channel();
        Self {
            cells: Vec::new(),
            in_flight: SlotMap::with_key(),
            sender,
            receiver,
            fade_duration,
        }
    }

    pub fn set_fade_duration(&mut self, duration: Duration) {
        self.fade_duration = duration;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&ImageCell> {
        self.cells.get(index)
    }

    pub fn state(&self, index: usize) -> Option<&CellState> {
        self.cells.get(index).map(ImageCell::state)
    }

    pub fn cells(&self) -> &[ImageCell] {
        &self.cells
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Grow or shrink to exactly `count` cells
    pub fn reconcile(&mut self, count: usize) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        while self.cells.len() > count {
            let index = self.cells.len() - 1;
            self.evict(index);
            self.cells.pop();
            report.removed += 1;
        }
        while self.cells.len() < count {
            self.cells.push(ImageCell::default());
            report.created += 1;
        }

        if !report.is_noop() {
            tracing::debug!(
                created = report.created,
                removed = report.removed,
                count,
                "reconciled cell pool"
            );
        }
        report
    }

    /// Write sources and captions into the cells
    ///
    /// A cell whose source string changed is evicted. Missing or empty
    /// captions mean no caption. Returns how many cells were invalidated.
    pub fn assign(&mut self, sources: &[String], captions: &[String]) -> usize {
        let mut invalidated = 0;
        for index in 0..self.cells.len() {
            let source = sources.get(index).map(String::as_str).unwrap_or_default();
            if self.cells[index].source != source {
                if self.evict(index) {
                    invalidated += 1;
                }
                self.cells[index].source = source.to_string();
            }
            self.cells[index].caption = captions
                .get(index)
                .filter(|caption| !caption.is_empty())
                .cloned();
        }
        if invalidated > 0 {
            tracing::debug!(invalidated, "sources changed under loaded cells");
        }
        invalidated
    }

    /// Start loading the bitmap for `index` if it is unloaded
    pub fn load_image_for_index(
        &mut self,
        index: usize,
        loader: &mut dyn ImageLoader,
        encode: bool,
    ) -> LoadOutcome {
        let Some(cell) = self.cells.get_mut(index) else {
            return LoadOutcome::OutOfRange;
        };
        if !cell.state.is_unloaded() {
            return LoadOutcome::AlreadyActive;
        }

        let source = match ImageSource::resolve(&cell.source, encode) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(index, source = %cell.source, "unusable image source: {}", e);
                cell.state = CellState::Failed(e);
                return LoadOutcome::Failed;
            }
        };

        let token = CancelToken::new();
        let ticket = self.in_flight.insert(InFlight {
            index,
            token: token.clone(),
        });
        cell.state = CellState::Loading(ticket);
        tracing::trace!(index, ?ticket, %source, "issuing image load");

        loader.load(LoadRequest {
            index,
            source,
            completer: Completer::new(ticket, token, self.sender.clone()),
        });
        LoadOutcome::Issued(ticket)
    }

    /// Drop the bitmap for `index` and cancel its load
    ///
    /// Returns false when the cell was already unloaded or does not exist.
    pub fn evict(&mut self, index: usize) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        match std::mem::take(&mut cell.state) {
            CellState::Unloaded => false,
            CellState::Loading(ticket) => {
                if let Some(in_flight) = self.in_flight.remove(ticket) {
                    in_flight.token.cancel();
                }
                tracing::trace!(index, ?ticket, "cancelled image load");
                true
            }
            CellState::Loaded(_) | CellState::Failed(_) => {
                tracing::trace!(index, "evicted cell");
                true
            }
        }
    }

    /// Apply one completion; returns the index it landed on
    pub fn apply_completion(&mut self, completion: LoadCompletion) -> Option<usize> {
        let LoadCompletion {
            ticket,
            result,
            from_memory_cache,
        } = completion;

        let Some(InFlight { index, .. }) = self.in_flight.remove(ticket) else {
            tracing::trace!(?ticket, "dropping stale image completion");
            return None;
        };
        let cell = self.cells.get_mut(index)?;
        if !matches!(cell.state, CellState::Loading(current) if current == ticket) {
            tracing::trace!(index, ?ticket, "dropping superseded image completion");
            return None;
        }

        cell.state = match result {
            Ok(bitmap) => {
                let transition = if from_memory_cache {
                    Transition::None
                } else {
                    Transition::FadeIn(self.fade_duration)
                };
                tracing::trace!(index, from_memory_cache, "image loaded");
                CellState::Loaded(LoadedImage { bitmap, transition })
            }
            Err(e) => {
                tracing::warn!(index, source = %cell.source, "image load failed: {}", e);
                CellState::Failed(e)
            }
        };
        Some(index)
    }

    /// Drain the completion channel; returns how many completions applied
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            if self.apply_completion(completion).is_some() {
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_image::DecodingLoader;

    const RED_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    /// Holds requests until the test completes them
    #[derive(Default)]
    struct DeferredLoader {
        requests: Vec<LoadRequest>,
    }

    impl ImageLoader for DeferredLoader {
        fn load(&mut self, request: LoadRequest) {
            self.requests.push(request);
        }
    }

    fn pool_with(sources: &[&str]) -> CellPool {
        let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        let mut pool = CellPool::default();
        pool.reconcile(sources.len());
        pool.assign(&sources, &[]);
        pool
    }

    fn pixel() -> Arc<Bitmap> {
        Arc::new(Bitmap::from_rgba(vec![255; 4], 1, 1).unwrap())
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut pool = CellPool::default();
        assert_eq!(pool.reconcile(4), ReconcileReport { created: 4, removed: 0 });
        assert!(pool.reconcile(4).is_noop());
        assert_eq!(pool.reconcile(1), ReconcileReport { created: 0, removed: 3 });
        assert!(pool.reconcile(1).is_noop());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_load_and_complete() {
        let mut pool = pool_with(&[RED_PIXEL]);
        let mut loader = DecodingLoader::new();

        let outcome = pool.load_image_for_index(0, &mut loader, false);
        assert!(matches!(outcome, LoadOutcome::Issued(_)));
        // Nothing lands until the channel is drained
        assert!(pool.state(0).unwrap().is_loading());

        assert_eq!(pool.apply_pending(), 1);
        match pool.state(0).unwrap() {
            CellState::Loaded(loaded) => {
                assert_eq!(loaded.bitmap.dimensions(), (1, 1));
                assert_eq!(loaded.transition, Transition::FadeIn(Duration::from_millis(200)));
            }
            other => panic!("expected loaded, got {other:?}"),
        }
        assert_eq!(pool.in_flight_count(), 0);
    }

    #[test]
    fn test_one_request_per_index() {
        let mut pool = pool_with(&["a.png"]);
        let mut loader = DeferredLoader::default();

        assert!(matches!(
            pool.load_image_for_index(0, &mut loader, false),
            LoadOutcome::Issued(_)
        ));
        assert_eq!(
            pool.load_image_for_index(0, &mut loader, false),
            LoadOutcome::AlreadyActive
        );
        assert_eq!(loader.requests.len(), 1);
        assert_eq!(
            pool.load_image_for_index(3, &mut loader, false),
            LoadOutcome::OutOfRange
        );
    }

    #[test]
    fn test_malformed_source_fails_without_request() {
        let mut pool = pool_with(&["http://exa mple.com/a b.png"]);
        let mut loader = DeferredLoader::default();

        assert_eq!(pool.load_image_for_index(0, &mut loader, false), LoadOutcome::Failed);
        assert!(loader.requests.is_empty());
        match pool.state(0).unwrap() {
            CellState::Failed(e) => assert!(e.is_malformed()),
            other => panic!("expected failed, got {other:?}"),
        }
        // Failed cells are not retried until evicted
        assert_eq!(
            pool.load_image_for_index(0, &mut loader, false),
            LoadOutcome::AlreadyActive
        );
    }

    #[test]
    fn test_evicted_completion_is_stale() {
        let mut pool = pool_with(&["a.png"]);
        let mut loader = DeferredLoader::default();
        pool.load_image_for_index(0, &mut loader, false);

        assert!(pool.evict(0));
        let request = loader.requests.pop().unwrap();
        assert!(request.is_cancelled());

        request.completer.complete(Ok(pixel()), false);
        assert_eq!(pool.apply_pending(), 0);
        assert!(pool.state(0).unwrap().is_unloaded());
    }

    #[test]
    fn test_reload_after_eviction_ignores_old_ticket() {
        let mut pool = pool_with(&["a.png"]);
        let mut loader = DeferredLoader::default();

        pool.load_image_for_index(0, &mut loader, false);
        pool.evict(0);
        pool.load_image_for_index(0, &mut loader, false);

        let second = loader.requests.pop().unwrap();
        let first = loader.requests.pop().unwrap();
        first.completer.complete(Ok(pixel()), false);
        assert_eq!(pool.apply_pending(), 0);
        assert!(pool.state(0).unwrap().is_loading());

        second.completer.complete(Ok(pixel()), true);
        assert_eq!(pool.apply_pending(), 1);
        match pool.state(0).unwrap() {
            CellState::Loaded(loaded) => assert_eq!(loaded.transition, Transition::None),
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_shrink_cancels_trailing_loads() {
        let mut pool = pool_with(&["a.png", "b.png", "c.png"]);
        let mut loader = DeferredLoader::default();
        for i in 0..3 {
            pool.load_image_for_index(i, &mut loader, false);
        }

        pool.reconcile(1);
        assert_eq!(pool.in_flight_count(), 1);
        assert!(loader.requests[1].is_cancelled());
        assert!(loader.requests[2].is_cancelled());
        assert!(!loader.requests[0].is_cancelled());
    }

    #[test]
    fn test_changed_source_invalidates_cell() {
        let mut pool = pool_with(&[RED_PIXEL, RED_PIXEL]);
        let mut loader = DecodingLoader::new();
        pool.load_image_for_index(0, &mut loader, false);
        pool.load_image_for_index(1, &mut loader, false);
        pool.apply_pending();

        let sources = vec![RED_PIXEL.to_string(), "other.png".to_string()];
        assert_eq!(pool.assign(&sources, &[]), 1);
        assert!(pool.state(0).unwrap().is_loaded());
        assert!(pool.state(1).unwrap().is_unloaded());
        assert_eq!(pool.cell(1).unwrap().source(), "other.png");
    }

    #[test]
    fn test_captions_follow_positions() {
        let mut pool = pool_with(&["a.png", "b.png", "c.png"]);
        let sources: Vec<String> = ["a.png", "b.png", "c.png"].iter().map(|s| s.to_string()).collect();
        pool.assign(&sources, &["first".to_string(), String::new()]);
        assert_eq!(pool.cell(0).unwrap().caption(), Some("first"));
        assert_eq!(pool.cell(1).unwrap().caption(), None);
        assert_eq!(pool.cell(2).unwrap().caption(), None);
    }

    #[test]
    fn test_failed_load_marks_cell() {
        let mut pool = pool_with(&["missing/file.png"]);
        let mut loader = DecodingLoader::new();
        pool.load_image_for_index(0, &mut loader, false);
        pool.apply_pending();
        assert!(pool.state(0).unwrap().is_failed());

        // Eviction makes the cell eligible again
        assert!(pool.evict(0));
        assert!(matches!(
            pool.load_image_for_index(0, &mut loader, false),
            LoadOutcome::Issued(_)
        ));
    }
}
