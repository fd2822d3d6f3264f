//! Visibility tracker
//!
//! Decides which cells count as visible for a scroll offset. Visible cells
//! get their bitmaps loaded; cells that leave the set are evicted.
//!
//! A frame is visible when its horizontal span overlaps the closed interval
//! `[offset - prefetch, offset + viewport_width + prefetch]`. Overlap is
//! inclusive, so a page that only touches a viewport edge still counts,
//! which keeps both neighbours of a centered page warm.
//!
//! Before the host reports a viewport every frame is zero-width at x = 0 and
//! overlaps every window, so a lazy policy with no viewport width yields only
//! the pinned page.

use smallvec::SmallVec;

use crate::geometry::CellFrame;

/// How visibility is decided
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VisibilityPolicy {
    /// Every index is visible
    #[default]
    Eager,
    /// Only frames near the viewport are visible
    Lazy { prefetch_distance: f32 },
}

impl VisibilityPolicy {
    pub fn from_loading(load_visible_only: bool, prefetch_distance: f32) -> Self {
        if load_visible_only {
            VisibilityPolicy::Lazy { prefetch_distance }
        } else {
            VisibilityPolicy::Eager
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, VisibilityPolicy::Lazy { .. })
    }
}

/// Sorted, deduplicated set of visible indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    indices: SmallVec<[usize; 4]>,
}

impl VisibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every index in `0..count`
    pub fn all(count: usize) -> Self {
        Self {
            indices: (0..count).collect(),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn insert(&mut self, index: usize) {
        if let Err(pos) = self.indices.binary_search(&index) {
            self.indices.insert(pos, index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Indices in `self` that are not in `other`
    pub fn difference<'a>(&'a self, other: &'a VisibleSet) -> impl Iterator<Item = usize> + 'a {
        self.iter().filter(move |i| !other.contains(*i))
    }
}

impl FromIterator<usize> for VisibleSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = VisibleSet::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

/// Visible indices for a scroll position
///
/// `frames` must be ordered by x, as [`compute_layout`](crate::compute_layout)
/// produces them. `pin` is always included when it is in range; the carousel
/// pins the current page.
pub fn visible_indices(
    offset_x: f32,
    viewport_width: f32,
    frames: &[CellFrame],
    policy: VisibilityPolicy,
    pin: Option<usize>,
) -> VisibleSet {
    let mut set = match policy {
        VisibilityPolicy::Eager => VisibleSet::all(frames.len()),
        VisibilityPolicy::Lazy { .. } if viewport_width <= 0.0 => VisibleSet::new(),
        VisibilityPolicy::Lazy { prefetch_distance } => {
            let start = offset_x - prefetch_distance;
            let end = offset_x + viewport_width + prefetch_distance;

            let first = frames.partition_point(|frame| frame.image.max_x() < start);
            frames[first..]
                .iter()
                .take_while(|frame| frame.image.x() <= end)
                .enumerate()
                .map(|(i, _)| first + i)
                .collect()
        }
    };

    if let Some(pin) = pin.filter(|&p| p < frames.len()) {
        set.insert(pin);
    }
    set
}
