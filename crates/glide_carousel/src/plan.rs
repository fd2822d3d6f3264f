//! Layout snapshots, patches and plans
//!
//! Every change to a carousel is a [`ConfigPatch`]. Applying a patch to the
//! current [`LayoutSnapshot`] gives the next snapshot, and the carousel
//! derives a [`LayoutPlan`] from it without touching any state. Only
//! `Carousel::apply` turns a plan into effects.

use glide_core::{Point, Size};

use crate::config::{CarouselConfig, ContentMode, IndicatorStyle};
use crate::geometry::Geometry;
use crate::indicator::IndicatorState;
use crate::paging::PagingMode;
use crate::visibility::{VisibilityPolicy, VisibleSet};

/// Every input the derived layout depends on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    pub images: Vec<String>,
    pub captions: Vec<String>,
    pub config: CarouselConfig,
    pub viewport: Size,
}

impl LayoutSnapshot {
    pub fn count(&self) -> usize {
        self.images.len()
    }

    pub fn visibility_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::from_loading(
            self.config.loading.load_visible_only,
            self.config.loading.prefetch_distance,
        )
    }
}

/// A set of changes; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub images: Option<Vec<String>>,
    pub captions: Option<Vec<String>>,
    pub config: Option<CarouselConfig>,
    pub viewport: Option<Size>,
    pub indicator_style: Option<IndicatorStyle>,
    pub content_mode: Option<ContentMode>,
    pub page_width: Option<Option<f32>>,
    pub margin: Option<f32>,
    pub spacing: Option<f32>,
    pub load_visible_only: Option<bool>,
    pub enable_encode_url: Option<bool>,
    pub paging_enabled: Option<bool>,
    pub snap_enabled: Option<bool>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = Some(images.into_iter().map(Into::into).collect());
        self
    }

    pub fn captions<I, S>(mut self, captions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.captions = Some(captions.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the whole configuration; field patches still apply on top
    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn viewport(mut self, size: Size) -> Self {
        self.viewport = Some(size);
        self
    }

    pub fn indicator_style(mut self, style: IndicatorStyle) -> Self {
        self.indicator_style = Some(style);
        self
    }

    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = Some(mode);
        self
    }

    pub fn page_width(mut self, width: Option<f32>) -> Self {
        self.page_width = Some(width);
        self
    }

    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn load_visible_only(mut self, enabled: bool) -> Self {
        self.load_visible_only = Some(enabled);
        self
    }

    pub fn enable_encode_url(mut self, enabled: bool) -> Self {
        self.enable_encode_url = Some(enabled);
        self
    }

    pub fn paging_enabled(mut self, enabled: bool) -> Self {
        self.paging_enabled = Some(enabled);
        self
    }

    pub fn snap_enabled(mut self, enabled: bool) -> Self {
        self.snap_enabled = Some(enabled);
        self
    }

    /// The snapshot that results from applying this patch
    pub fn apply_to(self, mut snapshot: LayoutSnapshot) -> LayoutSnapshot {
        if let Some(images) = self.images {
            snapshot.images = images;
        }
        if let Some(captions) = self.captions {
            snapshot.captions = captions;
        }
        if let Some(viewport) = self.viewport {
            snapshot.viewport = viewport;
        }

        let mut config = self.config.unwrap_or(snapshot.config);
        if let Some(style) = self.indicator_style {
            config.layout.indicator_style = style;
        }
        if let Some(mode) = self.content_mode {
            config.layout.content_mode = mode;
        }
        if let Some(width) = self.page_width {
            config.layout.page_width = width;
        }
        if let Some(margin) = self.margin {
            config.layout.margin = margin;
        }
        if let Some(spacing) = self.spacing {
            config.layout.spacing = spacing;
        }
        if let Some(enabled) = self.load_visible_only {
            config.loading.load_visible_only = enabled;
        }
        if let Some(enabled) = self.enable_encode_url {
            config.loading.enable_encode_url = enabled;
        }
        if let Some(enabled) = self.paging_enabled {
            config.paging.paging_enabled = enabled;
        }
        if let Some(enabled) = self.snap_enabled {
            config.paging.snap_enabled = enabled;
        }
        snapshot.config = config;
        snapshot
    }
}

/// Everything one layout pass will do, computed ahead of time
///
/// Page, scroll target and visible set are predictions made from the paging
/// state at configure time. [`Carousel::apply`](crate::Carousel::apply)
/// derives them again from the live paging state, so a plan applied after
/// the user paged never moves the surface off the current page.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub snapshot: LayoutSnapshot,
    pub geometry: Geometry,
    pub indicator: IndicatorState,
    pub paging_mode: PagingMode,
    /// Current page after the pass, clamped to the new count
    pub current_page: usize,
    /// The image list differs from the previous one
    pub list_replaced: bool,
    /// Offset the surface is moved to without animation, if any
    pub scroll_to: Option<Point>,
    /// Visible set at the offset the surface ends up at
    pub visible: VisibleSet,
    /// Frames, content size or indicator presentation changed
    pub relayout: bool,
    pub content_mode_changed: bool,
}

impl LayoutPlan {
    pub fn count(&self) -> usize {
        self.snapshot.count()
    }
}
