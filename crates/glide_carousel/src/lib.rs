//! Glide Carousel
//!
//! A headless, horizontally paging image carousel. The engine decides which
//! pages are visible, when their bitmaps load and unload, where every frame
//! goes, which page is current and what the page indicator shows. Drawing
//! and scrolling stay with the host.
//!
//! # Architecture
//!
//! - [`geometry`]: page frames, content extent and indicator space
//! - [`visibility`]: which indices are visible for a scroll offset
//! - [`cell_pool`]: per-index cells and their load states
//! - [`paging`]: the paging state machine and current page
//! - [`indicator`]: dots / arrows presentation
//! - [`carousel`]: the composition root, driven by [`ConfigPatch`]es
//!
//! # Example
//!
//! ```rust
//! use glide_carousel::prelude::*;
//!
//! let config = CarouselConfig::default()
//!     .with_load_visible_only(true)
//!     .with_indicator_style(IndicatorStyle::ArrowsBelow);
//!
//! let mut carousel =
//!     Carousel::with_config(HeadlessSurface::new(), DecodingLoader::new(), config);
//! carousel.set_viewport_size(Size::new(100.0, 200.0));
//! carousel.set_image_list((0..10).map(|i| format!("photo-{i}.png")));
//!
//! carousel.go_to_page(5);
//! assert_eq!(carousel.visible().as_slice(), &[4, 5, 6]);
//! assert_eq!(
//!     carousel.indicator_display().counter_text.as_deref(),
//!     Some("6 / 10")
//! );
//! ```

pub mod carousel;
pub mod cell_pool;
pub mod config;
pub mod error;
pub mod geometry;
pub mod indicator;
pub mod paging;
pub mod plan;
pub mod surface;
pub mod text_measure;
pub mod visibility;

pub use carousel::{Carousel, CellView};
pub use cell_pool::{
    CellPool, CellState, ImageCell, LoadOutcome, LoadedImage, ReconcileReport, Transition,
};
pub use config::{
    CaptionStyle, CarouselConfig, ContentMode, IndicatorMetrics, IndicatorStyle, LayoutConfig,
    LoadingConfig, PagingConfig,
};
pub use error::{ConfigError, Result};
pub use geometry::{
    compute_layout, fit_content, measure_caption_height, ArrowFrames, CaptionHeightCache,
    CellFrame, Geometry, IndicatorFrame,
};
pub use indicator::{
    reserved_height, IndicatorCoordinator, IndicatorDisplay, IndicatorPresentation,
    IndicatorState,
};
pub use paging::{PagingController, PagingEvent, PagingMode, PagingState, ScrollCommand};
pub use plan::{ConfigPatch, LayoutPlan, LayoutSnapshot};
pub use surface::{HeadlessSurface, ScrollSurface, SurfaceCommand};
pub use text_measure::{EstimatedTextMeasurer, TextLayoutOptions, TextMeasurer, TextMetrics};
pub use visibility::{visible_indices, VisibilityPolicy, VisibleSet};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::carousel::{Carousel, CellView};
    pub use crate::cell_pool::{CellState, Transition};
    pub use crate::config::{CarouselConfig, ContentMode, IndicatorStyle};
    pub use crate::error::{ConfigError, Result};
    pub use crate::indicator::{IndicatorDisplay, IndicatorPresentation};
    pub use crate::paging::{PagingMode, PagingState};
    pub use crate::plan::{ConfigPatch, LayoutPlan};
    pub use crate::surface::{HeadlessSurface, ScrollSurface};
    pub use crate::text_measure::{EstimatedTextMeasurer, TextMeasurer};

    // Core types
    pub use glide_core::{Point, Rect, Size};

    // Image loading
    pub use glide_image::{DecodingLoader, ImageLoader, ImageSource, MemoryCache};
}
