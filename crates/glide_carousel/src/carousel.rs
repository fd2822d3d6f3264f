//! Carousel composition root
//!
//! Wires the geometry model, visibility tracker, cell pool, paging
//! controller and indicator coordinator to a host [`ScrollSurface`], an
//! [`ImageLoader`] and a [`TextMeasurer`].
//!
//! Every setter goes through the same two steps:
//!
//! 1. [`Carousel::configure`] turns a [`ConfigPatch`] into a [`LayoutPlan`]
//!    without changing anything
//! 2. [`Carousel::apply`] performs the plan: reconcile cells, move the
//!    surface, update paging and the indicator, then load and evict
//!
//! Image completions are only applied by [`Carousel::pump_image_loads`],
//! which hosts call from their event loop, never from inside a layout pass.
//!
//! # Example
//!
//! ```rust
//! use glide_carousel::prelude::*;
//!
//! let mut carousel = Carousel::new(HeadlessSurface::new(), DecodingLoader::new());
//! carousel.set_viewport_size(Size::new(320.0, 240.0));
//! carousel.set_image_list(["one.png", "two.png", "three.png"]);
//!
//! carousel.show_next();
//! assert_eq!(carousel.current_page(), 1);
//! assert_eq!(carousel.indicator_display().selected_dot, 1);
//! ```

use std::cell::RefCell;
use std::fmt;

use glide_core::{Point, Rect, Size};
use glide_image::ImageLoader;

use crate::cell_pool::{CellPool, CellState, LoadOutcome};
use crate::config::{CarouselConfig, ContentMode, IndicatorStyle};
use crate::geometry::{compute_layout, fit_content, CaptionHeightCache, CellFrame, Geometry};
use crate::indicator::{IndicatorCoordinator, IndicatorDisplay, IndicatorState};
use crate::paging::{PagingController, PagingMode, PagingState, ScrollCommand};
use crate::plan::{ConfigPatch, LayoutPlan, LayoutSnapshot};
use crate::surface::ScrollSurface;
use crate::text_measure::{EstimatedTextMeasurer, TextMeasurer};
use crate::visibility::{visible_indices, VisibleSet};

/// What the host needs to draw one page
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    pub index: usize,
    pub frame: CellFrame,
    pub source: &'a str,
    pub caption: Option<&'a str>,
    pub state: &'a CellState,
    pub content_mode: ContentMode,
}

impl CellView<'_> {
    /// Where the loaded bitmap is drawn, per the content mode
    pub fn image_rect(&self) -> Option<Rect> {
        let bitmap = self.state.bitmap()?;
        let size = Size::new(bitmap.width() as f32, bitmap.height() as f32);
        Some(fit_content(self.content_mode, self.frame.image, size))
    }

    pub fn is_placeholder(&self) -> bool {
        !self.state.is_loaded()
    }
}

/// Horizontally paging image carousel
pub struct Carousel<S: ScrollSurface> {
    snapshot: LayoutSnapshot,
    geometry: Geometry,
    pool: CellPool,
    paging: PagingController,
    indicator: IndicatorCoordinator,
    visible: VisibleSet,
    surface: S,
    loader: Box<dyn ImageLoader>,
    measurer: Box<dyn TextMeasurer>,
    caption_cache: RefCell<CaptionHeightCache>,
}

impl<S: ScrollSurface> Carousel<S> {
    pub fn new(surface: S, loader: impl ImageLoader + 'static) -> Self {
        Self::with_config(surface, loader, CarouselConfig::default())
    }

    pub fn with_config(
        surface: S,
        loader: impl ImageLoader + 'static,
        config: CarouselConfig,
    ) -> Self {
        let snapshot = LayoutSnapshot {
            config,
            ..Default::default()
        };
        let geometry = compute_layout(0, snapshot.viewport, &config, 0.0);

        let mut carousel = Self {
            geometry,
            pool: CellPool::new(config.loading.fade_duration()),
            paging: PagingController::new(),
            indicator: IndicatorCoordinator::new(),
            visible: VisibleSet::new(),
            surface,
            loader: Box::new(loader),
            measurer: Box::new(EstimatedTextMeasurer::new()),
            caption_cache: RefCell::new(CaptionHeightCache::new()),
            snapshot,
        };
        // Push the initial paging mode to the surface
        let plan = carousel.configure(ConfigPatch::new());
        carousel.apply(plan);
        carousel
    }

    /// Use the host's text engine for caption heights
    pub fn with_text_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self.caption_cache.borrow_mut().invalidate();
        let plan = self.configure(ConfigPatch::new());
        self.apply(plan);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &CarouselConfig {
        &self.snapshot.config
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn count(&self) -> usize {
        self.snapshot.count()
    }

    pub fn current_page(&self) -> usize {
        self.paging.current_page()
    }

    pub fn paging_state(&self) -> PagingState {
        self.paging.state()
    }

    pub fn paging_mode(&self) -> PagingMode {
        self.paging.mode()
    }

    pub fn indicator_state(&self) -> &IndicatorState {
        self.indicator.state()
    }

    pub fn indicator_display(&self) -> IndicatorDisplay {
        self.indicator.display(self.current_page())
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    pub fn cell_state(&self, index: usize) -> Option<&CellState> {
        self.pool.state(index)
    }

    /// Loads issued and not yet completed or cancelled
    pub fn loads_in_flight(&self) -> usize {
        self.pool.in_flight_count()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Render data for page `at`, or `None` past the end of the list
    pub fn image_view(&self, at: usize) -> Option<CellView<'_>> {
        let frame = self.geometry.frame_for(at)?;
        let cell = self.pool.cell(at)?;
        Some(CellView {
            index: at,
            frame,
            source: cell.source(),
            caption: cell.caption(),
            state: cell.state(),
            content_mode: self.snapshot.config.layout.content_mode,
        })
    }

    // ========================================================================
    // Setters
    // ========================================================================

    pub fn set_image_list<I, T>(&mut self, images: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.update(ConfigPatch::new().images(images));
    }

    pub fn set_caption_list<I, T>(&mut self, captions: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.update(ConfigPatch::new().captions(captions));
    }

    pub fn set_config(&mut self, config: CarouselConfig) {
        self.update(ConfigPatch::new().config(config));
    }

    pub fn set_indicator_style(&mut self, style: IndicatorStyle) {
        self.update(ConfigPatch::new().indicator_style(style));
    }

    pub fn set_load_visible_only(&mut self, enabled: bool) {
        self.update(ConfigPatch::new().load_visible_only(enabled));
    }

    pub fn set_paging_enabled(&mut self, enabled: bool) {
        self.update(ConfigPatch::new().paging_enabled(enabled));
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.update(ConfigPatch::new().snap_enabled(enabled));
    }

    pub fn set_page_width(&mut self, width: Option<f32>) {
        self.update(ConfigPatch::new().page_width(width));
    }

    pub fn set_margin(&mut self, margin: f32) {
        self.update(ConfigPatch::new().margin(margin));
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        self.update(ConfigPatch::new().spacing(spacing));
    }

    pub fn set_enable_encode_url(&mut self, enabled: bool) {
        self.update(ConfigPatch::new().enable_encode_url(enabled));
    }

    pub fn set_content_mode(&mut self, mode: ContentMode) {
        self.update(ConfigPatch::new().content_mode(mode));
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.update(ConfigPatch::new().viewport(size));
    }

    /// Configure and apply in one step
    pub fn update(&mut self, patch: ConfigPatch) {
        let plan = self.configure(patch);
        self.apply(plan);
    }

    // ========================================================================
    // Plan / apply
    // ========================================================================

    /// Derive the plan for `patch` without applying it
    pub fn configure(&self, patch: ConfigPatch) -> LayoutPlan {
        let snapshot = patch.apply_to(self.snapshot.clone());
        let config = &snapshot.config;
        let count = snapshot.count();
        let viewport = snapshot.viewport;

        let page_width = config.layout.page_width.unwrap_or(viewport.width);
        let caption_height = self.caption_cache.borrow_mut().height(
            &snapshot.captions,
            count,
            page_width,
            &config.caption,
            self.measurer.as_ref(),
        );

        let geometry = compute_layout(count, viewport, config, caption_height);
        let indicator = IndicatorState::derive(config.layout.indicator_style, count, &config.indicator);
        let paging_mode = PagingMode::from_config(config);

        let list_replaced = snapshot.images != self.snapshot.images;
        let current_page = self.paging.current_page().min(count.saturating_sub(1));
        let geometry_changed = geometry != self.geometry;

        let scroll_to = (geometry_changed || list_replaced).then(|| geometry.resting_point(current_page));
        let offset_x = scroll_to.unwrap_or_else(|| self.surface.content_offset()).x;
        let pin = (count > 0).then_some(current_page);
        let visible = visible_indices(
            offset_x,
            viewport.width,
            geometry.frames(),
            snapshot.visibility_policy(),
            pin,
        );

        let relayout = geometry_changed || self.indicator.needs_relayout(&indicator);
        let content_mode_changed =
            config.layout.content_mode != self.snapshot.config.layout.content_mode;

        LayoutPlan {
            snapshot,
            geometry,
            indicator,
            paging_mode,
            current_page,
            list_replaced,
            scroll_to,
            visible,
            relayout,
            content_mode_changed,
        }
    }

    /// Perform a plan produced by [`Carousel::configure`]
    ///
    /// The page, scroll target and visible set are taken from the live
    /// paging state rather than the plan, which may be older than the last
    /// scroll.
    pub fn apply(&mut self, plan: LayoutPlan) {
        let LayoutPlan {
            snapshot,
            geometry,
            indicator,
            paging_mode,
            list_replaced,
            scroll_to,
            relayout,
            content_mode_changed,
            ..
        } = plan;
        let count = snapshot.count();
        let geometry_changed = geometry != self.geometry;

        self.pool.set_fade_duration(snapshot.config.loading.fade_duration());
        self.pool.reconcile(count);
        self.pool.assign(&snapshot.images, &snapshot.captions);

        if list_replaced {
            self.paging.reset(count);
        } else {
            self.paging.set_count(count);
        }
        self.paging.set_mode(paging_mode);
        let current_page = self.paging.current_page();

        let indicator_changed = self.indicator.apply(indicator, count);
        let relayout = relayout || geometry_changed || indicator_changed;

        self.surface.set_paging_enabled(paging_mode.surface_pages());
        if relayout || list_replaced {
            self.surface.set_content_size(geometry.content_extent);
        }
        if scroll_to.is_some() || geometry_changed || list_replaced {
            self.surface
                .set_content_offset(geometry.resting_point(current_page), false);
        }

        self.snapshot = snapshot;
        self.geometry = geometry;
        self.refresh_visibility();

        if relayout || list_replaced {
            tracing::debug!(
                count,
                current_page,
                extent = self.geometry.content_extent.width,
                visible = self.visible.len(),
                list_replaced,
                indicator_changed,
                "applied carousel layout"
            );
        }
        if content_mode_changed {
            tracing::debug!(mode = ?self.snapshot.config.layout.content_mode, "content mode changed");
        }
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Scroll to page `index` (clamped) with animation
    pub fn go_to_page(&mut self, index: usize) {
        let command = self.paging.go_to_page(index, &self.geometry);
        self.perform(command);
    }

    pub fn show_previous(&mut self) {
        let command = self.paging.step(-1, &self.geometry);
        self.perform(command);
    }

    pub fn show_next(&mut self) {
        let command = self.paging.step(1, &self.geometry);
        self.perform(command);
    }

    fn perform(&mut self, command: Option<ScrollCommand>) {
        if let Some(command) = command {
            self.surface.set_content_offset(command.offset, command.animated);
            self.refresh_visibility();
        }
    }

    // ========================================================================
    // Host callbacks
    // ========================================================================

    pub fn will_begin_dragging(&mut self) {
        let offset_x = self.surface.content_offset().x;
        self.paging.begin_drag(offset_x);
    }

    /// The surface scrolled; follow the page and refresh visibility
    pub fn did_scroll(&mut self) {
        let offset_x = self.surface.content_offset().x;
        self.paging.track_offset(offset_x, &self.geometry);
        self.refresh_visibility();
    }

    /// The user lifted their finger; returns where the surface should stop
    pub fn will_end_dragging(&mut self, projected: Point) -> Point {
        self.paging.end_drag(projected, &self.geometry)
    }

    pub fn did_end_decelerating(&mut self) {
        self.settle();
    }

    pub fn did_end_scroll_animation(&mut self) {
        self.settle();
    }

    fn settle(&mut self) {
        let offset_x = self.surface.content_offset().x;
        self.paging.settle(offset_x, &self.geometry);
        self.refresh_visibility();
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Apply finished image loads; returns how many landed
    pub fn pump_image_loads(&mut self) -> usize {
        let applied = self.pool.apply_pending();
        if applied > 0 {
            tracing::trace!(applied, "applied image completions");
        }
        applied
    }

    /// Re-evaluate visibility at the surface's current offset
    pub fn refresh_visibility(&mut self) {
        let count = self.count();
        let pin = (count > 0).then_some(self.current_page());
        let visible = visible_indices(
            self.surface.content_offset().x,
            self.geometry.viewport.width,
            self.geometry.frames(),
            self.snapshot.visibility_policy(),
            pin,
        );
        self.apply_visibility(visible);
    }

    /// Load what is visible, evict every other cell that holds something
    ///
    /// The sweep covers all cells, not just those that left the previous
    /// set, so cells kept by `retain_loaded` go once it is turned off.
    fn apply_visibility(&mut self, visible: VisibleSet) {
        let encode = self.snapshot.config.loading.enable_encode_url;
        let retain_loaded = self.snapshot.config.loading.retain_loaded;

        let mut evicted = 0;
        for index in (0..self.pool.len()).filter(|&i| !visible.contains(i)) {
            let keep = retain_loaded && self.pool.state(index).is_some_and(CellState::is_loaded);
            if !keep && self.pool.evict(index) {
                evicted += 1;
            }
        }

        let mut issued = 0;
        for index in visible.iter() {
            if let LoadOutcome::Issued(_) =
                self.pool.load_image_for_index(index, self.loader.as_mut(), encode)
            {
                issued += 1;
            }
        }

        if issued > 0 || evicted > 0 {
            tracing::trace!(
                visible = ?visible.as_slice(),
                issued,
                evicted,
                "visibility changed"
            );
        }
        self.visible = visible;
    }
}

impl<S: ScrollSurface + fmt::Debug> fmt::Debug for Carousel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("count", &self.count())
            .field("current_page", &self.current_page())
            .field("paging", &self.paging.state())
            .field("visible", &self.visible.as_slice())
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
