//! Paging controller
//!
//! Reconciles free scrolling with a discrete current page.
//!
//! ```text
//!            DragBegan                Released(Some)
//!   ┌──────┐ ─────────▶ ┌──────────┐ ──────────────▶ ┌──────────┐
//!   │ Idle │            │ Dragging │                 │ Settling │
//!   └──────┘ ◀───────── └──────────┘ ◀────────────── └──────────┘
//!      ▲     Released(None)            DragBegan          │
//!      └──────────────────────────────────────────────────┘
//!                            Settled
//! ```
//!
//! `ScrollTo` enters `Settling` from any state and `Reset` returns to
//! `Idle` from any state. The current page follows the scroll offset
//! continuously in every state.

use glide_core::{Point, StateTransitions};

use crate::config::CarouselConfig;
use crate::geometry::Geometry;

/// How released drags come to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// The host surface pages by its own width
    #[default]
    Native,
    /// Releases are redirected to the nearest page's resting offset
    Snap,
    /// No paging
    Free,
}

impl PagingMode {
    /// Native paging only works when one page fills the viewport exactly;
    /// any custom width, margin or spacing falls back to snapping.
    pub fn from_config(config: &CarouselConfig) -> Self {
        let layout = &config.layout;
        let custom = layout.page_width.is_some() || layout.margin != 0.0 || layout.spacing != 0.0;

        if config.paging.paging_enabled && !custom {
            PagingMode::Native
        } else if config.paging.snap_enabled || config.paging.paging_enabled {
            PagingMode::Snap
        } else {
            PagingMode::Free
        }
    }

    pub fn surface_pages(&self) -> bool {
        *self == PagingMode::Native
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PagingState {
    #[default]
    Idle,
    Dragging {
        begin_offset_x: f32,
    },
    Settling {
        target_page: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PagingEvent {
    DragBegan { offset_x: f32 },
    /// `target` is set when the release was redirected to a page
    Released { target: Option<usize> },
    ScrollTo { page: usize },
    Settled,
    Reset,
}

impl StateTransitions for PagingState {
    type Event = PagingEvent;

    fn on_event(&self, event: &PagingEvent) -> Option<Self> {
        use PagingEvent::*;
        use PagingState::*;

        match (self, event) {
            (Idle | Settling { .. }, DragBegan { offset_x }) => Some(Dragging {
                begin_offset_x: *offset_x,
            }),
            (Dragging { .. }, Released { target: Some(page) }) => Some(Settling {
                target_page: *page,
            }),
            (Dragging { .. }, Released { target: None }) => Some(Idle),
            (_, ScrollTo { page }) => Some(Settling { target_page: *page }),
            (Dragging { .. } | Settling { .. }, Settled) => Some(Idle),
            (_, Reset) => Some(Idle),
            _ => None,
        }
    }
}

/// A scroll the surface should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub offset: Point,
    pub animated: bool,
}

/// Owns the current page and the paging state machine
#[derive(Debug, Clone, Default)]
pub struct PagingController {
    state: PagingState,
    mode: PagingMode,
    current_page: usize,
    count: usize,
}

impl PagingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PagingState {
        self.state
    }

    pub fn mode(&self) -> PagingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PagingMode) {
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "paging mode changed");
            self.mode = mode;
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Update the page count, clamping the current page
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.current_page = clamp_page(self.current_page, count);
    }

    /// The list was replaced: back to idle with the page clamped
    pub fn reset(&mut self, count: usize) {
        if self.state.transition(&PagingEvent::Reset) {
            tracing::debug!("paging reset to idle");
        }
        self.set_count(count);
    }

    pub fn begin_drag(&mut self, offset_x: f32) {
        self.state.transition(&PagingEvent::DragBegan { offset_x });
        tracing::trace!(offset_x, "drag began");
    }

    /// Follow the scroll offset; returns the new page when it changed
    pub fn track_offset(&mut self, offset_x: f32, geometry: &Geometry) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let page = geometry.nearest_page(offset_x, self.current_page);
        if page == self.current_page {
            return None;
        }
        tracing::debug!(from = self.current_page, to = page, offset_x, "current page changed");
        self.current_page = page;
        Some(page)
    }

    /// Decide where a released drag comes to rest
    ///
    /// Only snap mode rewrites the projected offset, and never when it
    /// already sits at or past either end of the content.
    pub fn end_drag(&mut self, projected: Point, geometry: &Geometry) -> Point {
        let snapped = match self.mode {
            PagingMode::Snap if self.count > 0 => {
                let x = projected.x;
                if x <= 0.0 || x >= geometry.max_offset() {
                    None
                } else {
                    let page = geometry.nearest_page(x, self.current_page);
                    Some((page, geometry.resting_offset(page)))
                }
            }
            _ => None,
        };

        self.state.transition(&PagingEvent::Released {
            target: snapped.map(|(page, _)| page),
        });

        match snapped {
            Some((page, offset)) => {
                tracing::debug!(projected = projected.x, offset, page, "snapped release");
                projected.with_x(offset)
            }
            None => projected,
        }
    }

    /// Scroll command for page `page`, clamped into range
    pub fn go_to_page(&mut self, page: usize, geometry: &Geometry) -> Option<ScrollCommand> {
        if self.count == 0 {
            return None;
        }
        let page = clamp_page(page, self.count);
        if page != self.current_page {
            tracing::debug!(from = self.current_page, to = page, "go to page");
        }
        self.current_page = page;
        self.state.transition(&PagingEvent::ScrollTo { page });

        Some(ScrollCommand {
            offset: geometry.resting_point(page),
            animated: true,
        })
    }

    /// Move by `delta` pages; no-op past either end
    pub fn step(&mut self, delta: isize, geometry: &Geometry) -> Option<ScrollCommand> {
        let target = self.current_page.checked_add_signed(delta)?;
        if target >= self.count {
            return None;
        }
        self.go_to_page(target, geometry)
    }

    /// Scrolling stopped; re-derive the page from where it stopped
    pub fn settle(&mut self, offset_x: f32, geometry: &Geometry) -> Option<usize> {
        self.state.transition(&PagingEvent::Settled);
        self.track_offset(offset_x, geometry)
    }
}

fn clamp_page(page: usize, count: usize) -> usize {
    page.min(count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorStyle;
    use crate::geometry::compute_layout;
    use glide_core::Size;

    fn native(count: usize) -> Geometry {
        let config = CarouselConfig::default().with_indicator_style(IndicatorStyle::None);
        compute_layout(count, Size::new(100.0, 100.0), &config, 0.0)
    }

    fn custom_config() -> CarouselConfig {
        CarouselConfig::default()
            .with_indicator_style(IndicatorStyle::None)
            .with_page_width(Some(80.0))
            .with_margin(10.0)
            .with_spacing(10.0)
    }

    fn controller(count: usize, mode: PagingMode) -> PagingController {
        let mut controller = PagingController::new();
        controller.set_mode(mode);
        controller.set_count(count);
        controller
    }

    #[test]
    fn test_state_machine() {
        let mut state = PagingState::Idle;
        assert!(state.transition(&PagingEvent::DragBegan { offset_x: 40.0 }));
        assert_eq!(state, PagingState::Dragging { begin_offset_x: 40.0 });
        assert!(!state.transition(&PagingEvent::DragBegan { offset_x: 60.0 }));

        assert!(state.transition(&PagingEvent::Released { target: Some(2) }));
        assert_eq!(state, PagingState::Settling { target_page: 2 });
        assert!(state.transition(&PagingEvent::Settled));
        assert_eq!(state, PagingState::Idle);

        assert!(!state.transition(&PagingEvent::Settled));
        assert!(!state.transition(&PagingEvent::Released { target: None }));
    }

    #[test]
    fn test_mode_from_config() {
        let config = CarouselConfig::default();
        assert_eq!(PagingMode::from_config(&config), PagingMode::Native);
        assert_eq!(PagingMode::from_config(&custom_config()), PagingMode::Snap);
        assert_eq!(
            PagingMode::from_config(&config.with_paging(false)),
            PagingMode::Free
        );
        assert_eq!(
            PagingMode::from_config(&config.with_paging(false).with_snap(true)),
            PagingMode::Snap
        );
        assert_eq!(
            PagingMode::from_config(&config.with_spacing(4.0)),
            PagingMode::Snap
        );
    }

    #[test]
    fn test_track_offset_updates_page() {
        let geometry = native(5);
        let mut paging = controller(5, PagingMode::Native);

        assert_eq!(paging.track_offset(30.0, &geometry), None);
        assert_eq!(paging.track_offset(50.0, &geometry), Some(1));
        assert_eq!(paging.track_offset(260.0, &geometry), Some(3));
        assert_eq!(paging.current_page(), 3);
    }

    #[test]
    fn test_snap_release_mid_page() {
        let config = custom_config().with_paging(false).with_snap(true);
        let geometry = compute_layout(5, Size::new(100.0, 100.0), &config, 0.0);
        let mut paging = controller(5, PagingMode::from_config(&config));

        paging.begin_drag(0.0);
        let target = paging.end_drag(Point::new(170.0, 0.0), &geometry);
        assert_eq!(target, Point::new(180.0, 0.0));
        assert_eq!(paging.state(), PagingState::Settling { target_page: 2 });
    }

    #[test]
    fn test_snap_release_at_edges_is_untouched() {
        let config = custom_config();
        let geometry = compute_layout(5, Size::new(100.0, 100.0), &config, 0.0);
        let mut paging = controller(5, PagingMode::Snap);

        for x in [-20.0, 0.0, geometry.max_offset(), geometry.max_offset() + 35.0] {
            paging.begin_drag(100.0);
            let projected = Point::new(x, 0.0);
            assert_eq!(paging.end_drag(projected, &geometry), projected);
            assert_eq!(paging.state(), PagingState::Idle);
        }
    }

    #[test]
    fn test_native_release_is_left_to_surface() {
        let geometry = native(5);
        let mut paging = controller(5, PagingMode::Native);
        paging.begin_drag(0.0);
        let projected = Point::new(170.0, 0.0);
        assert_eq!(paging.end_drag(projected, &geometry), projected);
        assert_eq!(paging.state(), PagingState::Idle);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let geometry = native(4);
        let mut paging = controller(4, PagingMode::Native);

        let first = paging.go_to_page(0, &geometry).unwrap();
        assert_eq!(first.offset, Point::new(0.0, 0.0));
        assert!(first.animated);

        let last = paging.go_to_page(99, &geometry).unwrap();
        assert_eq!(last.offset.x, 300.0);
        assert_eq!(paging.current_page(), 3);
        assert_eq!(paging.state(), PagingState::Settling { target_page: 3 });

        let mut empty = controller(0, PagingMode::Native);
        assert!(empty.go_to_page(2, &native(0)).is_none());
        assert_eq!(empty.current_page(), 0);
    }

    #[test]
    fn test_step_stops_at_boundaries() {
        let geometry = native(3);
        let mut paging = controller(3, PagingMode::Native);

        assert!(paging.step(-1, &geometry).is_none());
        assert_eq!(paging.step(1, &geometry).unwrap().offset.x, 100.0);
        assert!(paging.step(1, &geometry).is_some());
        assert!(paging.step(1, &geometry).is_none());
        assert_eq!(paging.current_page(), 2);
    }

    #[test]
    fn test_settle_returns_to_idle() {
        let geometry = native(3);
        let mut paging = controller(3, PagingMode::Native);
        paging.begin_drag(0.0);
        paging.end_drag(Point::new(100.0, 0.0), &geometry);

        assert_eq!(paging.settle(100.0, &geometry), Some(1));
        assert_eq!(paging.state(), PagingState::Idle);
    }

    #[test]
    fn test_reset_clamps_page() {
        let geometry = native(10);
        let mut paging = controller(10, PagingMode::Native);
        paging.go_to_page(8, &geometry);

        paging.reset(3);
        assert_eq!(paging.state(), PagingState::Idle);
        assert_eq!(paging.current_page(), 2);

        paging.reset(0);
        assert_eq!(paging.current_page(), 0);
    }
}
