//! Indicator coordinator
//!
//! Owns the indicator style and derives what is shown from it and the page
//! count. A list of zero or one image never shows an indicator, whatever
//! the configured style, and then reserves no layout space.
//!
//! ```text
//!                 style
//!  ┌──────────┐ ─────────▶ ┌──────────────┐
//!  │  Hidden  │            │ DotsVisible  │ (dots_below)
//!  └──────────┘ ◀──────── ├──────────────┤
//!        count <= 1       │ OverlayDots  │ (dots_over_content)
//!                         ├──────────────┤
//!                         │ArrowsVisible │ (arrows_below)
//!                         └──────────────┘
//! ```

use crate::config::{IndicatorMetrics, IndicatorStyle};

/// What the indicator area currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndicatorPresentation {
    #[default]
    Hidden,
    DotsVisible,
    /// Dots drawn on top of the images; reserves no height
    OverlayDots,
    ArrowsVisible,
}

/// Layout height an indicator style takes below the scroll area
pub fn reserved_height(style: IndicatorStyle, count: usize, metrics: &IndicatorMetrics) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    match style {
        IndicatorStyle::None | IndicatorStyle::DotsOverContent => 0.0,
        IndicatorStyle::DotsBelow => metrics.top_padding + metrics.dots_height,
        IndicatorStyle::ArrowsBelow => metrics.top_padding + metrics.arrows_height,
    }
}

/// Derived indicator state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    pub style: IndicatorStyle,
    pub visible: bool,
    pub reserved_height: f32,
    pub presentation: IndicatorPresentation,
}

impl IndicatorState {
    pub fn derive(style: IndicatorStyle, count: usize, metrics: &IndicatorMetrics) -> Self {
        let presentation = if count <= 1 {
            IndicatorPresentation::Hidden
        } else {
            match style {
                IndicatorStyle::None => IndicatorPresentation::Hidden,
                IndicatorStyle::DotsBelow => IndicatorPresentation::DotsVisible,
                IndicatorStyle::DotsOverContent => IndicatorPresentation::OverlayDots,
                IndicatorStyle::ArrowsBelow => IndicatorPresentation::ArrowsVisible,
            }
        };

        Self {
            style,
            visible: presentation != IndicatorPresentation::Hidden,
            reserved_height: reserved_height(style, count, metrics),
            presentation,
        }
    }
}

/// Snapshot for rendering the indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorDisplay {
    pub presentation: IndicatorPresentation,
    pub dot_count: usize,
    pub selected_dot: usize,
    /// "N / total", only for the arrow presentation
    pub counter_text: Option<String>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// Owns the indicator state between layout passes
#[derive(Debug, Clone)]
pub struct IndicatorCoordinator {
    state: IndicatorState,
    count: usize,
}

impl Default for IndicatorCoordinator {
    fn default() -> Self {
        Self {
            state: IndicatorState::derive(IndicatorStyle::default(), 0, &IndicatorMetrics::default()),
            count: 0,
        }
    }
}

impl IndicatorCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    /// Whether installing `next` changes the reserved space or what is shown
    pub fn needs_relayout(&self, next: &IndicatorState) -> bool {
        next.presentation != self.state.presentation
            || next.visible != self.state.visible
            || next.reserved_height != self.state.reserved_height
    }

    /// Install a newly derived state
    ///
    /// Returns [`needs_relayout`](Self::needs_relayout) for `state` as it
    /// stood before the install.
    pub fn apply(&mut self, state: IndicatorState, count: usize) -> bool {
        let changed = self.needs_relayout(&state);
        if changed {
            tracing::debug!(
                from = ?self.state.presentation,
                to = ?state.presentation,
                count,
                "indicator presentation changed"
            );
        }
        self.state = state;
        self.count = count;
        changed
    }

    /// Text of the arrow control's counter label
    pub fn counter_text(&self, current_page: usize) -> String {
        if self.count == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", current_page.min(self.count - 1) + 1, self.count)
    }

    pub fn display(&self, current_page: usize) -> IndicatorDisplay {
        let presentation = self.state.presentation;
        let page = current_page.min(self.count.saturating_sub(1));
        let dots = matches!(
            presentation,
            IndicatorPresentation::DotsVisible | IndicatorPresentation::OverlayDots
        );
        let arrows = presentation == IndicatorPresentation::ArrowsVisible;

        IndicatorDisplay {
            presentation,
            dot_count: if dots { self.count } else { 0 },
            selected_dot: page,
            counter_text: arrows.then(|| self.counter_text(page)),
            can_go_previous: arrows && page > 0,
            can_go_next: arrows && page + 1 < self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> IndicatorMetrics {
        IndicatorMetrics::default()
    }

    #[test]
    fn test_single_item_hides_every_style() {
        for style in [
            IndicatorStyle::None,
            IndicatorStyle::DotsBelow,
            IndicatorStyle::DotsOverContent,
            IndicatorStyle::ArrowsBelow,
        ] {
            for count in [0, 1] {
                let state = IndicatorState::derive(style, count, &metrics());
                assert!(!state.visible);
                assert_eq!(state.reserved_height, 0.0);
                assert_eq!(state.presentation, IndicatorPresentation::Hidden);
            }
        }
    }

    #[test]
    fn test_presentations() {
        let dots = IndicatorState::derive(IndicatorStyle::DotsBelow, 3, &metrics());
        assert_eq!(dots.presentation, IndicatorPresentation::DotsVisible);
        assert_eq!(dots.reserved_height, 25.0);

        let overlay = IndicatorState::derive(IndicatorStyle::DotsOverContent, 3, &metrics());
        assert_eq!(overlay.presentation, IndicatorPresentation::OverlayDots);
        assert!(overlay.visible);
        assert_eq!(overlay.reserved_height, 0.0);

        let arrows = IndicatorState::derive(IndicatorStyle::ArrowsBelow, 3, &metrics());
        assert_eq!(arrows.presentation, IndicatorPresentation::ArrowsVisible);
        assert_eq!(arrows.reserved_height, 35.0);

        let none = IndicatorState::derive(IndicatorStyle::None, 3, &metrics());
        assert!(!none.visible);
    }

    #[test]
    fn test_crossing_one_item_boundary_requests_layout() {
        let mut coordinator = IndicatorCoordinator::new();
        let m = metrics();

        assert!(!coordinator.apply(IndicatorState::derive(IndicatorStyle::DotsBelow, 1, &m), 1));
        assert!(coordinator.apply(IndicatorState::derive(IndicatorStyle::DotsBelow, 2, &m), 2));
        assert!(!coordinator.apply(IndicatorState::derive(IndicatorStyle::DotsBelow, 5, &m), 5));
        assert!(coordinator.apply(IndicatorState::derive(IndicatorStyle::ArrowsBelow, 5, &m), 5));
    }

    #[test]
    fn test_needs_relayout_matches_apply() {
        let mut coordinator = IndicatorCoordinator::new();
        let m = metrics();
        let arrows = IndicatorState::derive(IndicatorStyle::ArrowsBelow, 4, &m);

        assert!(coordinator.needs_relayout(&arrows));
        assert!(coordinator.apply(arrows, 4));
        assert!(!coordinator.needs_relayout(&arrows));
        // Same presentation for a longer list
        let longer = IndicatorState::derive(IndicatorStyle::ArrowsBelow, 9, &m);
        assert!(!coordinator.needs_relayout(&longer));
    }

    #[test]
    fn test_arrow_display() {
        let mut coordinator = IndicatorCoordinator::new();
        coordinator.apply(
            IndicatorState::derive(IndicatorStyle::ArrowsBelow, 4, &metrics()),
            4,
        );

        let first = coordinator.display(0);
        assert_eq!(first.counter_text.as_deref(), Some("1 / 4"));
        assert!(!first.can_go_previous);
        assert!(first.can_go_next);
        assert_eq!(first.dot_count, 0);

        let last = coordinator.display(3);
        assert_eq!(last.counter_text.as_deref(), Some("4 / 4"));
        assert!(last.can_go_previous);
        assert!(!last.can_go_next);
    }

    #[test]
    fn test_dots_display() {
        let mut coordinator = IndicatorCoordinator::new();
        coordinator.apply(
            IndicatorState::derive(IndicatorStyle::DotsOverContent, 4, &metrics()),
            4,
        );
        let display = coordinator.display(2);
        assert_eq!(display.dot_count, 4);
        assert_eq!(display.selected_dot, 2);
        assert!(display.counter_text.is_none());
    }
}
