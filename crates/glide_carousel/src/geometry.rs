//! Page geometry
//!
//! A pure function of `(count, viewport, config, caption height)`. Both
//! layout strategies go through the same math: a custom `page_width` only
//! changes the effective page width, and margin/spacing apply either way.
//!
//! ```text
//!  margin   page 0    spacing   page 1    spacing   page 2   margin
//! |<---->|<-------->|<------>|<-------->|<------>|<-------->|<---->|
//!        x0 = margin          x1 = margin + (w + spacing)
//! ```
//!
//! Each page is an image frame, optionally followed by a caption row that is
//! the same height on every page (the tallest caption wins).

use glide_core::{Point, Rect, Size};

use crate::config::{CaptionStyle, CarouselConfig, ContentMode, IndicatorStyle};
use crate::indicator::reserved_height;
use crate::text_measure::TextMeasurer;

/// Tolerance for comparing scroll offsets
const OFFSET_EPSILON: f32 = 1e-3;

/// Frame of one page's image and caption
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub image: Rect,
    /// Present when any caption in the list is non-empty
    pub caption: Option<Rect>,
}

/// Frames of the arrow control, relative to the control's origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowFrames {
    pub control: Rect,
    pub previous: Rect,
    pub next: Rect,
    pub counter: Rect,
}

/// Where the indicator sits, in widget coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorFrame {
    None,
    Dots(Rect),
    Arrows(ArrowFrames),
}

/// Derived layout for one snapshot of inputs
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub viewport: Size,
    pub page_width: f32,
    pub margin: f32,
    pub spacing: f32,
    /// Scrollable content size
    pub content_extent: Size,
    pub indicator_reserved_height: f32,
    /// Tallest caption; shared by every caption slot
    pub caption_height: f32,
    /// Caption height plus its top padding, or 0 without captions
    pub caption_row_height: f32,
    pub indicator: IndicatorFrame,
    frames: Vec<CellFrame>,
}

/// Compute the layout for `count` pages
pub fn compute_layout(
    count: usize,
    viewport: Size,
    config: &CarouselConfig,
    caption_height: f32,
) -> Geometry {
    let layout = &config.layout;
    let page_width = layout.page_width.unwrap_or(viewport.width).max(0.0);
    let margin = layout.margin;
    let spacing = layout.spacing;

    let indicator_reserved_height =
        reserved_height(layout.indicator_style, count, &config.indicator);
    let scroll_height = (viewport.height - indicator_reserved_height).max(0.0);

    let caption_row_height = if caption_height > 0.0 {
        caption_height + config.caption.top_padding
    } else {
        0.0
    };
    let image_height = (scroll_height - caption_row_height).max(0.0);

    let content_width = if count == 0 {
        0.0
    } else {
        count as f32 * page_width + (count - 1) as f32 * spacing + 2.0 * margin
    };

    let inset = config.caption.inset;
    let frames = (0..count)
        .map(|i| {
            let x = margin + i as f32 * (page_width + spacing);
            let image = Rect::new(x, 0.0, page_width, image_height);
            let caption = (caption_row_height > 0.0).then(|| {
                Rect::new(
                    x + inset,
                    image_height + config.caption.top_padding,
                    (page_width - 2.0 * inset).max(0.0),
                    caption_height,
                )
            });
            CellFrame { image, caption }
        })
        .collect();

    let indicator = if count <= 1 {
        IndicatorFrame::None
    } else {
        indicator_frame(
            layout.indicator_style,
            viewport,
            scroll_height,
            caption_row_height,
            config,
        )
    };

    Geometry {
        viewport,
        page_width,
        margin,
        spacing,
        content_extent: Size::new(content_width, scroll_height),
        indicator_reserved_height,
        caption_height,
        caption_row_height,
        indicator,
        frames,
    }
}

fn indicator_frame(
    style: IndicatorStyle,
    viewport: Size,
    scroll_height: f32,
    caption_row_height: f32,
    config: &CarouselConfig,
) -> IndicatorFrame {
    let metrics = &config.indicator;
    match style {
        IndicatorStyle::None => IndicatorFrame::None,
        IndicatorStyle::DotsBelow => IndicatorFrame::Dots(Rect::new(
            0.0,
            viewport.height - metrics.dots_height,
            viewport.width,
            metrics.dots_height,
        )),
        IndicatorStyle::DotsOverContent => IndicatorFrame::Dots(Rect::new(
            0.0,
            scroll_height - caption_row_height - metrics.dots_offset_from_bottom,
            viewport.width,
            metrics.dots_height,
        )),
        IndicatorStyle::ArrowsBelow => {
            let h = metrics.arrows_height;
            let w = metrics.arrows_width;
            IndicatorFrame::Arrows(ArrowFrames {
                control: Rect::new((viewport.width - w) / 2.0, viewport.height - h, w, h),
                previous: Rect::new(0.0, 0.0, h, h),
                next: Rect::new(w - h, 0.0, h, h),
                counter: Rect::new(h, 0.0, (w - 2.0 * h).max(0.0), h),
            })
        }
    }
}

impl Geometry {
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[CellFrame] {
        &self.frames
    }

    /// Frame for `index`, or `None` past the end of the list
    pub fn frame_for(&self, index: usize) -> Option<CellFrame> {
        self.frames.get(index).copied()
    }

    /// The scroll surface's frame inside the widget
    pub fn scroll_area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport.width, self.content_extent.height)
    }

    /// Distance between the leading edges of adjacent pages
    pub fn page_stride(&self) -> f32 {
        self.page_width + self.spacing
    }

    /// Largest offset at which the content is still flush with the viewport
    pub fn max_offset(&self) -> f32 {
        (self.content_extent.width - self.viewport.width).max(0.0)
    }

    /// Offset at which page `index` is shown when scrolled to it
    ///
    /// The first page rests at 0 and the last flush with the end; pages in
    /// between are centered in the viewport. Indices past the end clamp.
    pub fn resting_offset(&self, index: usize) -> f32 {
        let count = self.count();
        if count == 0 || index == 0 {
            return 0.0;
        }
        if index >= count - 1 {
            return self.max_offset();
        }
        let centered = self.margin + index as f32 * self.page_stride()
            - (self.viewport.width - self.page_width) / 2.0;
        centered.clamp(0.0, self.max_offset())
    }

    /// Scroll point for [`Geometry::resting_offset`]
    pub fn resting_point(&self, index: usize) -> Point {
        Point::new(self.resting_offset(index), 0.0)
    }

    /// Page whose resting offset is nearest to `offset_x`
    ///
    /// Exact midpoints between two distinct resting offsets go to the
    /// higher page (round half up). Pages sharing a resting offset (content
    /// narrower than the viewport) keep `current` if it is one of them.
    pub fn nearest_page(&self, offset_x: f32, current: usize) -> usize {
        let count = self.count();
        if count <= 1 {
            return 0;
        }
        let last = count - 1;

        let stride = self.page_stride();
        let estimate = if stride > 0.0 {
            let lattice = (offset_x + (self.viewport.width - self.page_width) / 2.0 - self.margin)
                / stride;
            (lattice + 0.5).floor().clamp(0.0, last as f32) as usize
        } else {
            0
        };

        let mut candidates = [
            0,
            estimate.saturating_sub(1),
            estimate,
            (estimate + 1).min(last),
            last,
            current.min(last),
        ];
        candidates.sort_unstable();

        let mut best = candidates[0];
        let mut best_distance = (self.resting_offset(best) - offset_x).abs();
        for &candidate in &candidates[1..] {
            if candidate == best {
                continue;
            }
            let distance = (self.resting_offset(candidate) - offset_x).abs();
            if distance < best_distance - OFFSET_EPSILON {
                best = candidate;
                best_distance = distance;
            } else if distance <= best_distance + OFFSET_EPSILON {
                let same_offset = (self.resting_offset(candidate) - self.resting_offset(best))
                    .abs()
                    <= OFFSET_EPSILON;
                if !same_offset || candidate == current {
                    best = candidate;
                    best_distance = distance;
                }
            }
        }
        best
    }
}

/// Where a bitmap of `image` size is drawn inside `frame`
///
/// `Cover` and `Center` may extend past the frame; the host clips.
pub fn fit_content(mode: ContentMode, frame: Rect, image: Size) -> Rect {
    if image.is_empty() || mode == ContentMode::Fill {
        return frame;
    }

    let (width, height) = match mode {
        ContentMode::Contain | ContentMode::Cover => {
            let sx = frame.width() / image.width;
            let sy = frame.height() / image.height;
            let scale = if mode == ContentMode::Contain {
                sx.min(sy)
            } else {
                sx.max(sy)
            };
            (image.width * scale, image.height * scale)
        }
        ContentMode::Center | ContentMode::Fill => (image.width, image.height),
    };

    let center = frame.center();
    Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

/// Tallest non-empty caption among the first `count` entries
pub fn measure_caption_height(
    captions: &[String],
    count: usize,
    page_width: f32,
    style: &CaptionStyle,
    measurer: &dyn TextMeasurer,
) -> f32 {
    let width = (page_width - 2.0 * style.inset).max(0.0);
    captions
        .iter()
        .take(count)
        .filter(|caption| !caption.is_empty())
        .map(|caption| measurer.measure_height(caption, width, style.font_size, style.line_height))
        .fold(0.0, f32::max)
}

#[derive(Debug, Clone, PartialEq)]
struct CaptionKey {
    captions: Vec<String>,
    count: usize,
    page_width: f32,
    style: CaptionStyle,
}

/// Memo for [`measure_caption_height`], keyed on equality of its inputs
#[derive(Debug, Default)]
pub struct CaptionHeightCache {
    key: Option<CaptionKey>,
    height: f32,
    measurements: usize,
}

impl CaptionHeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(
        &mut self,
        captions: &[String],
        count: usize,
        page_width: f32,
        style: &CaptionStyle,
        measurer: &dyn TextMeasurer,
    ) -> f32 {
        let hit = self.key.as_ref().is_some_and(|key| {
            key.count == count
                && key.page_width == page_width
                && key.style == *style
                && key.captions == captions
        });
        if hit {
            return self.height;
        }

        self.height = measure_caption_height(captions, count, page_width, style, measurer);
        self.measurements += 1;
        self.key = Some(CaptionKey {
            captions: captions.to_vec(),
            count,
            page_width,
            style: *style,
        });
        self.height
    }

    /// How many times the measurer has actually been consulted
    pub fn measurements(&self) -> usize {
        self.measurements
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
