//! Text measurement for captions
//!
//! The carousel never lays out text itself. It asks a [`TextMeasurer`] how
//! tall a caption is at a given width and reserves that much space. Hosts
//! plug in their real text engine; [`EstimatedTextMeasurer`] is a
//! deterministic stand-in for tests and headless use.

/// Text layout options that affect measurement
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayoutOptions {
    /// Line height multiplier (1.0 = font size)
    pub line_height: f32,
    /// Maximum width for wrapping (None = no wrapping)
    pub max_width: Option<f32>,
    /// Font family name (None for the host default)
    pub font_name: Option<String>,
}

impl Default for TextLayoutOptions {
    fn default() -> Self {
        Self {
            line_height: 1.2,
            max_width: None,
            font_name: None,
        }
    }
}

impl TextLayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = height;
        self
    }

    pub fn with_max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }
}

/// Text measurement result
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Width of the widest line
    pub width: f32,
    /// Total height of all lines
    pub height: f32,
    pub line_count: u32,
}

/// Trait for measuring text dimensions
pub trait TextMeasurer: Send + Sync {
    /// Measure `text` with full layout options
    fn measure_with_options(
        &self,
        text: &str,
        font_size: f32,
        options: &TextLayoutOptions,
    ) -> TextMetrics;

    /// Height of `text` wrapped at `width`
    fn measure_height(&self, text: &str, width: f32, font_size: f32, line_height: f32) -> f32 {
        let options = TextLayoutOptions::new()
            .with_line_height(line_height)
            .with_max_width(width);
        self.measure_with_options(text, font_size, &options).height
    }
}

/// Fixed-advance measurer with greedy word wrapping
///
/// Every character advances `font_size * advance_factor`. Words wider than
/// the wrap width are broken between characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasurer {
    pub advance_factor: f32,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self {
            advance_factor: 0.5,
        }
    }
}

impl EstimatedTextMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width and line count of a single paragraph
    fn wrap_paragraph(&self, paragraph: &str, advance: f32, max_width: Option<f32>) -> (f32, u32) {
        let Some(max_width) = max_width else {
            return (paragraph.chars().count() as f32 * advance, 1);
        };
        // At least one character per line, however narrow the box
        let max_chars = ((max_width / advance).floor() as usize).max(1);

        let mut lines = 1u32;
        let mut widest = 0usize;
        let mut line_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word_len = word.chars().count();

            if line_len > 0 && line_len + 1 + word_len <= max_chars {
                line_len += 1 + word_len;
                continue;
            }
            if line_len > 0 {
                widest = widest.max(line_len);
                lines += 1;
            }
            while word_len > max_chars {
                widest = max_chars;
                lines += 1;
                word_len -= max_chars;
            }
            line_len = word_len;
        }
        widest = widest.max(line_len);

        (widest as f32 * advance, lines)
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure_with_options(
        &self,
        text: &str,
        font_size: f32,
        options: &TextLayoutOptions,
    ) -> TextMetrics {
        if text.trim().is_empty() {
            return TextMetrics::default();
        }

        let advance = font_size * self.advance_factor;
        let mut width: f32 = 0.0;
        let mut line_count = 0;
        for paragraph in text.lines() {
            let (w, lines) = self.wrap_paragraph(paragraph, advance, options.max_width);
            width = width.max(w);
            line_count += lines;
        }

        TextMetrics {
            width,
            height: line_count as f32 * font_size * options.line_height,
            line_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_height() {
        let m = EstimatedTextMeasurer::new();
        assert_eq!(m.measure_height("", 100.0, 14.0, 1.2), 0.0);
        assert_eq!(m.measure_height("   ", 100.0, 14.0, 1.2), 0.0);
    }

    #[test]
    fn test_single_line() {
        let m = EstimatedTextMeasurer::new();
        let metrics = m.measure_with_options(
            "short",
            14.0,
            &TextLayoutOptions::new().with_max_width(200.0),
        );
        assert_eq!(metrics.line_count, 1);
        assert_eq!(metrics.width, 35.0);
    }

    #[test]
    fn test_word_wrap() {
        let m = EstimatedTextMeasurer::new();
        // 7px per char, 28 chars per line at 200px
        let metrics = m.measure_with_options(
            "a very long caption that wraps to two lines",
            14.0,
            &TextLayoutOptions::new().with_max_width(200.0),
        );
        assert_eq!(metrics.line_count, 2);
        assert_eq!(metrics.width, 24.0 * 7.0);
    }

    #[test]
    fn test_long_word_breaks() {
        let m = EstimatedTextMeasurer::new();
        // 10 chars per line
        let metrics = m.measure_with_options(
            "abcdefghijklmnopqrstuvwxy",
            14.0,
            &TextLayoutOptions::new().with_max_width(70.0),
        );
        assert_eq!(metrics.line_count, 3);
    }

    #[test]
    fn test_explicit_newlines() {
        let m = EstimatedTextMeasurer::new();
        let metrics = m.measure_with_options("one\ntwo", 10.0, &TextLayoutOptions::new());
        assert_eq!(metrics.line_count, 2);
        assert_eq!(metrics.height, 2.0 * 10.0 * 1.2);
    }
}
