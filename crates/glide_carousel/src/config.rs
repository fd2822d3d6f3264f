//! Carousel configuration
//!
//! Everything a host can tune, grouped the way the engine consumes it.
//! Configs deserialize from TOML; every field has a default so a partial
//! file is enough:
//!
//! ```toml
//! [layout]
//! page_width = 280.0
//! spacing = 12.0
//! indicator_style = "arrows_below"
//!
//! [loading]
//! load_visible_only = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ============================================================================
// Enums
// ============================================================================

/// Page indicator presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStyle {
    /// No indicator
    None,
    /// Dots in a strip below the images (reserves height)
    #[default]
    DotsBelow,
    /// Dots drawn over the images (reserves nothing)
    DotsOverContent,
    /// Previous/next arrows around an "N / total" counter (reserves height)
    ArrowsBelow,
}

/// How a bitmap fits its cell frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    /// Fit entirely within the frame, keeping aspect ratio (may letterbox)
    #[default]
    Contain,
    /// Fill the frame, keeping aspect ratio (may crop)
    Cover,
    /// Stretch to the frame
    Fill,
    /// No scaling, centered
    Center,
}

// ============================================================================
// Sections
// ============================================================================

/// Page geometry inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Custom page width. `None` means one page per viewport.
    pub page_width: Option<f32>,
    /// Leading and trailing inset of the content
    pub margin: f32,
    /// Gap between adjacent pages
    pub spacing: f32,
    pub indicator_style: IndicatorStyle,
    pub content_mode: ContentMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: None,
            margin: 0.0,
            spacing: 0.0,
            indicator_style: IndicatorStyle::default(),
            content_mode: ContentMode::default(),
        }
    }
}

/// Image loading behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Only keep bitmaps for cells near the viewport
    pub load_visible_only: bool,
    /// Percent-encode sources before resolving them
    pub enable_encode_url: bool,
    /// Extra distance beyond each viewport edge that still counts as visible
    pub prefetch_distance: f32,
    /// Keep loaded bitmaps when their cell leaves the visible window
    pub retain_loaded: bool,
    /// Fade-in for bitmaps that did not come from the memory cache
    pub fade_duration_ms: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            load_visible_only: false,
            enable_encode_url: false,
            prefetch_distance: 0.0,
            retain_loaded: false,
            fade_duration_ms: 200,
        }
    }
}

impl LoadingConfig {
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}

/// Paging behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Page-at-a-time scrolling
    pub paging_enabled: bool,
    /// Snap released drags to the nearest page when native paging is off
    pub snap_enabled: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            paging_enabled: true,
            snap_enabled: false,
        }
    }
}

/// Fixed sizes of the indicator controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorMetrics {
    /// Gap between the scroll area and a below-content indicator
    pub top_padding: f32,
    pub dots_height: f32,
    /// Distance of over-content dots from the bottom of the images
    pub dots_offset_from_bottom: f32,
    pub arrows_height: f32,
    pub arrows_width: f32,
}

impl Default for IndicatorMetrics {
    fn default() -> Self {
        Self {
            top_padding: 5.0,
            dots_height: 20.0,
            dots_offset_from_bottom: 30.0,
            arrows_height: 30.0,
            arrows_width: 140.0,
        }
    }
}

/// Caption text style and placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    pub font_size: f32,
    /// Line height multiplier
    pub line_height: f32,
    /// Gap between the image and its caption
    pub top_padding: f32,
    /// Horizontal inset of the caption inside its page
    pub inset: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_height: 1.2,
            top_padding: 10.0,
            inset: 10.0,
        }
    }
}

// ============================================================================
// Carousel Config
// ============================================================================

/// Complete carousel configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub layout: LayoutConfig,
    pub loading: LoadingConfig,
    pub paging: PagingConfig,
    pub indicator: IndicatorMetrics,
    pub caption: CaptionStyle,
}

impl CarouselConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CarouselConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the geometry model cannot work with
    pub fn validate(&self) -> Result<()> {
        if let Some(width) = self.layout.page_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "page_width must be positive, got {width}"
                )));
            }
        }

        let non_negative = [
            ("margin", self.layout.margin),
            ("spacing", self.layout.spacing),
            ("prefetch_distance", self.loading.prefetch_distance),
            ("indicator.top_padding", self.indicator.top_padding),
            ("indicator.dots_height", self.indicator.dots_height),
            ("indicator.dots_offset_from_bottom", self.indicator.dots_offset_from_bottom),
            ("indicator.arrows_height", self.indicator.arrows_height),
            ("indicator.arrows_width", self.indicator.arrows_width),
            ("caption.top_padding", self.caption.top_padding),
            ("caption.inset", self.caption.inset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.caption.font_size) || !positive(self.caption.line_height) {
            return Err(ConfigError::Invalid(
                "caption font_size and line_height must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_page_width(mut self, width: Option<f32>) -> Self {
        self.layout.page_width = width;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.layout.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.layout.spacing = spacing;
        self
    }

    pub fn with_indicator_style(mut self, style: IndicatorStyle) -> Self {
        self.layout.indicator_style = style;
        self
    }

    pub fn with_content_mode(mut self, mode: ContentMode) -> Self {
        self.layout.content_mode = mode;
        self
    }

    pub fn with_load_visible_only(mut self, enabled: bool) -> Self {
        self.loading.load_visible_only = enabled;
        self
    }

    pub fn with_encode_url(mut self, enabled: bool) -> Self {
        self.loading.enable_encode_url = enabled;
        self
    }

    pub fn with_paging(mut self, enabled: bool) -> Self {
        self.paging.paging_enabled = enabled;
        self
    }

    pub fn with_snap(mut self, enabled: bool) -> Self {
        self.paging.snap_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarouselConfig::default();
        assert_eq!(config.layout.indicator_style, IndicatorStyle::DotsBelow);
        assert!(config.paging.paging_enabled);
        assert!(!config.loading.load_visible_only);
        assert_eq!(config.loading.fade_duration(), Duration::from_millis(200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = CarouselConfig::from_toml_str(
            r#"
            [layout]
            page_width = 280.0
            spacing = 12.0
            indicator_style = "arrows_below"

            [loading]
            load_visible_only = true
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.page_width, Some(280.0));
        assert_eq!(config.layout.spacing, 12.0);
        assert_eq!(config.layout.indicator_style, IndicatorStyle::ArrowsBelow);
        assert!(config.loading.load_visible_only);
        assert_eq!(config.caption, CaptionStyle::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = CarouselConfig::from_toml_str("[layout]\npage_width = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CarouselConfig::default().with_margin(-1.0).validate().unwrap_err();
        assert!(err.to_string().contains("margin"));
    }

    #[test]
    fn test_parse_error() {
        let err = CarouselConfig::from_toml_str("[layout]\nindicator_style = \"sideways\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CarouselConfig::load(Path::new("/nonexistent/glide.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
