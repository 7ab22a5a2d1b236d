//! Line layout for the text overlay
//!
//! Partitions the text into lines that mirror what the host textarea shows.
//! Each line owns a contiguous range of character indices; together the
//! ranges cover the text exactly once, in order. Newlines (and a carriage
//! return before them) belong to the line they end but are never drawn.

use std::ops::Range;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::TextMeasurer;

/// How text is broken into lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WrapPolicy {
    /// Break before the character that would overflow the content width
    #[default]
    Measured,
    /// Break every N characters
    FixedCount(usize),
}

/// Computed style values of the host input, as CSS strings
#[derive(Debug, Clone, Copy, Default)]
pub struct CssBox<'a> {
    pub font_size: &'a str,
    pub font_family: &'a str,
    pub padding_left: &'a str,
    pub padding_top: &'a str,
    pub padding_right: &'a str,
    pub line_height: &'a str,
}

/// Rendering metrics of the host input surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMetrics {
    /// CSS font shorthand, e.g. "16px serif"
    pub font: String,
    pub padding_left: f32,
    pub padding_top: f32,
    pub padding_right: f32,
    pub line_height: f32,
    /// Client box size (padding included)
    pub width: f32,
    pub height: f32,
    /// Top-left of the surface in page coordinates
    pub origin: Vec2,
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            font: "16px sans-serif".to_string(),
            padding_left: 16.0,
            padding_top: 12.0,
            padding_right: 16.0,
            line_height: 16.0 * 1.6,
            width: 320.0,
            height: 240.0,
            origin: Vec2::ZERO,
        }
    }
}

impl SurfaceMetrics {
    /// Build metrics from computed CSS, falling back like the browser would
    pub fn from_css(css: &CssBox<'_>, width: f32, height: f32, origin: Vec2) -> Self {
        let font_size = parse_px(css.font_size).unwrap_or(16.0);
        let family = if css.font_family.trim().is_empty() {
            "sans-serif"
        } else {
            css.font_family.trim()
        };
        Self {
            font: format!("{}px {}", font_size, family),
            padding_left: parse_px(css.padding_left).unwrap_or(16.0),
            padding_top: parse_px(css.padding_top).unwrap_or(12.0),
            padding_right: parse_px(css.padding_right).unwrap_or(16.0),
            // "normal" line-height has no pixel value
            line_height: parse_px(css.line_height).unwrap_or(font_size * 1.6),
            width,
            height,
            origin,
        }
    }

    /// Width available to text
    pub fn content_width(&self) -> f32 {
        (self.width - self.padding_left - self.padding_right).max(0.0)
    }
}

/// Parse a CSS pixel length ("12px", "12.5", " 3px ")
pub fn parse_px(value: &str) -> Option<f32> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v).trim();
    v.parse::<f32>().ok().filter(|n| n.is_finite())
}

/// One laid-out line of text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// First character index covered by this line
    pub start_index: usize,
    /// Number of characters covered (terminators included)
    pub length: usize,
    /// Characters to draw
    pub text: String,
    /// Baseline position in surface coordinates
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub fading: bool,
}

impl Line {
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.length
    }

    pub fn end_index(&self) -> usize {
        self.start_index + self.length
    }

    /// Baseline height in page coordinates
    pub fn page_y(&self, origin: Vec2) -> f32 {
        origin.y + self.y
    }
}

/// Partition `text` into lines for the given surface
pub fn layout_lines(
    text: &str,
    metrics: &SurfaceMetrics,
    policy: WrapPolicy,
    measurer: &dyn TextMeasurer,
) -> Vec<Line> {
    let chars: Vec<char> = text.chars().collect();
    let max_width = metrics.content_width();

    let mut lines = Vec::new();
    let mut push_line = |start: usize, end: usize, shown: &mut String| {
        let row = lines.len();
        lines.push(Line {
            start_index: start,
            length: end - start,
            text: std::mem::take(shown),
            x: metrics.padding_left,
            y: metrics.padding_top + (row + 1) as f32 * metrics.line_height,
            opacity: 1.0,
            fading: false,
        });
    };

    let mut start = 0;
    let mut shown = String::new();
    let mut count = 0;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\n' => {
                push_line(start, i + 1, &mut shown);
                start = i + 1;
                count = 0;
                continue;
            }
            '\r' => continue,
            _ => {}
        }

        let overflow = match policy {
            WrapPolicy::FixedCount(n) => count >= n.max(1),
            WrapPolicy::Measured => {
                if count == 0 {
                    false
                } else {
                    shown.push(c);
                    let too_wide = measurer.measure(&shown) > max_width;
                    shown.pop();
                    too_wide
                }
            }
        };
        if overflow {
            push_line(start, i, &mut shown);
            start = i;
            count = 0;
        }
        shown.push(c);
        count += 1;
    }
    push_line(start, chars.len(), &mut shown);

    lines
}
