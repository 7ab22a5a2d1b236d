//! Canvas 2D rendering module
//!
//! The simulation draws through the [`Canvas2d`] trait and measures text
//! through [`TextMeasurer`]. The browser build backs both with a
//! `CanvasRenderingContext2d`; native runs and tests use the recording and
//! monospace implementations here.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;
use unicode_width::UnicodeWidthChar;

use crate::settings::Rgba;

/// Minimal 2D drawing surface
pub trait Canvas2d {
    /// Clear the whole surface to transparent
    fn clear(&mut self);
    /// Fill a closed polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    /// Draw text with its alphabetic baseline at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, color: Rgba, alpha: f32);
}

/// Rendered-width oracle for line wrapping
pub trait TextMeasurer {
    /// Width of `text` in CSS pixels
    fn measure(&self, text: &str) -> f32;
}

/// Fixed-advance measurer; wide (CJK) characters take two columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Width of one column (px)
    pub advance: f32,
}

impl MonospaceMeasurer {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        // 16px monospace is roughly 9.6px per column
        Self::new(9.6)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str) -> f32 {
        let columns: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
        columns as f32 * self.advance
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Polygon { points: Vec<Vec2>, color: Rgba },
    Text { text: String, pos: Vec2, color: Rgba, alpha: f32 },
}

/// Canvas that records commands instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text commands since the last clear
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32)> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|c| match c {
            DrawCommand::Text { text, alpha, .. } => Some((text.as_str(), *alpha)),
            _ => None,
        })
    }

    /// Polygon commands since the last clear
    pub fn polygons(&self) -> impl Iterator<Item = (&[Vec2], Rgba)> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|c| match c {
            DrawCommand::Polygon { points, color } => Some((points.as_slice(), *color)),
            _ => None,
        })
    }

    /// Drop recorded commands, returning how many there were
    pub fn reset(&mut self) -> usize {
        let count = self.commands.len();
        self.commands.clear();
        count
    }
}

impl Canvas2d for RecordingCanvas {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, color: Rgba, alpha: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            color,
            alpha,
        });
    }
}

/// CSS color string for an RGBA tuple
pub fn css_color(color: Rgba) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        color[0],
        color[1],
        color[2],
        color[3] as f32 / 255.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_measures_columns() {
        let m = MonospaceMeasurer::new(10.0);
        assert_eq!(m.measure(""), 0.0);
        assert_eq!(m.measure("abc"), 30.0);
        // Wide CJK characters take two columns
        assert_eq!(m.measure("波"), 20.0);
    }

    #[test]
    fn test_recording_views_reset_on_clear() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_text("old", Vec2::ZERO, [0, 0, 0, 255], 1.0);
        canvas.clear();
        canvas.fill_polygon(&[Vec2::ZERO, Vec2::X, Vec2::Y], [255, 255, 255, 255]);
        canvas.fill_text("new", Vec2::new(16.0, 40.0), [0, 0, 0, 255], 0.5);

        let texts: Vec<_> = canvas.texts().collect();
        assert_eq!(texts, vec![("new", 0.5)]);
        assert_eq!(canvas.polygons().count(), 1);
    }

    #[test]
    fn test_reset_counts_and_drops_commands() {
        let mut canvas = RecordingCanvas::new();
        canvas.clear();
        canvas.fill_text("tide", Vec2::ZERO, [0, 0, 0, 255], 1.0);
        assert_eq!(canvas.reset(), 2);
        assert!(canvas.commands.is_empty());
        assert_eq!(canvas.reset(), 0);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color([65, 137, 232, 180]), "rgba(65, 137, 232, 0.706)");
        assert_eq!(css_color([255, 255, 255, 255]), "rgba(255, 255, 255, 1.000)");
    }
}
