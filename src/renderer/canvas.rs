//! Browser canvas backend (WASM only)
//!
//! Sizes the backing store by the device pixel ratio and scales the context so
//! all drawing happens in CSS pixels.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Canvas2d, TextMeasurer, css_color};
use crate::settings::Rgba;

/// A 2D canvas context sized in CSS pixels
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    css_width: f32,
    css_height: f32,
}

impl WebCanvas {
    /// Wrap a canvas element; None if it has no 2D context
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let _ = ctx.set_text_baseline("alphabetic");
        Some(Self {
            canvas,
            ctx,
            css_width: 0.0,
            css_height: 0.0,
        })
    }

    /// Resize the backing store for the given CSS size and pixel ratio
    pub fn resize(&mut self, css_width: f32, css_height: f32, dpr: f64) {
        self.css_width = css_width;
        self.css_height = css_height;
        self.canvas.set_width((css_width as f64 * dpr).round() as u32);
        self.canvas.set_height((css_height as f64 * dpr).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", css_width));
        let _ = style.set_property("height", &format!("{}px", css_height));
        // Resizing resets context state, so the scale goes back on every time
        if self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).is_err() {
            log::warn!("Failed to scale canvas context");
        }
        let _ = self.ctx.set_text_baseline("alphabetic");
    }

    pub fn set_font(&self, font: &str) {
        self.ctx.set_font(font);
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn css_size(&self) -> (f32, f32) {
        (self.css_width, self.css_height)
    }
}

impl Canvas2d for WebCanvas {
    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.css_width as f64, self.css_height as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, color: Rgba, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        self.ctx.set_fill_style_str(&css_color(color));
        if self
            .ctx
            .fill_text(text, pos.x as f64, pos.y as f64)
            .is_err()
        {
            log::warn!("fillText failed");
        }
        self.ctx.set_global_alpha(1.0);
    }
}

impl TextMeasurer for WebCanvas {
    fn measure(&self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }
}
