//! Shoreline - an animated wave that erodes the text you type
//!
//! Core modules:
//! - `sim`: Deterministic simulation (wave, line layout, erosion, text store)
//! - `renderer`: Canvas 2D drawing and text measurement abstraction
//! - `page`: Page controller wiring the simulation to a host surface
//! - `settings`: Tunable configuration persisted in LocalStorage

pub mod page;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use page::Page;
pub use settings::{Settings, TidePreset};

/// Page configuration constants
pub mod consts {
    /// Nominal frame duration (ms) used by headless runs
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Wave canvas height in CSS pixels
    pub const WAVE_CANVAS_HEIGHT: f32 = 400.0;
    /// Baseline sits this far below the canvas midline
    pub const WAVE_BASELINE_DROP: f32 = 60.0;
    /// Horizontal polyline step (px)
    pub const WAVE_STEP_PX: f32 = 5.0;
    /// Every Nth polyline point is sent with a wave event
    pub const WAVE_SAMPLE_STRIDE: usize = 6;

    /// Fast phase increment per frame (silhouette)
    pub const FAST_PHASE_STEP: f32 = 0.03;
    /// Slow phase increment per frame (swell drift)
    pub const SLOW_PHASE_STEP: f64 = 0.005;

    /// Primary and secondary sinusoid layers
    pub const PRIMARY_AMPLITUDE: f32 = 25.0;
    pub const PRIMARY_WAVENUMBER: f32 = 0.015;
    pub const SECONDARY_AMPLITUDE: f32 = 8.0;
    pub const SECONDARY_WAVENUMBER: f32 = 0.04;
    /// Secondary layer runs this much faster than the primary
    pub const SECONDARY_PHASE_RATIO: f32 = 1.6;

    /// Tolerance above the averaged wave line when matching a text line (px)
    pub const LINE_MATCH_SLACK: f32 = 10.0;

    /// Delay between random-erosion steps (ms)
    pub const STORE_STEP_SPACING_MS: f64 = 180.0;
    /// Fraction of the text removed per step at full intensity
    pub const STORE_REMOVAL_RATE: f32 = 0.03;
    /// Maximum number of random-erosion steps per wave
    pub const STORE_MAX_STEPS: f32 = 3.0;
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]`
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if (in_max - in_min).abs() < f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
