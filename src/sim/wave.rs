//! Procedural wave
//!
//! Two phases drive the animation: a fast one for the sinusoid silhouette and
//! a slow one that walks through Perlin noise to make the whole wave rise and
//! fall. On a fixed cadence the current crest is broadcast as a wave event.

use glam::Vec2;
use noise::{NoiseFn, Perlin};

use super::events::{WaveEvent, WaveSample};
use crate::consts::*;
use crate::map_range;
use crate::renderer::Canvas2d;
use crate::settings::WaveSettings;

/// Off-axis coordinate for 1-D sampling of 2-D noise
const NOISE_ROW: f64 = 0.37;

/// Wave simulator state
#[derive(Clone)]
pub struct WaveSimulator {
    settings: WaveSettings,
    /// Viewport width in CSS pixels
    width: f32,
    /// Canvas top-left in page coordinates
    origin: Vec2,
    fast_phase: f32,
    slow_phase: f64,
    perlin: Perlin,
    /// Crest polyline for the current frame (canvas coordinates)
    polyline: Vec<Vec2>,
    /// Swell noise sampled for the current frame, 0-1
    swell: f32,
    last_emit_ms: Option<f64>,
    frames: u64,
}

impl WaveSimulator {
    pub fn new(settings: WaveSettings, width: f32, origin: Vec2, seed: u32) -> Self {
        Self {
            settings,
            width: width.max(0.0),
            origin,
            fast_phase: 0.0,
            slow_phase: 0.0,
            perlin: Perlin::new(seed),
            polyline: Vec::new(),
            swell: 0.5,
            last_emit_ms: None,
            frames: 0,
        }
    }

    /// Viewport resized; the polyline is rebuilt on the next frame
    pub fn resize(&mut self, width: f32, origin: Vec2) {
        self.width = width.max(0.0);
        self.origin = origin;
        self.polyline.clear();
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.settings.canvas_height
    }

    pub fn polyline(&self) -> &[Vec2] {
        &self.polyline
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Noise value at the current slow phase, 0-1
    fn sample_swell(&self) -> f32 {
        let n = self.perlin.get([self.slow_phase, NOISE_ROW]);
        ((n * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
    }

    /// Crest height at `x` for the given baseline
    fn crest_y(&self, baseline: f32, x: f32) -> f32 {
        baseline
            + (x * PRIMARY_WAVENUMBER + self.fast_phase).sin() * PRIMARY_AMPLITUDE
            + (x * SECONDARY_WAVENUMBER + self.fast_phase * SECONDARY_PHASE_RATIO).sin()
                * SECONDARY_AMPLITUDE
    }

    fn rebuild_polyline(&mut self) {
        let amplitude = self.settings.amplitude;
        let offset = map_range(self.swell, 0.0, 1.0, -amplitude, amplitude);
        let baseline = self.settings.canvas_height / 2.0 + WAVE_BASELINE_DROP + offset;

        let count = (self.width / WAVE_STEP_PX).floor() as usize + 1;
        let mut polyline = std::mem::take(&mut self.polyline);
        polyline.clear();
        polyline.extend((0..count).map(|i| {
            let x = i as f32 * WAVE_STEP_PX;
            Vec2::new(x, self.crest_y(baseline, x))
        }));
        self.polyline = polyline;
    }

    /// Advance one frame; returns an event when the emission interval has elapsed
    pub fn step(&mut self, now_ms: f64) -> Option<WaveEvent> {
        self.frames += 1;
        self.swell = self.sample_swell();
        if self.width > 0.0 {
            self.rebuild_polyline();
        } else {
            self.polyline.clear();
        }

        self.fast_phase += FAST_PHASE_STEP;
        self.slow_phase += SLOW_PHASE_STEP;

        let last = *self.last_emit_ms.get_or_insert(now_ms);
        if now_ms - last <= self.settings.emit_interval_ms || self.polyline.is_empty() {
            return None;
        }
        self.last_emit_ms = Some(now_ms);
        Some(self.build_event())
    }

    fn build_event(&self) -> WaveEvent {
        let intensity = map_range(
            self.swell,
            0.0,
            1.0,
            self.settings.intensity_min,
            self.settings.intensity_max,
        );
        let samples: Vec<WaveSample> = self
            .polyline
            .iter()
            .step_by(WAVE_SAMPLE_STRIDE)
            .map(|p| WaveSample::from(*p + self.origin))
            .collect();
        log::info!(
            "Wave crest at frame {} (intensity {:.2}, {} samples)",
            self.frames,
            intensity,
            samples.len()
        );
        WaveEvent::new(intensity, self.settings.foam_height, samples)
    }

    /// Foam band polygon: crest left to right, then back along its lower edge
    pub fn foam_polygon(&self) -> Vec<Vec2> {
        let foam = Vec2::new(0.0, self.settings.foam_height);
        self.polyline
            .iter()
            .copied()
            .chain(self.polyline.iter().rev().map(|p| *p + foam))
            .collect()
    }

    /// Sea body polygon: from the top edge down to the crest
    pub fn body_polygon(&self) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.polyline.len() + 2);
        points.push(Vec2::ZERO);
        points.extend_from_slice(&self.polyline);
        points.push(Vec2::new(self.width, 0.0));
        points
    }

    /// Draw the current frame
    pub fn render(&self, canvas: &mut dyn Canvas2d) {
        canvas.clear();
        if self.polyline.is_empty() {
            return;
        }
        canvas.fill_polygon(&self.foam_polygon(), self.settings.foam_color);
        canvas.fill_polygon(&self.body_polygon(), self.settings.body_color);
    }
}
