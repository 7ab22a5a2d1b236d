//! Page settings and tuning
//!
//! Persisted as JSON in LocalStorage so a visitor's tide choice survives reloads.

use serde::{Deserialize, Serialize};

use crate::sim::{LineCountRule, WrapPolicy};

/// RGBA color with 8-bit channels
pub type Rgba = [u8; 4];

/// How often the wave crests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TidePreset {
    Calm,
    Steady,
    #[default]
    Lively,
}

impl TidePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TidePreset::Calm => "Calm",
            TidePreset::Steady => "Steady",
            TidePreset::Lively => "Lively",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calm" => Some(TidePreset::Calm),
            "steady" => Some(TidePreset::Steady),
            "lively" | "rough" => Some(TidePreset::Lively),
            _ => None,
        }
    }

    /// Interval between wave-pass events (ms)
    pub fn emit_interval_ms(&self) -> f64 {
        match self {
            TidePreset::Calm => 7000.0,
            TidePreset::Steady => 5500.0,
            TidePreset::Lively => 4000.0,
        }
    }
}

/// Wave simulator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    /// Canvas height in CSS pixels
    pub canvas_height: f32,
    /// Maximum vertical drift of the swell (px)
    pub amplitude: f32,
    /// Thickness of the foam band (px)
    pub foam_height: f32,
    /// Interval between wave-pass events (ms)
    pub emit_interval_ms: f64,
    /// Intensity range the swell position maps into
    pub intensity_min: f32,
    pub intensity_max: f32,
    /// Seed for the swell noise
    pub noise_seed: u32,
    pub foam_color: Rgba,
    pub body_color: Rgba,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            canvas_height: crate::consts::WAVE_CANVAS_HEIGHT,
            amplitude: 220.0,
            foam_height: 75.0,
            emit_interval_ms: TidePreset::Lively.emit_interval_ms(),
            intensity_min: 0.4,
            intensity_max: 1.0,
            noise_seed: 0,
            foam_color: [255, 255, 255, 255],
            body_color: [65, 137, 232, 180],
        }
    }
}

/// Text overlay (layout + erosion) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub wrap: WrapPolicy,
    pub line_count: LineCountRule,
    /// Hard cap on lines faded per wave
    pub max_lines: usize,
    /// Fade duration range (ms)
    pub fade_min_ms: f64,
    pub fade_max_ms: f64,
    /// Maximum random start delay per line (ms)
    pub max_start_delay_ms: f64,
    /// Delay from trigger until the deletion report (ms)
    pub settle_ms: f64,
    pub text_color: Rgba,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            wrap: WrapPolicy::Measured,
            line_count: LineCountRule::Random,
            max_lines: 2,
            fade_min_ms: 700.0,
            fade_max_ms: 1100.0,
            max_start_delay_ms: 120.0,
            settle_ms: 900.0,
            text_color: [51, 51, 51, 255],
        }
    }
}

/// Text store tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Scatter random character removals on every wave
    pub random_erosion: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            random_erosion: true,
        }
    }
}

/// All page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub preset: TidePreset,
    pub wave: WaveSettings,
    pub overlay: OverlaySettings,
    pub store: StoreSettings,
}

impl Settings {
    /// Create settings from a tide preset
    pub fn from_preset(preset: TidePreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a tide preset (updates the emission cadence)
    pub fn apply_preset(&mut self, preset: TidePreset) {
        self.preset = preset;
        self.wave.emit_interval_ms = preset.emit_interval_ms();
    }

    /// Parse settings JSON, clamping anything out of range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Clamp values into ranges the simulation can work with
    pub fn sanitize(&mut self) {
        let wave = &mut self.wave;
        wave.canvas_height = wave.canvas_height.max(1.0);
        wave.amplitude = wave.amplitude.max(0.0);
        wave.foam_height = wave.foam_height.max(0.0);
        wave.emit_interval_ms = wave.emit_interval_ms.max(250.0);
        wave.intensity_min = wave.intensity_min.clamp(0.0, 1.0);
        wave.intensity_max = wave.intensity_max.clamp(wave.intensity_min, 1.0);

        let overlay = &mut self.overlay;
        overlay.max_lines = overlay.max_lines.clamp(1, 2);
        overlay.fade_min_ms = overlay.fade_min_ms.max(1.0);
        overlay.fade_max_ms = overlay.fade_max_ms.max(overlay.fade_min_ms);
        overlay.max_start_delay_ms = overlay.max_start_delay_ms.max(0.0);
        overlay.settle_ms = overlay.settle_ms.max(0.0);
        if let WrapPolicy::FixedCount(n) = overlay.wrap {
            overlay.wrap = WrapPolicy::FixedCount(n.max(1));
        }
        if let LineCountRule::Intensity { threshold } = overlay.line_count {
            overlay.line_count = LineCountRule::Intensity {
                threshold: threshold.clamp(0.0, 1.0),
            };
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shoreline_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::info!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
