//! Page controller
//!
//! Owns the simulation pieces and drives them one frame at a time:
//! wave -> bus -> (store, overlay) -> deletions -> store -> relayout.
//! The host (browser glue or a headless run) supplies timestamps, a text
//! measurer and canvases.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::renderer::{Canvas2d, TextMeasurer};
use crate::settings::Settings;
use crate::sim::{
    DeletionRequest, Overlay, SurfaceMetrics, TextStore, WaveBus, WaveEvent, WaveSimulator,
    WaveSubscription,
};

/// What happened during one frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Event emitted by the wave this frame
    pub wave_event: Option<WaveEvent>,
    /// Deletion reported by the overlay and applied this frame
    pub deletion: Option<DeletionRequest>,
    /// The text changed (host should update its input control)
    pub text_changed: bool,
}

/// The page: wave, overlay and text store wired together
pub struct Page {
    settings: Settings,
    rng: Pcg32,
    bus: WaveBus,
    wave: WaveSimulator,
    overlay: Overlay,
    store: TextStore,
    overlay_events: WaveSubscription,
    store_events: WaveSubscription,
    /// Store revision the overlay was last laid out for
    laid_out: Option<u64>,
    torn_down: bool,
}

impl Page {
    /// Create a page for a viewport of `width` CSS pixels
    pub fn new(
        settings: Settings,
        width: f32,
        wave_origin: Vec2,
        metrics: Option<SurfaceMetrics>,
        measurer: &dyn TextMeasurer,
        seed: u64,
    ) -> Self {
        let mut bus = WaveBus::new();
        let store_events = bus.subscribe();
        let overlay_events = bus.subscribe();

        let noise_seed = (seed ^ (seed >> 32)) as u32 ^ settings.wave.noise_seed;
        let wave = WaveSimulator::new(settings.wave.clone(), width, wave_origin, noise_seed);
        let mut overlay = Overlay::new(settings.overlay.clone());
        overlay.set_metrics(metrics, measurer);
        let store = TextStore::new(&settings.store);

        log::info!(
            "Page created (seed {}, tide {}, wrap {:?})",
            seed,
            settings.preset.as_str(),
            settings.overlay.wrap
        );

        Self {
            rng: Pcg32::seed_from_u64(seed),
            settings,
            bus,
            wave,
            overlay,
            store,
            overlay_events,
            store_events,
            laid_out: None,
            torn_down: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn text(&self) -> &str {
        self.store.text()
    }

    pub fn wave(&self) -> &WaveSimulator {
        &self.wave
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn store(&self) -> &TextStore {
        &self.store
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Add a listener for wave events (e.g. to re-broadcast them)
    pub fn subscribe(&mut self) -> WaveSubscription {
        self.bus.subscribe()
    }

    /// Lay the overlay out again if the text moved on since the last layout
    fn sync_layout(&mut self, measurer: &dyn TextMeasurer) {
        let revision = self.store.revision();
        if self.laid_out != Some(revision) {
            self.overlay.set_text(self.store.text(), measurer);
            self.laid_out = Some(revision);
        }
    }

    /// Text typed by the user
    pub fn set_text(&mut self, text: &str, measurer: &dyn TextMeasurer) -> bool {
        if self.torn_down {
            return false;
        }
        let changed = self.store.set_text(text);
        self.sync_layout(measurer);
        changed
    }

    /// Carry deletions already applied to the store over to the overlay
    ///
    /// `from_revision` is the store revision before the first of them. If the
    /// overlay was not laid out for it, fall back to a full relayout.
    fn follow_deletions(
        &mut self,
        requests: &[DeletionRequest],
        from_revision: u64,
        measurer: &dyn TextMeasurer,
    ) {
        if requests.is_empty() {
            return;
        }
        if self.laid_out != Some(from_revision) {
            self.sync_layout(measurer);
            return;
        }
        for request in requests {
            self.overlay.apply_deletion(request, measurer);
        }
        self.laid_out = Some(self.store.revision());
    }

    /// Apply a deletion request directly
    pub fn apply_deletion(
        &mut self,
        request: Option<&DeletionRequest>,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(request) = request else {
            return false;
        };
        let revision = self.store.revision();
        let changed = self.store.apply(Some(request));
        if changed {
            self.follow_deletions(std::slice::from_ref(request), revision, measurer);
        }
        changed
    }

    /// Host surface re-measured (resize, font load)
    pub fn set_metrics(&mut self, metrics: Option<SurfaceMetrics>, measurer: &dyn TextMeasurer) {
        if self.torn_down {
            return;
        }
        self.overlay.set_surface(metrics, self.store.text(), measurer);
        self.laid_out = Some(self.store.revision());
    }

    /// Viewport resized
    pub fn resize_viewport(&mut self, width: f32, wave_origin: Vec2) {
        if self.torn_down {
            return;
        }
        log::debug!("Viewport resized to {}px", width);
        self.wave.resize(width, wave_origin);
    }

    /// Advance everything by one frame
    pub fn frame(&mut self, now_ms: f64, measurer: &dyn TextMeasurer) -> FrameReport {
        let mut report = FrameReport::default();
        if self.torn_down {
            return report;
        }
        let start_revision = self.store.revision();

        if let Some(event) = self.wave.step(now_ms) {
            self.bus.publish(&event);
            report.wave_event = Some(event);
        }

        for event in self.store_events.drain() {
            self.store.on_wave_event(&event, now_ms);
        }
        for event in self.overlay_events.drain() {
            self.overlay.apply_wave_event(&event, now_ms, &mut self.rng);
        }

        // Random erosion shifts the lines in place; running fades survive it
        let revision = self.store.revision();
        let eroded = self.store.step(now_ms, &mut self.rng);
        self.follow_deletions(&eroded, revision, measurer);

        if let Some(request) = self.overlay.step(now_ms) {
            let revision = self.store.revision();
            if self.store.apply(Some(&request)) {
                self.follow_deletions(std::slice::from_ref(&request), revision, measurer);
            }
            report.deletion = Some(request);
        }
        self.overlay.refresh(measurer);
        self.sync_layout(measurer);

        report.text_changed = self.store.revision() != start_revision;
        report
    }

    pub fn render_wave(&self, canvas: &mut dyn Canvas2d) {
        if self.torn_down {
            return;
        }
        self.wave.render(canvas);
    }

    pub fn render_overlay(&self, canvas: &mut dyn Canvas2d) {
        if self.torn_down {
            return;
        }
        self.overlay.render(canvas);
    }

    /// Cancel all timers, fades and listeners; later frames do nothing
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.bus.clear();
        self.store.teardown();
        self.overlay.teardown();
        log::info!("Page torn down");
    }
}
