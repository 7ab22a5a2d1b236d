//! Text overlay: laid-out lines, their fade animations and erosion reports
//!
//! The overlay is the single owner of line state. A wave event marks one or
//! two lines as fading; each frame advances their opacity, and once every
//! line of a wave has faded and the settle delay has passed, the wave's
//! character ranges are reported as one deletion request.
//!
//! A user edit rebuilds the lines from scratch and drops in-flight fades and
//! unreported waves. Deletions (random erosion, settled reports) are followed
//! in place while any wave is in flight: each line keeps its row and is shifted
//! past the removed characters, so reported indices always refer to the
//! current text. The full relayout waits until every wave has settled.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::WaveEvent;
use super::layout::{Line, SurfaceMetrics, layout_lines};
use super::store::DeletionRequest;
use crate::consts::LINE_MATCH_SLACK;
use crate::lerp;
use crate::renderer::{Canvas2d, TextMeasurer};
use crate::settings::OverlaySettings;

/// How many lines a wave erodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum LineCountRule {
    /// Coin flip between one and two
    #[default]
    Random,
    /// Two when the wave is stronger than `threshold`, else one
    Intensity { threshold: f32 },
}

/// An active fade on one line
#[derive(Debug, Clone)]
struct Fade {
    line: usize,
    start_ms: f64,
    duration_ms: f64,
    wave: u64,
}

/// Erosion started by one wave event
#[derive(Debug, Clone)]
struct Erosion {
    id: u64,
    settle_at_ms: f64,
    /// Lines of this wave still fading
    outstanding: usize,
    /// Character indices of lines that finished fading
    pending: BTreeSet<usize>,
}

/// Line layout plus erosion state for the input surface
#[derive(Debug, Clone)]
pub struct Overlay {
    settings: OverlaySettings,
    metrics: Option<SurfaceMetrics>,
    text: String,
    lines: Vec<Line>,
    fades: Vec<Fade>,
    erosions: Vec<Erosion>,
    next_wave: u64,
    /// Lines were shifted in place and need a full relayout once idle
    stale: bool,
    layouts: u64,
}

impl Overlay {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            settings,
            metrics: None,
            text: String::new(),
            lines: Vec::new(),
            fades: Vec::new(),
            erosions: Vec::new(),
            next_wave: 1,
            stale: false,
            layouts: 0,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn metrics(&self) -> Option<&SurfaceMetrics> {
        self.metrics.as_ref()
    }

    /// Lines currently fading (including fully faded, unreported ones)
    pub fn fading_count(&self) -> usize {
        self.lines.iter().filter(|l| l.fading).count()
    }

    /// Waves whose deletion has not been reported yet
    pub fn unreported_waves(&self) -> usize {
        self.erosions.len()
    }

    /// Number of full layouts run so far
    pub fn layout_count(&self) -> u64 {
        self.layouts
    }

    /// No fade running and no wave waiting to report
    pub fn is_idle(&self) -> bool {
        self.fades.is_empty() && self.erosions.is_empty()
    }

    /// Replace the surface metrics and lay out again
    pub fn set_metrics(&mut self, metrics: Option<SurfaceMetrics>, measurer: &dyn TextMeasurer) {
        self.metrics = metrics;
        self.relayout(measurer);
    }

    /// Replace the text and lay out again
    pub fn set_text(&mut self, text: &str, measurer: &dyn TextMeasurer) {
        self.text.clear();
        self.text.push_str(text);
        self.relayout(measurer);
    }

    /// Replace metrics and text together with a single layout
    pub fn set_surface(
        &mut self,
        metrics: Option<SurfaceMetrics>,
        text: &str,
        measurer: &dyn TextMeasurer,
    ) {
        self.metrics = metrics;
        self.text.clear();
        self.text.push_str(text);
        self.relayout(measurer);
    }

    /// Rebuild every line; fade state does not survive
    pub fn relayout(&mut self, measurer: &dyn TextMeasurer) {
        self.fades.clear();
        self.erosions.clear();
        self.stale = false;
        self.layouts += 1;
        self.lines = match &self.metrics {
            Some(metrics) => layout_lines(&self.text, metrics, self.settings.wrap, measurer),
            None => Vec::new(),
        };
    }

    /// Follow a deletion that was applied to the text
    ///
    /// When idle the lines are simply rebuilt. Otherwise every line is shifted
    /// past the removed characters; a fade whose line became empty is dropped
    /// and unreported ranges lose the removed indices.
    pub fn apply_deletion(&mut self, request: &DeletionRequest, measurer: &dyn TextMeasurer) {
        let removed = request.indices(self.text.chars().count());
        if removed.is_empty() {
            return;
        }
        self.text = request.apply_to(&self.text);
        if self.is_idle() {
            self.relayout(measurer);
            return;
        }

        let chars: Vec<char> = self.text.chars().collect();
        for line in &mut self.lines {
            let start = shift_past(&removed, line.start_index);
            let end = shift_past(&removed, line.end_index());
            line.start_index = start;
            line.length = end - start;
            line.text = chars
                .get(start..end)
                .unwrap_or_default()
                .iter()
                .filter(|&&c| c != '\n' && c != '\r')
                .collect();
        }

        let lines = &self.lines;
        let erosions = &mut self.erosions;
        self.fades.retain(|fade| {
            if lines.get(fade.line).is_some_and(|l| l.length > 0) {
                return true;
            }
            if let Some(erosion) = erosions.iter_mut().find(|e| e.id == fade.wave) {
                erosion.outstanding = erosion.outstanding.saturating_sub(1);
            }
            false
        });
        for erosion in &mut self.erosions {
            erosion.pending = erosion
                .pending
                .iter()
                .filter(|&&i| removed.binary_search(&i).is_err())
                .map(|&i| shift_past(&removed, i))
                .collect();
        }
        self.stale = true;
        log::debug!("Shifted lines past {} removed chars", removed.len());
    }

    /// Run the deferred relayout once every wave has settled
    pub fn refresh(&mut self, measurer: &dyn TextMeasurer) {
        if self.stale && self.is_idle() {
            self.relayout(measurer);
        }
    }

    /// Index of the line the wave lands on
    fn target_line(&self, event: &WaveEvent) -> Option<usize> {
        let avg_y = event.average_y()?;
        let origin = self.metrics.as_ref()?.origin;
        let foam = event.foam_height();
        let hit = self.lines.iter().position(|ln| {
            let y = ln.page_y(origin);
            y >= avg_y - LINE_MATCH_SLACK && y <= avg_y + foam
        });
        Some(hit.unwrap_or(0))
    }

    fn lines_to_erode<R: Rng + ?Sized>(&self, intensity: f32, rng: &mut R) -> usize {
        let count = match self.settings.line_count {
            LineCountRule::Random => {
                if rng.random_bool(0.5) {
                    1
                } else {
                    2
                }
            }
            LineCountRule::Intensity { threshold } => {
                if intensity > threshold {
                    2
                } else {
                    1
                }
            }
        };
        count.min(self.settings.max_lines.max(1))
    }

    /// Start eroding lines for a wave; returns how many lines began fading
    pub fn apply_wave_event<R: Rng + ?Sized>(
        &mut self,
        event: &WaveEvent,
        now_ms: f64,
        rng: &mut R,
    ) -> usize {
        if self.lines.is_empty() {
            log::debug!("Wave ignored: no layout yet");
            return 0;
        }
        let Some(target) = self.target_line(event) else {
            log::debug!("Wave ignored: no samples");
            return 0;
        };

        // Walk upward from the target, skipping lines already on their way out
        let count = self.lines_to_erode(event.intensity, rng);
        let mut selected: Vec<usize> = Vec::with_capacity(count);
        for i in 0..count {
            let idx = target.saturating_sub(i);
            if !selected.contains(&idx) && !self.lines[idx].fading {
                selected.push(idx);
            }
        }
        if selected.is_empty() {
            return 0;
        }

        let wave = self.next_wave;
        self.next_wave += 1;
        for &line in &selected {
            self.lines[line].fading = true;
            let delay = rng.random::<f64>() * self.settings.max_start_delay_ms;
            let duration = lerp(
                self.settings.fade_min_ms as f32,
                self.settings.fade_max_ms as f32,
                rng.random::<f32>(),
            ) as f64;
            self.fades.push(Fade {
                line,
                start_ms: now_ms + delay,
                duration_ms: duration.max(1.0),
                wave,
            });
        }
        self.erosions.push(Erosion {
            id: wave,
            settle_at_ms: now_ms + self.settings.settle_ms,
            outstanding: selected.len(),
            pending: BTreeSet::new(),
        });

        log::debug!(
            "Wave {} (intensity {:.2}) eroding lines {:?} from target {}",
            wave,
            event.intensity,
            selected,
            target
        );
        selected.len()
    }

    /// Advance fades by one frame; waves settling together report as one request
    pub fn step(&mut self, now_ms: f64) -> Option<DeletionRequest> {
        let lines = &mut self.lines;
        let erosions = &mut self.erosions;
        self.fades.retain(|fade| {
            let t = (now_ms - fade.start_ms) / fade.duration_ms;
            let opacity = (1.0 - t).clamp(0.0, 1.0) as f32;
            let Some(line) = lines.get_mut(fade.line) else {
                return false;
            };
            line.opacity = opacity;
            if opacity > 0.0 {
                return true;
            }
            if let Some(erosion) = erosions.iter_mut().find(|e| e.id == fade.wave) {
                erosion.pending.extend(line.range());
                erosion.outstanding = erosion.outstanding.saturating_sub(1);
            }
            false
        });

        let mut settled = BTreeSet::new();
        let mut waves = Vec::new();
        self.erosions.retain(|erosion| {
            if erosion.outstanding > 0 || now_ms < erosion.settle_at_ms {
                return true;
            }
            settled.extend(erosion.pending.iter().copied());
            waves.push(erosion.id);
            false
        });
        let request = DeletionRequest::from_indices(settled)?;
        log::debug!("Waves {:?} settled: {:?}", waves, request);
        Some(request)
    }

    /// Draw every line at its current opacity
    pub fn render(&self, canvas: &mut dyn Canvas2d) {
        canvas.clear();
        if self.metrics.is_none() {
            return;
        }
        for line in &self.lines {
            if line.text.is_empty() || line.opacity <= 0.0 {
                continue;
            }
            canvas.fill_text(
                &line.text,
                glam::Vec2::new(line.x, line.y),
                self.settings.text_color,
                line.opacity,
            );
        }
    }

    /// Drop all animation state (teardown)
    pub fn teardown(&mut self) {
        self.fades.clear();
        self.erosions.clear();
    }
}

/// Position of index `i` once the ascending `removed` indices are gone
fn shift_past(removed: &[usize], i: usize) -> usize {
    i - removed.partition_point(|&r| r < i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{MonospaceMeasurer, RecordingCanvas};
    use crate::sim::events::WaveSample;
    use crate::sim::layout::WrapPolicy;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const M: MonospaceMeasurer = MonospaceMeasurer { advance: 10.0 };

    /// Lines at page y = 100 + 20 * (row + 1)
    fn overlay(text: &str, line_count: LineCountRule) -> Overlay {
        let settings = OverlaySettings {
            wrap: WrapPolicy::FixedCount(4),
            line_count,
            ..Default::default()
        };
        let mut o = Overlay::new(settings);
        let metrics = SurfaceMetrics {
            padding_top: 0.0,
            line_height: 20.0,
            origin: Vec2::new(0.0, 100.0),
            ..Default::default()
        };
        o.set_metrics(Some(metrics), &M);
        o.set_text(text, &M);
        o
    }

    fn wave_at(y: f32, intensity: f32) -> WaveEvent {
        WaveEvent::new(
            intensity,
            30.0,
            vec![WaveSample { x: 0.0, y: y - 5.0 }, WaveSample { x: 30.0, y: y + 5.0 }],
        )
    }

    fn two_lines() -> LineCountRule {
        LineCountRule::Intensity { threshold: 0.0 }
    }

    fn one_line() -> LineCountRule {
        LineCountRule::Intensity { threshold: 1.0 }
    }

    /// Like `overlay` but with fixed 100ms fades that start immediately
    fn quick_overlay(text: &str, line_count: LineCountRule) -> Overlay {
        let settings = OverlaySettings {
            wrap: WrapPolicy::FixedCount(4),
            line_count,
            fade_min_ms: 100.0,
            fade_max_ms: 100.0,
            max_start_delay_ms: 0.0,
            ..Default::default()
        };
        let mut o = Overlay::new(settings);
        let metrics = SurfaceMetrics {
            padding_top: 0.0,
            line_height: 20.0,
            origin: Vec2::new(0.0, 100.0),
            ..Default::default()
        };
        o.set_surface(Some(metrics), text, &M);
        o
    }

    fn run_until_report(o: &mut Overlay, from_ms: f64) -> (f64, Option<DeletionRequest>) {
        let mut now = from_ms;
        for _ in 0..200 {
            now += 16.0;
            if let Some(report) = o.step(now) {
                return (now, Some(report));
            }
        }
        (now, None)
    }

    #[test]
    fn test_empty_samples_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut o = overlay("aaaabbbbcccc", two_lines());
        let ev = WaveEvent::new(0.9, 30.0, Vec::new());
        assert_eq!(o.apply_wave_event(&ev, 0.0, &mut rng), 0);
        assert_eq!(o.fading_count(), 0);
        assert!(o.step(5_000.0).is_none());
    }

    #[test]
    fn test_no_layout_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut o = Overlay::new(OverlaySettings::default());
        o.set_text("hello", &M);
        assert!(o.lines().is_empty());
        assert_eq!(o.apply_wave_event(&wave_at(120.0, 0.9), 0.0, &mut rng), 0);
    }

    #[test]
    fn test_targets_line_under_foam_and_walks_upward() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Rows at page y 120, 140, 160
        let mut o = overlay("aaaabbbbcccc", two_lines());
        // avg 155, band [145, 185] holds the third row
        assert_eq!(o.apply_wave_event(&wave_at(155.0, 0.9), 0.0, &mut rng), 2);
        let fading: Vec<bool> = o.lines().iter().map(|l| l.fading).collect();
        assert_eq!(fading, vec![false, true, true]);
    }

    #[test]
    fn test_falls_back_to_first_line() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut o = overlay("aaaabbbbcccc", two_lines());
        // Two lines requested but both walk to line 0; it is only taken once
        assert_eq!(o.apply_wave_event(&wave_at(900.0, 0.9), 0.0, &mut rng), 1);
        assert!(o.lines()[0].fading);
        assert_eq!(o.fading_count(), 1);
    }

    #[test]
    fn test_fade_then_prefix_report() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = overlay("aaaabbbbcccc", one_line());
        assert_eq!(o.apply_wave_event(&wave_at(900.0, 0.5), 0.0, &mut rng), 1);

        // Halfway through, the line is partially transparent
        o.step(500.0);
        let mid = o.lines()[0].opacity;
        assert!(mid > 0.0 && mid < 1.0);

        let (_, report) = run_until_report(&mut o, 500.0);
        assert_eq!(report, Some(DeletionRequest::RemovePrefix { count: 4 }));
        assert_eq!(o.lines()[0].opacity, 0.0);
        assert_eq!(o.unreported_waves(), 0);
    }

    #[test]
    fn test_inner_lines_report_descending_indices() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = overlay("aaaabbbbcccc", two_lines());
        o.apply_wave_event(&wave_at(155.0, 0.9), 0.0, &mut rng);
        let (_, report) = run_until_report(&mut o, 0.0);
        assert_eq!(
            report,
            Some(DeletionRequest::Indices((4..12).rev().collect::<Vec<usize>>()))
        );
    }

    #[test]
    fn test_report_waits_for_settle_delay() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut settings = OverlaySettings {
            wrap: WrapPolicy::FixedCount(4),
            line_count: one_line(),
            fade_min_ms: 100.0,
            fade_max_ms: 100.0,
            max_start_delay_ms: 0.0,
            ..Default::default()
        };
        settings.settle_ms = 900.0;
        let mut o = Overlay::new(settings);
        o.set_metrics(Some(SurfaceMetrics::default()), &M);
        o.set_text("abcd", &M);

        o.apply_wave_event(&wave_at(-500.0, 0.5), 0.0, &mut rng);
        assert!(o.step(150.0).is_none());
        assert_eq!(o.lines()[0].opacity, 0.0);
        assert!(o.step(899.0).is_none());
        assert!(o.step(900.0).is_some());
    }

    #[test]
    fn test_late_fade_is_still_reported_once() {
        let mut rng = Pcg32::seed_from_u64(3);
        let settings = OverlaySettings {
            wrap: WrapPolicy::FixedCount(4),
            line_count: one_line(),
            fade_min_ms: 1_100.0,
            fade_max_ms: 1_100.0,
            max_start_delay_ms: 0.0,
            ..Default::default()
        };
        let mut o = Overlay::new(settings);
        o.set_metrics(Some(SurfaceMetrics::default()), &M);
        o.set_text("abcdefgh", &M);

        o.apply_wave_event(&wave_at(-500.0, 0.5), 0.0, &mut rng);
        // Past the settle delay but still fading
        assert!(o.step(950.0).is_none());
        assert_eq!(o.step(1_100.0), Some(DeletionRequest::RemovePrefix { count: 4 }));
        assert!(o.step(5_000.0).is_none());
    }

    #[test]
    fn test_rapid_waves_respect_per_wave_cap() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut o = overlay("aaaabbbbccccddddeeee", two_lines());
        // Rows at page y 120..200; band for avg 195 is [185, 225] -> row 4
        assert_eq!(o.apply_wave_event(&wave_at(195.0, 0.9), 0.0, &mut rng), 2);
        assert_eq!(o.fading_count(), 2);
        // Same target again: rows 4 and 3 are already fading
        assert_eq!(o.apply_wave_event(&wave_at(195.0, 0.9), 10.0, &mut rng), 0);
        // A wave two rows up takes the next free pair
        assert_eq!(o.apply_wave_event(&wave_at(155.0, 0.9), 20.0, &mut rng), 2);
        assert_eq!(o.fading_count(), 4);
        assert_eq!(o.unreported_waves(), 2);
    }

    #[test]
    fn test_every_faded_line_reported_exactly_once() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut o = overlay("aaaabbbbccccddddeeee", LineCountRule::Random);
        o.apply_wave_event(&wave_at(195.0, 0.9), 0.0, &mut rng);
        o.apply_wave_event(&wave_at(155.0, 0.9), 40.0, &mut rng);

        let mut reported: Vec<usize> = Vec::new();
        let mut now = 0.0;
        while now < 3_000.0 {
            now += 16.0;
            if let Some(report) = o.step(now) {
                reported.extend(report.indices(20));
            }
        }
        let mut expected: Vec<usize> = o
            .lines()
            .iter()
            .filter(|l| l.fading)
            .flat_map(|l| l.range())
            .collect();
        reported.sort_unstable();
        expected.sort_unstable();
        assert_eq!(reported, expected);
    }

    #[test]
    fn test_text_change_discards_fades() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = overlay("aaaabbbbcccc", two_lines());
        o.apply_wave_event(&wave_at(155.0, 0.9), 0.0, &mut rng);
        o.step(400.0);

        o.set_text("aaaabbbbccc", &M);
        assert_eq!(o.fading_count(), 0);
        assert!(o.lines().iter().all(|l| l.opacity == 1.0));
        assert!(o.step(5_000.0).is_none());
    }

    #[test]
    fn test_waves_settling_together_report_once() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = quick_overlay("aaaabbbbcccc", one_line());
        // One wave falls back to the first row, the other lands on the third
        assert_eq!(o.apply_wave_event(&wave_at(900.0, 0.5), 0.0, &mut rng), 1);
        assert_eq!(o.apply_wave_event(&wave_at(155.0, 0.5), 0.0, &mut rng), 1);

        assert!(o.step(899.0).is_none());
        let report = o.step(900.0).expect("both waves settled");
        assert_eq!(report, DeletionRequest::Indices(vec![11, 10, 9, 8, 3, 2, 1, 0]));
        assert_eq!(report.apply_to("aaaabbbbcccc"), "bbbb");
        assert_eq!(o.unreported_waves(), 0);
    }

    #[test]
    fn test_deletion_while_fading_keeps_the_fade() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = quick_overlay("aaaabbbbcccc", one_line());
        o.apply_wave_event(&wave_at(155.0, 0.5), 0.0, &mut rng);
        let layouts = o.layout_count();

        o.apply_deletion(&DeletionRequest::Indices(vec![0]), &M);
        assert_eq!(o.layout_count(), layouts);
        assert_eq!(o.fading_count(), 1);
        let texts: Vec<&str> = o.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["aaa", "bbbb", "cccc"]);
        assert_eq!(o.lines()[2].range(), 7..11);

        let (_, report) = run_until_report(&mut o, 0.0);
        assert_eq!(report, Some(DeletionRequest::Indices(vec![10, 9, 8, 7])));
    }

    #[test]
    fn test_deletion_inside_faded_line_shrinks_its_report() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = quick_overlay("aaaabbbbcccc", one_line());
        o.apply_wave_event(&wave_at(900.0, 0.5), 0.0, &mut rng);
        // Faded out, waiting for the settle delay
        assert!(o.step(200.0).is_none());

        o.apply_deletion(&DeletionRequest::Indices(vec![1]), &M);
        assert_eq!(o.step(900.0), Some(DeletionRequest::RemovePrefix { count: 3 }));
    }

    #[test]
    fn test_emptied_line_drops_its_fade() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = quick_overlay("aaaabbbbcccc", one_line());
        o.apply_wave_event(&wave_at(900.0, 0.5), 0.0, &mut rng);

        o.apply_deletion(&DeletionRequest::RemovePrefix { count: 4 }, &M);
        assert_eq!(o.lines()[0].length, 0);
        assert!(o.step(900.0).is_none());
        assert_eq!(o.unreported_waves(), 0);

        // Settled: the deferred relayout reflows what is left
        o.refresh(&M);
        let texts: Vec<&str> = o.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["bbbb", "cccc"]);
        assert_eq!(o.fading_count(), 0);
    }

    #[test]
    fn test_idle_deletion_relayouts_at_once() {
        let mut o = quick_overlay("aaaabbbbcccc", one_line());
        let layouts = o.layout_count();
        o.apply_deletion(&DeletionRequest::RemovePrefix { count: 2 }, &M);
        assert_eq!(o.layout_count(), layouts + 1);
        let texts: Vec<&str> = o.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["aabb", "bbcc", "cc"]);
    }

    #[test]
    fn test_set_surface_lays_out_once() {
        let mut o = Overlay::new(OverlaySettings::default());
        o.set_surface(Some(SurfaceMetrics::default()), "hello", &M);
        assert_eq!(o.layout_count(), 1);
        assert_eq!(o.lines()[0].text, "hello");
    }

    #[test]
    fn test_render_uses_opacity() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = overlay("aaaabbbb", one_line());
        o.apply_wave_event(&wave_at(900.0, 0.5), 0.0, &mut rng);
        o.step(600.0);

        let mut canvas = RecordingCanvas::new();
        o.render(&mut canvas);
        let drawn: Vec<_> = canvas.texts().collect();
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].0, "aaaa");
        assert!(drawn[0].1 < 1.0);
        assert_eq!(drawn[1], ("bbbb", 1.0));
    }
}
