//! Authoritative text store
//!
//! Owns the single text value. Every mutation reads the current text and
//! replaces it in one step, bumping the revision so derived state (line
//! layout) knows to rebuild.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::index;

use super::events::WaveEvent;
use super::schedule::TimerQueue;
use crate::consts::{STORE_MAX_STEPS, STORE_REMOVAL_RATE, STORE_STEP_SPACING_MS};
use crate::settings::StoreSettings;

/// A request to remove characters from the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionRequest {
    /// Remove these character indices (sorted descending)
    Indices(Vec<usize>),
    /// Remove the first `count` characters
    RemovePrefix { count: usize },
}

impl DeletionRequest {
    /// Build the cheapest request removing `indices`; None if there are none
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Option<Self> {
        let set: BTreeSet<usize> = indices.into_iter().collect();
        let last = *set.last()?;
        if set.first() == Some(&0) && last + 1 == set.len() {
            Some(DeletionRequest::RemovePrefix { count: set.len() })
        } else {
            Some(DeletionRequest::Indices(set.into_iter().rev().collect()))
        }
    }

    /// Apply to `text`, returning the shortened text
    pub fn apply_to(&self, text: &str) -> String {
        match self {
            DeletionRequest::RemovePrefix { count } => text.chars().skip(*count).collect(),
            DeletionRequest::Indices(indices) => {
                let mut chars: Vec<char> = text.chars().collect();
                let mut sorted = indices.clone();
                sorted.sort_unstable_by(|a, b| b.cmp(a));
                sorted.dedup();
                for i in sorted {
                    if i < chars.len() {
                        chars.remove(i);
                    }
                }
                chars.into_iter().collect()
            }
        }
    }

    /// Indices this request removes from a text of `len` chars, ascending
    pub fn indices(&self, len: usize) -> Vec<usize> {
        match self {
            DeletionRequest::RemovePrefix { count } => (0..(*count).min(len)).collect(),
            DeletionRequest::Indices(indices) => {
                let set: BTreeSet<usize> = indices.iter().copied().filter(|&i| i < len).collect();
                set.into_iter().collect()
            }
        }
    }

    /// Number of indices named by the request
    pub fn len(&self) -> usize {
        match self {
            DeletionRequest::Indices(indices) => indices.len(),
            DeletionRequest::RemovePrefix { count } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pick `max(1, floor(len * intensity * rate))` distinct random positions of
/// a `len`-char text; None when the text is empty
pub fn erode_randomly<R: Rng + ?Sized>(
    len: usize,
    intensity: f32,
    rng: &mut R,
) -> Option<DeletionRequest> {
    if len == 0 {
        return None;
    }
    let remove = ((len as f32 * intensity * STORE_REMOVAL_RATE).floor() as usize).clamp(1, len);
    DeletionRequest::from_indices(index::sample(rng, len, remove))
}

/// The text store
#[derive(Debug, Clone)]
pub struct TextStore {
    text: String,
    revision: u64,
    random_erosion: bool,
    /// Scheduled random-erosion steps, carrying the wave intensity
    erosion_steps: TimerQueue<f32>,
}

impl TextStore {
    pub fn new(settings: &StoreSettings) -> Self {
        Self {
            text: String::new(),
            revision: 0,
            random_erosion: settings.random_erosion,
            erosion_steps: TimerQueue::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Bumped on every change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text (user input); returns true if it changed
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        self.revision += 1;
        true
    }

    /// Apply a deletion request; returns true if the text changed
    pub fn apply(&mut self, request: Option<&DeletionRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        if request.is_empty() {
            return false;
        }
        let next = request.apply_to(&self.text);
        log::debug!(
            "Deletion {:?} took text from {} to {} chars",
            request,
            self.char_len(),
            next.chars().count()
        );
        self.set_text(next)
    }

    /// Schedule the staggered random erosion for a wave
    pub fn on_wave_event(&mut self, event: &WaveEvent, now_ms: f64) {
        if !self.random_erosion {
            return;
        }
        let intensity = event.intensity;
        let steps = ((STORE_MAX_STEPS * intensity).floor() as usize).max(1);
        for i in 0..steps {
            self.erosion_steps
                .schedule(now_ms + i as f64 * STORE_STEP_SPACING_MS, intensity);
        }
    }

    /// Run any erosion steps that are due; returns the requests applied, in order
    pub fn step<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> Vec<DeletionRequest> {
        let mut applied = Vec::new();
        for intensity in self.erosion_steps.drain_due(now_ms) {
            let Some(request) = erode_randomly(self.char_len(), intensity, rng) else {
                continue;
            };
            if self.apply(Some(&request)) {
                applied.push(request);
            }
        }
        applied
    }

    /// Erosion steps still waiting to run
    pub fn pending_steps(&self) -> usize {
        self.erosion_steps.len()
    }

    /// Cancel scheduled erosion
    pub fn teardown(&mut self) {
        self.erosion_steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::WaveSample;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn store(text: &str) -> TextStore {
        let mut s = TextStore::new(&StoreSettings::default());
        s.set_text(text);
        s
    }

    fn wave(intensity: f32) -> WaveEvent {
        WaveEvent::new(intensity, 75.0, vec![WaveSample { x: 0.0, y: 0.0 }])
    }

    #[test]
    fn test_index_deletion_is_order_independent() {
        for order in [vec![2, 4, 0], vec![0, 2, 4], vec![4, 0, 2]] {
            let mut s = store("hello");
            assert!(s.apply(Some(&DeletionRequest::Indices(order))));
            assert_eq!(s.text(), "el");
        }
    }

    #[test]
    fn test_out_of_range_and_duplicate_indices_ignored() {
        let mut s = store("hello");
        s.apply(Some(&DeletionRequest::Indices(vec![9, 1, 1])));
        assert_eq!(s.text(), "hllo");
    }

    #[test]
    fn test_remove_prefix() {
        let mut s = store("abcdef");
        s.apply(Some(&DeletionRequest::RemovePrefix { count: 4 }));
        assert_eq!(s.text(), "ef");
        // Count beyond the end empties the text
        s.apply(Some(&DeletionRequest::RemovePrefix { count: 10 }));
        assert_eq!(s.text(), "");
    }

    #[test]
    fn test_absent_or_empty_request_is_noop() {
        let mut s = store("abc");
        let rev = s.revision();
        assert!(!s.apply(None));
        assert!(!s.apply(Some(&DeletionRequest::Indices(Vec::new()))));
        assert!(!s.apply(Some(&DeletionRequest::RemovePrefix { count: 0 })));
        assert_eq!(s.revision(), rev);
    }

    #[test]
    fn test_from_indices_detects_prefix() {
        assert_eq!(
            DeletionRequest::from_indices([2, 0, 1]),
            Some(DeletionRequest::RemovePrefix { count: 3 })
        );
        assert_eq!(
            DeletionRequest::from_indices([7, 8, 9]),
            Some(DeletionRequest::Indices(vec![9, 8, 7]))
        );
        assert_eq!(
            DeletionRequest::from_indices([0, 2]),
            Some(DeletionRequest::Indices(vec![2, 0]))
        );
        assert_eq!(DeletionRequest::from_indices(Vec::new()), None);
    }

    #[test]
    fn test_multibyte_indices_are_chars() {
        let mut s = store("波のそば");
        s.apply(Some(&DeletionRequest::Indices(vec![1])));
        assert_eq!(s.text(), "波そば");
        assert_eq!(s.char_len(), 3);
    }

    #[test]
    fn test_wave_schedules_staggered_steps() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut s = store(&"x".repeat(200));

        // floor(3 * 0.9) = 2 steps at +0 and +180ms
        s.on_wave_event(&wave(0.9), 1000.0);
        assert_eq!(s.pending_steps(), 2);

        let applied = s.step(1000.0, &mut rng);
        // floor(200 * 0.9 * 0.03) = 5 removed
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].len(), 5);
        assert_eq!(s.char_len(), 195);
        assert!(s.step(1179.0, &mut rng).is_empty());
        assert_eq!(s.step(1180.0, &mut rng).len(), 1);
        assert_eq!(s.char_len(), 190);
        assert_eq!(s.pending_steps(), 0);
    }

    #[test]
    fn test_weak_wave_still_removes_one() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut s = store("abc");
        s.on_wave_event(&wave(0.1), 0.0);
        assert_eq!(s.pending_steps(), 1);
        s.step(0.0, &mut rng);
        assert_eq!(s.char_len(), 2);
    }

    #[test]
    fn test_erosion_on_empty_text_is_noop() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut s = store("");
        s.on_wave_event(&wave(1.0), 0.0);
        assert!(s.step(1_000.0, &mut rng).is_empty());
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn test_random_erosion_can_be_disabled() {
        let mut s = TextStore::new(&StoreSettings {
            random_erosion: false,
        });
        s.set_text("abc");
        s.on_wave_event(&wave(1.0), 0.0);
        assert_eq!(s.pending_steps(), 0);
    }

    #[test]
    fn test_teardown_cancels_steps() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut s = store("abcdef");
        s.on_wave_event(&wave(1.0), 0.0);
        s.teardown();
        assert!(s.step(10_000.0, &mut rng).is_empty());
        assert_eq!(s.text(), "abcdef");
    }

    #[test]
    fn test_request_indices_are_ascending_and_in_range() {
        let request = DeletionRequest::Indices(vec![9, 4, 1, 4]);
        assert_eq!(request.indices(6), vec![1, 4]);
        assert_eq!(DeletionRequest::RemovePrefix { count: 5 }.indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn test_erode_randomly_picks_distinct_positions() {
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(erode_randomly(0, 1.0, &mut rng), None);
        // floor(150 * 1.0 * 0.03) = 4
        let request = erode_randomly(150, 1.0, &mut rng).expect("non-empty text");
        let picked = request.indices(150);
        assert_eq!(picked.len(), 4);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #[test]
        fn prop_prefix_equals_explicit_indices(text in "\\PC{0,40}", k in 0usize..50) {
            let len = text.chars().count();
            let k = k.min(len);
            let by_prefix = DeletionRequest::RemovePrefix { count: k }.apply_to(&text);
            let by_indices = DeletionRequest::Indices((0..k).collect()).apply_to(&text);
            let expected: String = text.chars().skip(k).collect();
            prop_assert_eq!(&by_prefix, &expected);
            prop_assert_eq!(&by_indices, &expected);
        }

        #[test]
        fn prop_index_order_does_not_matter(
            text in "[a-z]{1,30}",
            mut indices in proptest::collection::vec(0usize..30, 0..10),
        ) {
            let forward = DeletionRequest::Indices(indices.clone()).apply_to(&text);
            indices.reverse();
            let backward = DeletionRequest::Indices(indices).apply_to(&text);
            prop_assert_eq!(forward, backward);
        }
    }
}
