//! Deterministic simulation module
//!
//! All page behavior lives here. This module must stay deterministic:
//! - Time comes in as frame timestamps, never read from a clock
//! - Randomness comes from an injected, seedable RNG
//! - Drawing only through the `renderer` traits

pub mod events;
pub mod layout;
pub mod overlay;
pub mod schedule;
pub mod store;
pub mod wave;

pub use events::{WaveBus, WaveEvent, WaveSample, WaveShape, WaveSubscription};
pub use layout::{CssBox, Line, SurfaceMetrics, WrapPolicy, layout_lines, parse_px};
pub use overlay::{LineCountRule, Overlay};
pub use schedule::TimerQueue;
pub use store::{DeletionRequest, TextStore, erode_randomly};
pub use wave::WaveSimulator;
