//! Wave-pass events and the broadcast bus that carries them
//!
//! Every subscriber gets its own queue, so listeners observe events in
//! emission order and independently of each other. Dropping a subscription
//! unsubscribes it; the bus prunes dead queues on the next publish.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point of the wave crest in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveSample {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for WaveSample {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Shape of the wave at the moment it crested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveShape {
    #[serde(rename = "foamHeight")]
    pub foam_height: f32,
    pub samples: Vec<WaveSample>,
}

/// A wave-pass event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEvent {
    /// Strength of the pass, 0-1
    pub intensity: f32,
    pub wave: WaveShape,
}

impl WaveEvent {
    pub fn new(intensity: f32, foam_height: f32, samples: Vec<WaveSample>) -> Self {
        Self {
            intensity: intensity.clamp(0.0, 1.0),
            wave: WaveShape {
                foam_height,
                samples,
            },
        }
    }

    /// Mean crest height across samples (None when there are no samples)
    pub fn average_y(&self) -> Option<f32> {
        let samples = &self.wave.samples;
        if samples.is_empty() {
            return None;
        }
        let sum: f32 = samples.iter().map(|s| s.y).sum();
        Some(sum / samples.len() as f32)
    }

    pub fn foam_height(&self) -> f32 {
        self.wave.foam_height
    }
}

type Queue = RefCell<VecDeque<WaveEvent>>;

/// Broadcast channel for wave events
#[derive(Debug, Default)]
pub struct WaveBus {
    listeners: Vec<Weak<Queue>>,
    published: u64,
}

impl WaveBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener; it only sees events published after this call
    pub fn subscribe(&mut self) -> WaveSubscription {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.listeners.push(Rc::downgrade(&queue));
        WaveSubscription { queue }
    }

    /// Deliver an event to every live listener, returning how many received it
    pub fn publish(&mut self, event: &WaveEvent) -> usize {
        self.published += 1;
        self.listeners.retain(|weak| weak.strong_count() > 0);
        let mut delivered = 0;
        for weak in &self.listeners {
            if let Some(queue) = weak.upgrade() {
                queue.borrow_mut().push_back(event.clone());
                delivered += 1;
            }
        }
        log::debug!(
            "Wave event #{} (intensity {:.2}) delivered to {} listeners",
            self.published,
            event.intensity,
            delivered
        );
        delivered
    }

    /// Number of listeners still alive
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Total events published so far
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Forget all listeners (teardown)
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// Receiving end of a bus subscription
#[derive(Debug)]
pub struct WaveSubscription {
    queue: Rc<Queue>,
}

impl WaveSubscription {
    /// Take the oldest undelivered event
    pub fn poll(&self) -> Option<WaveEvent> {
        self.queue.borrow_mut().pop_front()
    }

    /// Take every undelivered event, oldest first
    pub fn drain(&self) -> Vec<WaveEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}
