//! Fire-once timers driven by the frame clock
//!
//! Timers are stored with their due time and handed back, in due order, the
//! first frame whose timestamp reaches them. Timers due at the same instant
//! fire in the order they were scheduled.

/// A pending timer
#[derive(Debug, Clone)]
struct Timer<T> {
    due_ms: f64,
    seq: u64,
    payload: T,
}

/// Queue of fire-once timers
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        // Keep sorted by (due, seq) so draining is a prefix split
        let pos = self
            .timers
            .partition_point(|t| (t.due_ms, t.seq) <= (due_ms, seq));
        self.timers.insert(
            pos,
            Timer {
                due_ms,
                seq,
                payload,
            },
        );
    }

    /// Remove and return every timer due at or before `now_ms`
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let split = self.timers.partition_point(|t| t.due_ms <= now_ms);
        self.timers.drain(..split).map(|t| t.payload).collect()
    }

    /// Earliest due time, if any
    pub fn next_due(&self) -> Option<f64> {
        self.timers.first().map(|t| t.due_ms)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(360.0, "third");
        q.schedule(0.0, "first");
        q.schedule(180.0, "second");

        assert_eq!(q.next_due(), Some(0.0));
        assert_eq!(q.drain_due(200.0), vec!["first", "second"]);
        assert_eq!(q.len(), 1);
        assert!(q.drain_due(359.9).is_empty());
        assert_eq!(q.drain_due(360.0), vec!["third"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_keep_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(100.0, 1);
        q.schedule(100.0, 2);
        q.schedule(50.0, 0);
        q.schedule(100.0, 3);
        assert_eq!(q.drain_due(100.0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_clear_cancels() {
        let mut q = TimerQueue::new();
        q.schedule(10.0, ());
        q.clear();
        assert!(q.drain_due(1_000.0).is_empty());
        assert_eq!(q.next_due(), None);
    }
}
