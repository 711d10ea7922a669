use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Raw perceptual input with its importance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensoryEntry<T> {
    /// Perceived payload.
    pub content: T,
    /// Perceptual importance in `[0, 1]`.
    pub salience: f32,
    /// Arrival timestamp.
    pub timestamp: DateTime<Utc>,
}

impl<T> SensoryEntry<T> {
    /// Seconds since this entry arrived (never negative).
    #[must_use]
    pub fn age_seconds(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.timestamp).num_milliseconds() as f64 / 1000.0).max(0.0)
    }
}

/// Bounded, time-windowed staging area for raw input.
///
/// Capacity overflow evicts the oldest entry; age-based expiry is computed
/// lazily at read time, so no background sweeper exists.
#[derive(Debug)]
pub struct SensoryBuffer<T> {
    capacity: usize,
    ttl_seconds: f64,
    entries: RwLock<VecDeque<SensoryEntry<T>>>,
}

impl<T: Clone> SensoryBuffer<T> {
    /// Creates a buffer holding up to `capacity` entries for `ttl_seconds`.
    #[must_use]
    pub fn new(capacity: usize, ttl_seconds: f64) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl_seconds: ttl_seconds.max(0.0),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Appends an entry stamped with the current time, evicting the oldest
    /// entry on overflow. Salience is clamped to `[0, 1]`.
    pub fn perceive(&self, content: T, salience: f32) -> SensoryEntry<T> {
        let entry = SensoryEntry {
            content,
            salience: salience.clamp(0.0, 1.0),
            timestamp: Utc::now(),
        };
        let mut entries = self.entries.write();
        entries.push_back(entry.clone());
        if entries.len() > self.capacity {
            entries.pop_front();
        }
        entry
    }

    /// All unexpired entries, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<SensoryEntry<T>> {
        self.window(self.ttl_seconds)
    }

    /// Unexpired entries no older than `seconds`, oldest first.
    #[must_use]
    pub fn recent(&self, seconds: f64) -> Vec<SensoryEntry<T>> {
        self.window(seconds.min(self.ttl_seconds))
    }

    /// Removes and returns every unexpired entry; expired residue is dropped
    /// with them.
    pub fn drain(&self) -> Vec<SensoryEntry<T>> {
        let now = Utc::now();
        let mut entries = self.entries.write();
        entries
            .drain(..)
            .filter(|entry| entry.age_seconds(now) <= self.ttl_seconds)
            .collect()
    }

    /// Number of entries currently buffered (expired residue included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the buffer holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn window(&self, seconds: f64) -> Vec<SensoryEntry<T>> {
        let now = Utc::now();
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.age_seconds(now) <= seconds)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn capacity_evicts_oldest_first() {
        let buffer = SensoryBuffer::new(2, 60.0);
        buffer.perceive("a".to_string(), 0.5);
        buffer.perceive("b".to_string(), 0.5);
        buffer.perceive("c".to_string(), 0.5);
        let all = buffer.all();
        assert_eq!(buffer.len(), 2);
        assert_eq!(all[0].content, "b");
        assert_eq!(all[1].content, "c");
    }

    #[test]
    fn reads_exclude_entries_past_ttl() {
        let buffer = SensoryBuffer::new(4, 10.0);
        buffer.perceive("fresh".to_string(), 0.5);
        {
            let mut entries = buffer.entries.write();
            entries.front_mut().unwrap().timestamp = Utc::now() - Duration::seconds(30);
        }
        buffer.perceive("newer".to_string(), 0.5);
        let all = buffer.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "newer");
        assert!(buffer.recent(5.0).len() <= 1);
    }

    #[test]
    fn drain_empties_and_returns_unexpired() {
        let buffer = SensoryBuffer::new(4, 60.0);
        buffer.perceive("x".to_string(), 0.9);
        buffer.perceive("y".to_string(), 0.1);
        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn salience_is_clamped() {
        let buffer = SensoryBuffer::new(2, 60.0);
        let entry = buffer.perceive("loud".to_string(), 4.2);
        assert!((entry.salience - 1.0).abs() < f32::EPSILON);
    }
}
