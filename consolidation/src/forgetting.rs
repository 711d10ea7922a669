use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use holo_pattern_store::decay;
use holo_pattern_store::pattern::{CompressionLevel, PatternContent};
use holo_pattern_store::store::{PatternStore, PatternStoreError};

/// Retention buckets across the store population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionReport {
    /// Faded patterns worth refreshing before they slip further.
    pub needs_review: Vec<String>,
    /// Cold patterns still carrying resolution that can be shed.
    pub can_compress: Vec<String>,
    /// Patterns whose retention is still high.
    pub stable: Vec<String>,
    /// When the analysis ran.
    pub generated_at: DateTime<Utc>,
}

/// Analyzes the store through the forgetting curve: bucketing by current
/// retention and temperature, and deriving spaced-repetition review
/// intervals.
pub struct ForgettingCurveAgent<T: PatternContent> {
    store: Arc<PatternStore<T>>,
    stable_retention: f32,
    target_retention: f64,
}

impl<T: PatternContent> ForgettingCurveAgent<T> {
    /// Creates an agent over the given store with default thresholds.
    #[must_use]
    pub fn new(store: Arc<PatternStore<T>>) -> Self {
        Self {
            store,
            stable_retention: 0.7,
            target_retention: 0.6,
        }
    }

    /// Adjusts the retention level counted as stable and the retention level
    /// a review should arrive before.
    #[must_use]
    pub fn with_thresholds(mut self, stable_retention: f32, target_retention: f64) -> Self {
        self.stable_retention = stable_retention.clamp(0.0, 1.0);
        self.target_retention = target_retention.clamp(0.01, 0.99);
        self
    }

    /// Buckets every pattern by its current retention and temperature.
    #[must_use]
    pub fn analyze(&self) -> RetentionReport {
        let config = self.store.config();
        let now = Utc::now();
        let mut report = RetentionReport {
            needs_review: Vec::new(),
            can_compress: Vec::new(),
            stable: Vec::new(),
            generated_at: now,
        };
        for record in self.store.snapshot() {
            let idle =
                ((now - record.last_accessed).num_milliseconds() as f64 / 1000.0).max(0.0);
            let retention = decay::retention(idle, record.strength, &config.decay);
            let warmth = decay::temperature(idle, record.access_count, &config.decay);
            if retention >= self.stable_retention {
                report.stable.push(record.id);
            } else if warmth <= config.consolidation.cold_threshold
                && record.compression > CompressionLevel::Low
            {
                report.can_compress.push(record.id);
            } else {
                report.needs_review.push(record.id);
            }
        }
        report
    }

    /// Time until the pattern's retention decays to the review target. Higher
    /// strength stretches the interval (spaced repetition).
    pub fn optimal_review_interval(&self, id: &str) -> Result<Duration, PatternStoreError> {
        let pattern = self
            .store
            .get(id)
            .ok_or_else(|| PatternStoreError::NotFound { id: id.to_string() })?;
        let tau = f64::from(pattern.strength.max(1.0))
            * self.store.config().decay.retention_tau_secs;
        let seconds = tau * (1.0 / self.target_retention).ln();
        Ok(Duration::seconds(seconds as i64))
    }
}
