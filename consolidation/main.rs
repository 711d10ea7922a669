//! Consolidation agent runtime: mode-scaled passes and cadence scheduling.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use holo_pattern_store::pattern::PatternContent;
use holo_pattern_store::store::PatternStore;
use shared_telemetry::{LogLevel, Telemetry};

use crate::modes::{ConsolidationMode, ConsolidationResult};

/// Cadence thresholds for the scheduling heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTuning {
    /// Seconds after a pass during which no new pass is scheduled.
    pub min_interval_secs: f64,
    /// Staleness escalating to a normal pass.
    pub normal_after_secs: f64,
    /// Staleness escalating to a deep pass.
    pub deep_after_secs: f64,
    /// Store size escalating to a normal pass.
    pub normal_size: usize,
    /// Store size escalating to a deep pass.
    pub deep_size: usize,
}

impl Default for ScheduleTuning {
    fn default() -> Self {
        Self {
            min_interval_secs: 120.0,
            normal_after_secs: 600.0,
            deep_after_secs: 3_600.0,
            normal_size: 128,
            deep_size: 512,
        }
    }
}

/// Runs mode-scaled consolidation passes over a pattern store and decides its
/// own cadence.
pub struct ConsolidationAgent<T: PatternContent> {
    store: Arc<PatternStore<T>>,
    schedule: ScheduleTuning,
    created_at: DateTime<Utc>,
    last_run: RwLock<Option<DateTime<Utc>>>,
    history: RwLock<Vec<ConsolidationResult>>,
    telemetry: Option<Telemetry>,
}

impl<T: PatternContent> ConsolidationAgent<T> {
    /// Creates an agent over the given store with default cadence tuning.
    #[must_use]
    pub fn new(store: Arc<PatternStore<T>>) -> Self {
        Self {
            store,
            schedule: ScheduleTuning::default(),
            created_at: Utc::now(),
            last_run: RwLock::new(None),
            history: RwLock::new(Vec::new()),
            telemetry: None,
        }
    }

    /// Overrides the cadence tuning.
    #[must_use]
    pub fn with_schedule(mut self, schedule: ScheduleTuning) -> Self {
        self.schedule = schedule;
        self
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Runs one consolidation pass under the given mode and records it.
    pub fn invoke(&self, mode: ConsolidationMode) -> ConsolidationResult {
        let tuned = mode.tuned(&self.store.config().consolidation);
        let before = self.store.temperature_profile(&tuned);
        let stats = self.store.consolidate_with(&tuned);
        let after = self.store.temperature_profile(&tuned);
        let result = ConsolidationResult {
            mode,
            timestamp: Utc::now(),
            before,
            after,
            promoted: stats.promoted,
            demoted: stats.demoted,
            removed: stats.removed,
            was_productive: !stats.is_noop(),
        };
        *self.last_run.write() = Some(result.timestamp);
        self.history.write().push(result.clone());
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "consolidation.invoke",
                json!({
                    "mode": mode.label(),
                    "promoted": result.promoted,
                    "demoted": result.demoted,
                    "removed": result.removed,
                }),
            );
            let _ = tel.event(
                "consolidation.completed",
                json!({ "mode": mode.label(), "was_productive": result.was_productive }),
            );
        }
        result
    }

    /// Picks the next pass intensity, or `None` when no pass is due: the
    /// store is empty, or a pass completed very recently. Escalates toward
    /// `Deep` as staleness or store size grows.
    #[must_use]
    pub fn schedule_consolidation(&self) -> Option<ConsolidationMode> {
        if self.store.is_empty() {
            return None;
        }
        let now = Utc::now();
        let last_run = *self.last_run.read();
        let staleness_secs = {
            let anchor = last_run.unwrap_or(self.created_at);
            ((now - anchor).num_milliseconds() as f64 / 1000.0).max(0.0)
        };
        if last_run.is_some() && staleness_secs < self.schedule.min_interval_secs {
            return None;
        }
        let size = self.store.len();
        if staleness_secs >= self.schedule.deep_after_secs || size >= self.schedule.deep_size {
            Some(ConsolidationMode::Deep)
        } else if staleness_secs >= self.schedule.normal_after_secs
            || size >= self.schedule.normal_size
        {
            Some(ConsolidationMode::Normal)
        } else {
            Some(ConsolidationMode::Light)
        }
    }

    /// Timestamp of the most recent pass, if any.
    #[must_use]
    pub fn last_consolidated_at(&self) -> Option<DateTime<Utc>> {
        *self.last_run.read()
    }

    /// Results of every pass run by this agent, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<ConsolidationResult> {
        self.history.read().clone()
    }

    /// The store this agent maintains.
    #[must_use]
    pub fn store(&self) -> &Arc<PatternStore<T>> {
        &self.store
    }
}
