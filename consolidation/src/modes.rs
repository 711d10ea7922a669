use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use holo_pattern_store::decay::{ConsolidationTuning, TemperatureProfile};

/// Intensity of a consolidation pass. Each mode scales the hot/cold
/// thresholds and the forget age; `Deep` touches strictly more patterns than
/// `Normal`, which touches strictly more than `Light`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsolidationMode {
    /// Gentle upkeep: only the clearest extremes move.
    Light,
    /// Default maintenance using the store's own thresholds.
    Normal,
    /// Aggressive sweep: promotes and forgets eagerly.
    Deep,
}

impl ConsolidationMode {
    /// Label used in telemetry payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "LIGHT",
            Self::Normal => "NORMAL",
            Self::Deep => "DEEP",
        }
    }

    /// Derives this mode's thresholds from the store's base tuning.
    #[must_use]
    pub fn tuned(self, base: &ConsolidationTuning) -> ConsolidationTuning {
        match self {
            Self::Light => ConsolidationTuning {
                hot_threshold: (base.hot_threshold * 1.25).min(0.95),
                cold_threshold: base.cold_threshold * 0.5,
                forget_after_secs: base.forget_after_secs * 2.0,
                retention_floor: base.retention_floor * 0.5,
            },
            Self::Normal => base.clone(),
            Self::Deep => ConsolidationTuning {
                hot_threshold: base.hot_threshold * 0.75,
                cold_threshold: (base.cold_threshold * 1.5).min(base.hot_threshold * 0.75),
                forget_after_secs: base.forget_after_secs * 0.5,
                retention_floor: (base.retention_floor * 2.0).min(1.0),
            },
        }
    }
}

/// Outcome of one agent-driven consolidation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationResult {
    /// Mode the pass ran under.
    pub mode: ConsolidationMode,
    /// When the pass completed.
    pub timestamp: DateTime<Utc>,
    /// Temperature profile before the pass.
    pub before: TemperatureProfile,
    /// Temperature profile after the pass.
    pub after: TemperatureProfile,
    /// Patterns sharpened toward full resolution.
    pub promoted: usize,
    /// Patterns pushed toward low resolution.
    pub demoted: usize,
    /// Patterns forgotten entirely.
    pub removed: usize,
    /// Whether the pass changed anything.
    pub was_productive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_is_strictly_more_aggressive_than_normal_than_light() {
        let base = ConsolidationTuning::default();
        let light = ConsolidationMode::Light.tuned(&base);
        let normal = ConsolidationMode::Normal.tuned(&base);
        let deep = ConsolidationMode::Deep.tuned(&base);

        // Lower hot threshold promotes more patterns.
        assert!(deep.hot_threshold < normal.hot_threshold);
        assert!(normal.hot_threshold < light.hot_threshold);
        // Higher cold threshold and shorter forget age demote more patterns.
        assert!(deep.cold_threshold > normal.cold_threshold);
        assert!(normal.cold_threshold > light.cold_threshold);
        assert!(deep.forget_after_secs < normal.forget_after_secs);
        assert!(normal.forget_after_secs < light.forget_after_secs);
        // Higher retention floor forgets more patterns.
        assert!(deep.retention_floor > normal.retention_floor);
        assert!(normal.retention_floor > light.retention_floor);
    }

    #[test]
    fn mode_labels_are_stable() {
        assert_eq!(ConsolidationMode::Light.label(), "LIGHT");
        assert_eq!(ConsolidationMode::Deep.label(), "DEEP");
        let json = serde_json::to_string(&ConsolidationMode::Normal).unwrap();
        assert_eq!(json, "\"NORMAL\"");
    }
}
