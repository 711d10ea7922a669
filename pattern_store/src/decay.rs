use serde::{Deserialize, Serialize};

/// Tunable decay constants. Defaults satisfy the engine's behavioral
/// contracts; exact values are deployment-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayTuning {
    /// Base retention time constant in seconds (scaled by pattern strength).
    pub retention_tau_secs: f64,
    /// Half-life of the temperature recency factor, in seconds.
    pub temperature_half_life_secs: f64,
    /// Access count at which the frequency factor reaches 0.5.
    pub frequency_pivot: f64,
    /// Strength added per access.
    pub strength_gain: f32,
    /// Upper bound on accumulated strength.
    pub strength_cap: f32,
}

impl Default for DecayTuning {
    fn default() -> Self {
        Self {
            retention_tau_secs: 21_600.0,
            temperature_half_life_secs: 3_600.0,
            frequency_pivot: 1.0,
            strength_gain: 0.1,
            strength_cap: 10.0,
        }
    }
}

/// Thresholds steering promotion, demotion, and forgetting during
/// consolidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationTuning {
    /// Temperature at or above which a pattern is promoted to full resolution.
    pub hot_threshold: f32,
    /// Temperature at or below which a pattern is a demotion candidate.
    pub cold_threshold: f32,
    /// Idle seconds before a cold pattern may be demoted or forgotten.
    pub forget_after_secs: f64,
    /// Retention below which an exhausted low-resolution pattern is removed.
    pub retention_floor: f32,
}

impl Default for ConsolidationTuning {
    fn default() -> Self {
        Self {
            hot_threshold: 0.6,
            cold_threshold: 0.2,
            forget_after_secs: 86_400.0,
            retention_floor: 0.05,
        }
    }
}

/// Ebbinghaus-style retention: `exp(-Δt / (strength · τ))`.
///
/// Strictly decreasing in idle time, non-decreasing in strength (spaced
/// repetition slows future decay), and `1.0` immediately after an access.
#[must_use]
pub fn retention(idle_secs: f64, strength: f32, tuning: &DecayTuning) -> f32 {
    let tau = f64::from(strength.max(1.0)) * tuning.retention_tau_secs;
    if tau <= f64::EPSILON {
        return 0.0;
    }
    (-(idle_secs.max(0.0)) / tau).exp() as f32
}

/// Exponential recency component of temperature.
#[must_use]
pub fn recency_factor(idle_secs: f64, tuning: &DecayTuning) -> f32 {
    let half_life = tuning.temperature_half_life_secs.max(f64::EPSILON);
    0.5_f64.powf(idle_secs.max(0.0) / half_life) as f32
}

/// Saturating frequency component of temperature: `n / (n + pivot)`.
#[must_use]
pub fn frequency_factor(access_count: u64, tuning: &DecayTuning) -> f32 {
    let count = access_count as f64;
    (count / (count + tuning.frequency_pivot.max(f64::EPSILON))) as f32
}

/// Recency × frequency warmth used by the consolidation scheduler.
///
/// For a fixed access count, strictly decreasing as idle time grows; for a
/// fixed idle time, non-decreasing in access count.
#[must_use]
pub fn temperature(idle_secs: f64, access_count: u64, tuning: &DecayTuning) -> f32 {
    recency_factor(idle_secs, tuning) * frequency_factor(access_count, tuning)
}

/// Aggregate temperature picture of a store population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureProfile {
    /// Mean temperature across the population.
    pub mean: f32,
    /// Fraction of patterns at or above the hot threshold.
    pub hot_fraction: f32,
    /// Fraction of patterns at or below the cold threshold.
    pub cold_fraction: f32,
    /// Population size.
    pub total: usize,
}

/// Profiles a set of temperatures against the given thresholds.
#[must_use]
pub fn profile(temperatures: &[f32], tuning: &ConsolidationTuning) -> TemperatureProfile {
    if temperatures.is_empty() {
        return TemperatureProfile::default();
    }
    let total = temperatures.len();
    let sum: f32 = temperatures.iter().sum();
    let hot = temperatures
        .iter()
        .filter(|t| **t >= tuning.hot_threshold)
        .count();
    let cold = temperatures
        .iter()
        .filter(|t| **t <= tuning.cold_threshold)
        .count();
    TemperatureProfile {
        mean: sum / total as f32,
        hot_fraction: hot as f32 / total as f32,
        cold_fraction: cold as f32 / total as f32,
        total,
    }
}
