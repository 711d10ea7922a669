use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a recollection was assembled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionMethod {
    /// The single highest-resonance candidate, verbatim.
    TopMatch,
    /// Resonance-weighted merge of the strongest candidates.
    WeightedSynthesis,
    /// No candidates resonated.
    Empty,
    /// The cue carried no usable information.
    InvalidCue,
}

impl ReconstructionMethod {
    /// Stable tag used in telemetry payloads.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TopMatch => "top_match",
            Self::WeightedSynthesis => "weighted_synthesis",
            Self::Empty => "empty",
            Self::InvalidCue => "invalid_cue",
        }
    }
}

/// Transient reconstruction product handed to consumers. Never a live
/// reference into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recollection<T> {
    /// Reconstructed payload, absent when nothing resonated.
    pub content: Option<T>,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Assembly method.
    pub method: ReconstructionMethod,
    /// Ids of the patterns that contributed.
    pub contributing_patterns: Vec<String>,
    /// When this recollection was produced.
    pub recalled_at: DateTime<Utc>,
}

impl<T> Recollection<T> {
    /// A zero-confidence recollection with no content.
    #[must_use]
    pub fn empty(method: ReconstructionMethod) -> Self {
        Self {
            content: None,
            confidence: 0.0,
            method,
            contributing_patterns: Vec::new(),
            recalled_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tags_are_stable() {
        assert_eq!(ReconstructionMethod::TopMatch.tag(), "top_match");
        assert_eq!(ReconstructionMethod::InvalidCue.tag(), "invalid_cue");
        let json = serde_json::to_string(&ReconstructionMethod::WeightedSynthesis).unwrap();
        assert_eq!(json, "\"weighted_synthesis\"");
    }

    #[test]
    fn empty_recollection_has_zero_confidence() {
        let recollection: Recollection<String> =
            Recollection::empty(ReconstructionMethod::Empty);
        assert!(recollection.content.is_none());
        assert!(recollection.confidence.abs() < f32::EPSILON);
        assert!(recollection.contributing_patterns.is_empty());
    }
}
