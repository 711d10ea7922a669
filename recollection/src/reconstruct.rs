use holo_pattern_store::pattern::PatternContent;
use holo_pattern_store::resonance::ResonanceResult;

use crate::recollect::{Recollection, ReconstructionMethod};

/// Strategy assembling a recollection from resonance-ranked candidates.
pub trait Reconstructor<T: PatternContent>: Send + Sync {
    /// Builds a recollection from candidates ordered by descending resonance.
    fn reconstruct(&self, candidates: &[ResonanceResult<T>]) -> Recollection<T>;
}

/// Returns the single highest-resonance candidate verbatim; its score is the
/// confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopMatchReconstructor;

impl<T: PatternContent> Reconstructor<T> for TopMatchReconstructor {
    fn reconstruct(&self, candidates: &[ResonanceResult<T>]) -> Recollection<T> {
        let Some(best) = candidates.first() else {
            return Recollection::empty(ReconstructionMethod::Empty);
        };
        Recollection {
            content: Some(best.pattern.content.clone()),
            confidence: best.similarity.clamp(0.0, 1.0),
            method: ReconstructionMethod::TopMatch,
            contributing_patterns: vec![best.pattern.id.clone()],
            recalled_at: chrono::Utc::now(),
        }
    }
}

/// Merges the strongest candidates weighted by resonance.
///
/// Payloads are opaque, so the dominant candidate supplies the content while
/// the confidence aggregates resonance mass across every merged candidate and
/// all of their ids are reported as contributors.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSynthesisReconstructor {
    top_n: usize,
}

impl WeightedSynthesisReconstructor {
    /// Merges up to `top_n` candidates per reconstruction.
    #[must_use]
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n: top_n.max(1),
        }
    }
}

impl Default for WeightedSynthesisReconstructor {
    fn default() -> Self {
        Self::new(3)
    }
}

impl<T: PatternContent> Reconstructor<T> for WeightedSynthesisReconstructor {
    fn reconstruct(&self, candidates: &[ResonanceResult<T>]) -> Recollection<T> {
        let merged = &candidates[..candidates.len().min(self.top_n)];
        if merged.is_empty() {
            return Recollection::empty(ReconstructionMethod::Empty);
        }
        let total: f32 = merged.iter().map(|candidate| candidate.similarity).sum();
        let confidence = if total > f32::EPSILON {
            // Resonance-weighted mean similarity: dominated by the strongest
            // candidates, bounded by the best score.
            merged
                .iter()
                .map(|candidate| candidate.similarity * candidate.similarity)
                .sum::<f32>()
                / total
        } else {
            0.0
        };
        let dominant = merged
            .iter()
            .max_by(|a, b| a.similarity.total_cmp(&b.similarity))
            .unwrap_or(&merged[0]);
        Recollection {
            content: Some(dominant.pattern.content.clone()),
            confidence: confidence.clamp(0.0, 1.0),
            method: ReconstructionMethod::WeightedSynthesis,
            contributing_patterns: merged
                .iter()
                .map(|candidate| candidate.pattern.id.clone())
                .collect(),
            recalled_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_pattern_store::pattern::Pattern;
    use indexmap::IndexSet;

    fn candidate(id: &str, similarity: f32) -> ResonanceResult<String> {
        ResonanceResult {
            pattern: Pattern::new(id, format!("{id} content"), IndexSet::new(), None),
            similarity,
        }
    }

    #[test]
    fn top_match_returns_best_candidate_verbatim() {
        let candidates = vec![candidate("best", 0.9), candidate("second", 0.5)];
        let recollection = TopMatchReconstructor.reconstruct(&candidates);
        assert_eq!(recollection.method, ReconstructionMethod::TopMatch);
        assert_eq!(recollection.content.as_deref(), Some("best content"));
        assert!((recollection.confidence - 0.9).abs() < 1e-6);
        assert_eq!(recollection.contributing_patterns, vec!["best"]);
    }

    #[test]
    fn top_match_with_no_candidates_is_empty() {
        let recollection: Recollection<String> = TopMatchReconstructor.reconstruct(&[]);
        assert_eq!(recollection.method, ReconstructionMethod::Empty);
        assert!(recollection.confidence.abs() < f32::EPSILON);
    }

    #[test]
    fn weighted_synthesis_merges_top_candidates() {
        let candidates = vec![
            candidate("a", 0.8),
            candidate("b", 0.6),
            candidate("c", 0.4),
            candidate("d", 0.2),
        ];
        let recollection = WeightedSynthesisReconstructor::new(3).reconstruct(&candidates);
        assert_eq!(recollection.method, ReconstructionMethod::WeightedSynthesis);
        assert_eq!(recollection.content.as_deref(), Some("a content"));
        assert_eq!(recollection.contributing_patterns, vec!["a", "b", "c"]);
        // Aggregate sits between the weakest and strongest merged scores.
        assert!(recollection.confidence > 0.4);
        assert!(recollection.confidence <= 0.8);
    }

    #[test]
    fn weighted_synthesis_with_no_candidates_is_empty() {
        let recollection: Recollection<String> =
            WeightedSynthesisReconstructor::default().reconstruct(&[]);
        assert_eq!(recollection.method, ReconstructionMethod::Empty);
        assert!(recollection.content.is_none());
    }
}
