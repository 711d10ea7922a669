//! Recollection runtime: cue dispatch, candidate gathering, reconstruction.

use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::json;

use holo_pattern_store::pattern::PatternContent;
use holo_pattern_store::resonance::{tokenize, ResonanceResult};
use holo_pattern_store::store::PatternStore;
use shared_telemetry::{LogLevel, Telemetry};

use crate::cue::Cue;
use crate::recollect::{Recollection, ReconstructionMethod};
use crate::reconstruct::Reconstructor;

/// Cue-driven reconstruction over a pattern store.
///
/// Dispatches each cue to the matching retrieval path and hands the
/// resonating candidates to a pluggable reconstructor. An empty cue
/// short-circuits to a zero-confidence recollection without touching the
/// store.
pub struct RecollectionAgent<T: PatternContent> {
    store: Arc<PatternStore<T>>,
    reconstructor: Arc<dyn Reconstructor<T>>,
    candidate_limit: usize,
    telemetry: Option<Telemetry>,
}

impl<T: PatternContent> RecollectionAgent<T> {
    /// Creates an agent over the given store and reconstruction strategy.
    #[must_use]
    pub fn new(store: Arc<PatternStore<T>>, reconstructor: Arc<dyn Reconstructor<T>>) -> Self {
        Self {
            store,
            reconstructor,
            candidate_limit: 5,
            telemetry: None,
        }
    }

    /// Caps the number of candidates gathered per cue.
    #[must_use]
    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit.max(1);
        self
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// The store this agent recalls from.
    #[must_use]
    pub fn store(&self) -> &Arc<PatternStore<T>> {
        &self.store
    }

    /// Gathers resonance-ranked candidates for a cue. Embedding cues take
    /// precedence over text cues, which take precedence over concept cues; an
    /// empty cue gathers nothing.
    #[must_use]
    pub fn candidates(&self, cue: &Cue) -> Vec<ResonanceResult<T>> {
        if let Some(embedding) = cue
            .embedding
            .as_ref()
            .filter(|embedding| !embedding.is_empty())
        {
            return self.store.retrieve_by_embedding(embedding, self.candidate_limit);
        }
        if let Some(text) = cue.text.as_ref().filter(|text| !text.trim().is_empty()) {
            return self.store.retrieve(text, self.candidate_limit);
        }
        if !cue.concepts.is_empty() {
            let concepts: Vec<String> = cue.concepts.iter().cloned().collect();
            let mut results = self.store.retrieve_by_concepts(&concepts);
            results.truncate(self.candidate_limit);
            return results;
        }
        Vec::new()
    }

    /// Resolves a cue into a recollection.
    pub fn invoke(&self, cue: &Cue) -> Recollection<T> {
        if cue.is_empty() {
            let recollection = Recollection::empty(ReconstructionMethod::InvalidCue);
            self.log_invoke(&recollection);
            return recollection;
        }
        let candidates = self.candidates(cue);
        let recollection = self.reconstructor.reconstruct(&candidates);
        self.log_invoke(&recollection);
        recollection
    }

    fn log_invoke(&self, recollection: &Recollection<T>) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Debug,
                "recollection.invoke",
                json!({
                    "method": recollection.method.tag(),
                    "confidence": recollection.confidence,
                    "contributors": recollection.contributing_patterns.len(),
                }),
            );
        }
    }
}

/// Wraps a [`RecollectionAgent`], biasing candidate scores toward patterns
/// whose concepts relate to a supplied context (e.g. the current task) before
/// reconstruction.
pub struct ContextualRecollectionAgent<T: PatternContent> {
    inner: RecollectionAgent<T>,
    context_terms: IndexSet<String>,
    bias: f32,
}

impl<T: PatternContent> ContextualRecollectionAgent<T> {
    /// Wraps an agent with a context value whose tokens steer scoring.
    #[must_use]
    pub fn new(inner: RecollectionAgent<T>, context: impl Into<String>) -> Self {
        Self {
            inner,
            context_terms: tokenize(&context.into()).into_iter().collect(),
            bias: 0.25,
        }
    }

    /// Adjusts how strongly context overlap amplifies candidate scores.
    #[must_use]
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias.max(0.0);
        self
    }

    /// Resolves a cue, re-ranking candidates by context affinity first.
    pub fn invoke(&self, cue: &Cue) -> Recollection<T> {
        if cue.is_empty() {
            return self.inner.invoke(cue);
        }
        let mut candidates = self.inner.candidates(cue);
        for candidate in &mut candidates {
            let affinity = self.context_affinity(&candidate.pattern.concepts);
            candidate.similarity =
                (candidate.similarity * self.bias.mul_add(affinity, 1.0)).clamp(0.0, 1.0);
        }
        candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        let recollection = self.inner.reconstructor.reconstruct(&candidates);
        self.inner.log_invoke(&recollection);
        recollection
    }

    /// Fraction of context terms present among the given concepts.
    fn context_affinity(&self, concepts: &IndexSet<String>) -> f32 {
        if self.context_terms.is_empty() {
            return 0.0;
        }
        let lowered: IndexSet<String> = concepts
            .iter()
            .map(|concept| concept.to_lowercase())
            .collect();
        let matched = self
            .context_terms
            .iter()
            .filter(|term| lowered.contains(*term))
            .count();
        matched as f32 / self.context_terms.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::{TopMatchReconstructor, WeightedSynthesisReconstructor};
    use holo_pattern_store::embedder::{Embedder, HashingEmbedder};

    fn seeded_store() -> Arc<PatternStore<String>> {
        let store = Arc::new(PatternStore::new());
        store.store(
            "rust-work",
            "memory systems in rust".to_string(),
            ["rust", "engineering"],
            None,
        );
        store.store(
            "cooking",
            "memory of cooking class".to_string(),
            ["cooking"],
            None,
        );
        store
    }

    #[test]
    fn empty_cue_short_circuits_without_touching_the_store() {
        let store = seeded_store();
        let agent = RecollectionAgent::new(store.clone(), Arc::new(TopMatchReconstructor));
        let recollection = agent.invoke(&Cue::default());
        assert_eq!(recollection.method, ReconstructionMethod::InvalidCue);
        assert!(recollection.confidence.abs() < f32::EPSILON);
        assert!(recollection.content.is_none());
        assert_eq!(store.stats().retrieve_count, 0);
    }

    #[test]
    fn text_cue_dispatches_to_resonance_retrieval() {
        let agent = RecollectionAgent::new(seeded_store(), Arc::new(TopMatchReconstructor));
        let recollection = agent.invoke(&Cue::from_text("rust systems"));
        assert_eq!(recollection.method, ReconstructionMethod::TopMatch);
        assert_eq!(recollection.contributing_patterns, vec!["rust-work"]);
        assert!(recollection.confidence > 0.0);
    }

    #[test]
    fn concept_cue_dispatches_to_membership_retrieval() {
        let agent = RecollectionAgent::new(seeded_store(), Arc::new(TopMatchReconstructor));
        let recollection = agent.invoke(&Cue::from_concepts(["cooking"]));
        assert_eq!(recollection.contributing_patterns, vec!["cooking"]);
        assert!((recollection.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn embedding_cue_dispatches_to_vector_retrieval() {
        let embedder = Arc::new(HashingEmbedder::new(64));
        let store = Arc::new(PatternStore::new().with_embedder(embedder.clone()));
        store.store(
            "deploy-note",
            "deploy pipeline failed".to_string(),
            ["ops"],
            None,
        );
        let agent = RecollectionAgent::new(store, Arc::new(TopMatchReconstructor));
        let cue = Cue::from_embedding(embedder.embed("deploy pipeline"));
        let recollection = agent.invoke(&cue);
        assert_eq!(recollection.method, ReconstructionMethod::TopMatch);
        assert_eq!(recollection.contributing_patterns, vec!["deploy-note"]);
    }

    #[test]
    fn unmatched_cue_yields_empty_method() {
        let agent = RecollectionAgent::new(seeded_store(), Arc::new(TopMatchReconstructor));
        let recollection = agent.invoke(&Cue::from_text("quantum chromodynamics"));
        assert_eq!(recollection.method, ReconstructionMethod::Empty);
        assert!(recollection.content.is_none());
    }

    #[test]
    fn weighted_synthesis_reports_all_contributors() {
        let agent = RecollectionAgent::new(
            seeded_store(),
            Arc::new(WeightedSynthesisReconstructor::default()),
        );
        let recollection = agent.invoke(&Cue::from_text("memory"));
        assert_eq!(recollection.method, ReconstructionMethod::WeightedSynthesis);
        assert_eq!(recollection.contributing_patterns.len(), 2);
    }

    #[test]
    fn context_bias_rearranges_equally_resonant_candidates() {
        // "memory archive" half-matches both patterns; without context the
        // more recently stored one wins the tie.
        let plain = RecollectionAgent::new(seeded_store(), Arc::new(TopMatchReconstructor));
        let tied = plain.invoke(&Cue::from_text("memory archive"));
        assert_eq!(tied.contributing_patterns, vec!["cooking"]);

        let contextual = ContextualRecollectionAgent::new(
            RecollectionAgent::new(seeded_store(), Arc::new(TopMatchReconstructor)),
            "rust engineering task",
        );
        let steered = contextual.invoke(&Cue::from_text("memory archive"));
        assert_eq!(steered.contributing_patterns, vec!["rust-work"]);
    }
}
