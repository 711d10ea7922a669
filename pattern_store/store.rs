//! Long-term holographic memory: resonance-ranked storage over decaying patterns.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_telemetry::{LogLevel, Telemetry};
use thiserror::Error;

use crate::decay::{
    self, temperature, ConsolidationTuning, DecayTuning, TemperatureProfile,
};
use crate::embedder::Embedder;
use crate::pattern::{CompressionLevel, Pattern, PatternContent, PatternRecord};
use crate::resonance::{
    blend_score, cosine_similarity, lexical_similarity, retention_multiplier, tokenize,
    ResonanceResult, RetrievalWeights,
};
use crate::snapshot::{SnapshotBackend, SnapshotError};

/// Errors emitted by the pattern store.
#[derive(Debug, Error)]
pub enum PatternStoreError {
    /// An operation referenced an unknown pattern id.
    #[error("pattern not found: {id}")]
    NotFound {
        /// The id that missed.
        id: String,
    },
}

/// Outcome of one consolidation pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConsolidationStats {
    /// Patterns sharpened toward full resolution.
    pub promoted: usize,
    /// Patterns pushed toward low resolution.
    pub demoted: usize,
    /// Patterns forgotten entirely.
    pub removed: usize,
}

impl ConsolidationStats {
    /// Whether the pass changed anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.promoted == 0 && self.demoted == 0 && self.removed == 0
    }
}

/// Aggregate store counters and distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Patterns currently held.
    pub total_patterns: usize,
    /// Lifetime store calls.
    pub store_count: u64,
    /// Lifetime retrieval calls (all retrieval paths).
    pub retrieve_count: u64,
    /// Pattern count per compression level.
    pub compression_distribution: IndexMap<String, usize>,
}

/// Store-wide configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Decay constants.
    pub decay: DecayTuning,
    /// Default consolidation thresholds.
    pub consolidation: ConsolidationTuning,
    /// Resonance blending weights.
    pub weights: RetrievalWeights,
}

struct StoreInner<T> {
    patterns: IndexMap<String, Pattern<T>>,
    store_count: u64,
    retrieve_count: u64,
}

/// Long-term holographic memory.
///
/// A single writer owns the pattern table; every mutating operation
/// (including retrieval, whose touch is a write) serializes on one internal
/// lock so consolidation scans always observe a consistent snapshot.
pub struct PatternStore<T> {
    inner: RwLock<StoreInner<T>>,
    config: StoreConfig,
    embedder: Option<Arc<dyn Embedder>>,
    telemetry: Option<Telemetry>,
}

impl<T> fmt::Debug for PatternStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternStore")
            .field("patterns", &self.inner.read().patterns.len())
            .finish()
    }
}

impl<T: PatternContent> Default for PatternStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PatternContent> PatternStore<T> {
    /// Creates an empty store with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with explicit tuning.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                patterns: IndexMap::new(),
                store_count: 0,
                retrieve_count: 0,
            }),
            config,
            embedder: None,
            telemetry: None,
        }
    }

    /// Injects an embedding strategy; absent, retrieval stays lexical.
    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of patterns held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().patterns.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().patterns.is_empty()
    }

    /// Upserts a pattern. A re-stored id is a brand-new first touch: full
    /// resolution, unit strength, fresh timestamps.
    pub fn store(
        &self,
        id: impl Into<String>,
        content: T,
        concepts: impl IntoIterator<Item = impl Into<String>>,
        embedding: Option<Vec<f32>>,
    ) -> Pattern<T> {
        let id = id.into();
        let mut concept_set = IndexSet::new();
        for concept in concepts {
            concept_set.insert(concept.into());
        }
        let embedding = embedding.or_else(|| {
            self.embedder
                .as_ref()
                .and_then(|embedder| content.as_text().map(|text| embedder.embed(&text)))
        });
        let pattern = Pattern::new(id.clone(), content, concept_set, embedding);
        let total = {
            let mut inner = self.inner.write();
            inner.store_count += 1;
            inner.patterns.insert(id.clone(), pattern.clone());
            inner.patterns.len()
        };
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "patterns.store",
                json!({ "id": id, "total": total }),
            );
        }
        pattern
    }

    /// Non-touching lookup; returns a clone.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Pattern<T>> {
        self.inner.read().patterns.get(id).cloned()
    }

    /// Cue-text retrieval ranked by resonance. Never fails: an empty store or
    /// an unmatched cue yields an empty list.
    ///
    /// Retrieval is active reconstruction: every returned pattern is touched
    /// (access count, recency, strength).
    pub fn retrieve(&self, cue_text: &str, limit: usize) -> Vec<ResonanceResult<T>> {
        let cue_tokens = tokenize(cue_text);
        let cue_embedding = self.embedder.as_ref().and_then(|embedder| {
            if cue_tokens.is_empty() {
                None
            } else {
                Some(embedder.embed(cue_text))
            }
        });
        let results = self.ranked(limit, |pattern, now| {
            let lexical = lexical_similarity(
                &cue_tokens,
                pattern.content_text().as_deref(),
                &pattern.concepts,
            );
            let cosine = match (&cue_embedding, &pattern.embedding) {
                (Some(cue), Some(stored)) => Some(cosine_similarity(cue, stored)),
                _ => None,
            };
            let retention =
                decay::retention(pattern.idle_seconds(now), pattern.strength, &self.config.decay);
            blend_score(lexical, cosine, retention, &self.config.weights)
        });
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Debug,
                "patterns.retrieve",
                json!({ "cue": cue_text, "hits": results.len() }),
            );
        }
        results
    }

    /// Exact concept-membership retrieval; score is the matched fraction of
    /// the queried concepts (1.0 for a single-concept query that hits).
    pub fn retrieve_by_concept(&self, concept: &str) -> Vec<ResonanceResult<T>> {
        self.retrieve_by_concepts(&[concept.to_string()])
    }

    /// Multi-concept variant of [`Self::retrieve_by_concept`].
    pub fn retrieve_by_concepts(&self, concepts: &[String]) -> Vec<ResonanceResult<T>> {
        let queried: Vec<String> = concepts
            .iter()
            .map(|concept| concept.to_lowercase())
            .filter(|concept| !concept.is_empty())
            .collect();
        if queried.is_empty() {
            return Vec::new();
        }
        self.ranked(usize::MAX, |pattern, _now| {
            let matched = queried
                .iter()
                .filter(|queried_concept| {
                    pattern
                        .concepts
                        .iter()
                        .any(|concept| concept.to_lowercase() == **queried_concept)
                })
                .count();
            matched as f32 / queried.len() as f32
        })
    }

    /// Embedding-similarity retrieval; patterns without embeddings never match.
    pub fn retrieve_by_embedding(&self, embedding: &[f32], limit: usize) -> Vec<ResonanceResult<T>> {
        if embedding.is_empty() {
            return Vec::new();
        }
        self.ranked(limit, |pattern, now| {
            pattern.embedding.as_ref().map_or(0.0, |stored| {
                let cosine = cosine_similarity(embedding, stored).clamp(0.0, 1.0);
                let retention = decay::retention(
                    pattern.idle_seconds(now),
                    pattern.strength,
                    &self.config.decay,
                );
                cosine * retention_multiplier(retention, &self.config.weights)
            })
        })
    }

    /// Sharpens a pattern by `levels` steps, clamped at full resolution.
    pub fn promote(&self, id: &str, levels: u32) -> Result<CompressionLevel, PatternStoreError> {
        let mut inner = self.inner.write();
        let pattern = inner
            .patterns
            .get_mut(id)
            .ok_or_else(|| PatternStoreError::NotFound { id: id.to_string() })?;
        pattern.compression = pattern.compression.shifted_up(levels);
        Ok(pattern.compression)
    }

    /// Coarsens a pattern by `levels` steps, clamped at low resolution.
    pub fn demote(&self, id: &str, levels: u32) -> Result<CompressionLevel, PatternStoreError> {
        let mut inner = self.inner.write();
        let pattern = inner
            .patterns
            .get_mut(id)
            .ok_or_else(|| PatternStoreError::NotFound { id: id.to_string() })?;
        pattern.compression = pattern.compression.shifted_down(levels);
        Ok(pattern.compression)
    }

    /// Demotes the coldest `ratio` fraction of patterns by one step each and
    /// returns the number actually demoted.
    pub fn compress(&self, ratio: f64) -> usize {
        let mut inner = self.inner.write();
        let now = Utc::now();
        let mut by_temperature: Vec<(String, f32)> = inner
            .patterns
            .values()
            .map(|pattern| {
                (
                    pattern.id.clone(),
                    temperature(
                        pattern.idle_seconds(now),
                        pattern.access_count,
                        &self.config.decay,
                    ),
                )
            })
            .collect();
        by_temperature.sort_by(|a, b| a.1.total_cmp(&b.1));
        let target_count = (ratio.clamp(0.0, 1.0) * by_temperature.len() as f64).floor() as usize;
        let mut demoted = 0;
        for (id, _) in by_temperature.into_iter().take(target_count) {
            if let Some(pattern) = inner.patterns.get_mut(&id) {
                if pattern.compression > CompressionLevel::Low {
                    pattern.compression = pattern.compression.step_down();
                    demoted += 1;
                }
            }
        }
        demoted
    }

    /// Runs a consolidation pass with the store's default thresholds.
    pub fn consolidate(&self) -> ConsolidationStats {
        let tuning = self.config.consolidation.clone();
        self.consolidate_with(&tuning)
    }

    /// Runs a consolidation pass with explicit thresholds.
    ///
    /// Every pattern is assigned a target compression from its temperature
    /// band — hot patterns sharpen to full resolution, cold patterns beyond
    /// the forget age sink to low — and moves directly to that target, so a
    /// second back-to-back pass with no intervening access is a no-op.
    /// Exhausted patterns (low target, beyond forget age, retention under the
    /// floor) are forgotten entirely. Consolidation never touches access
    /// metadata.
    pub fn consolidate_with(&self, tuning: &ConsolidationTuning) -> ConsolidationStats {
        let mut stats = ConsolidationStats::default();
        let mut forgotten: Vec<String> = Vec::new();
        {
            let mut inner = self.inner.write();
            let now = Utc::now();
            for pattern in inner.patterns.values_mut() {
                let idle = pattern.idle_seconds(now);
                let warmth = temperature(idle, pattern.access_count, &self.config.decay);
                let beyond_forget_age = idle > tuning.forget_after_secs;
                let target = if warmth >= tuning.hot_threshold {
                    CompressionLevel::Full
                } else if warmth <= tuning.cold_threshold && beyond_forget_age {
                    CompressionLevel::Low
                } else {
                    pattern.compression
                };
                if target == CompressionLevel::Low
                    && beyond_forget_age
                    && decay::retention(idle, pattern.strength, &self.config.decay)
                        < tuning.retention_floor
                {
                    forgotten.push(pattern.id.clone());
                    continue;
                }
                match target.cmp(&pattern.compression) {
                    Ordering::Greater => {
                        pattern.compression = target;
                        stats.promoted += 1;
                    }
                    Ordering::Less => {
                        pattern.compression = target;
                        stats.demoted += 1;
                    }
                    Ordering::Equal => {}
                }
            }
            for id in &forgotten {
                inner.patterns.shift_remove(id);
            }
            stats.removed = forgotten.len();
        }
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "patterns.consolidate",
                json!({
                    "promoted": stats.promoted,
                    "demoted": stats.demoted,
                    "removed": stats.removed,
                }),
            );
            let _ = tel.event(
                "patterns.consolidate.completed",
                json!({ "was_productive": !stats.is_noop() }),
            );
        }
        stats
    }

    /// Temperature distribution of the current population.
    #[must_use]
    pub fn temperature_profile(&self, tuning: &ConsolidationTuning) -> TemperatureProfile {
        let inner = self.inner.read();
        let now = Utc::now();
        let temperatures: Vec<f32> = inner
            .patterns
            .values()
            .map(|pattern| {
                temperature(
                    pattern.idle_seconds(now),
                    pattern.access_count,
                    &self.config.decay,
                )
            })
            .collect();
        decay::profile(&temperatures, tuning)
    }

    /// Aggregate counters and compression distribution.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let mut distribution: IndexMap<String, usize> = CompressionLevel::all()
            .iter()
            .map(|level| (level.label().to_string(), 0))
            .collect();
        for pattern in inner.patterns.values() {
            *distribution
                .entry(pattern.compression.label().to_string())
                .or_insert(0) += 1;
        }
        StoreStats {
            total_patterns: inner.patterns.len(),
            store_count: inner.store_count,
            retrieve_count: inner.retrieve_count,
            compression_distribution: distribution,
        }
    }

    /// Plain-record snapshot of the full population (metadata included).
    #[must_use]
    pub fn snapshot(&self) -> Vec<PatternRecord<T>> {
        self.inner
            .read()
            .patterns
            .values()
            .map(PatternRecord::from)
            .collect()
    }

    /// Replaces the population from plain records, preserving their decay
    /// metadata. Operation counters are unaffected.
    pub fn restore(&self, records: Vec<PatternRecord<T>>) {
        let mut inner = self.inner.write();
        inner.patterns = records
            .into_iter()
            .map(|record| (record.id.clone(), Pattern::from(record)))
            .collect();
    }

    /// Persists the current snapshot through a backend.
    pub fn save_snapshot(
        &self,
        backend: &impl SnapshotBackend<T>,
    ) -> Result<usize, SnapshotError> {
        let snapshot = self.snapshot();
        backend.save(&snapshot)?;
        Ok(snapshot.len())
    }

    /// Replaces the population from a backend's snapshot.
    pub fn load_snapshot(
        &self,
        backend: &impl SnapshotBackend<T>,
    ) -> Result<usize, SnapshotError> {
        let records = backend.load()?;
        let count = records.len();
        self.restore(records);
        Ok(count)
    }

    fn ranked<F>(&self, limit: usize, score_fn: F) -> Vec<ResonanceResult<T>>
    where
        F: Fn(&Pattern<T>, DateTime<Utc>) -> f32,
    {
        let mut inner = self.inner.write();
        inner.retrieve_count += 1;
        if limit == 0 || inner.patterns.is_empty() {
            return Vec::new();
        }
        let now = Utc::now();
        let mut scored: Vec<(String, f32, DateTime<Utc>, f32)> = inner
            .patterns
            .values()
            .filter_map(|pattern| {
                let score = score_fn(pattern, now);
                if score > 0.0 {
                    Some((pattern.id.clone(), score, pattern.last_accessed, pattern.strength))
                } else {
                    None
                }
            })
            .collect();
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| b.3.total_cmp(&a.3))
        });
        scored.truncate(limit);
        let mut results = Vec::with_capacity(scored.len());
        for (id, similarity, _, _) in scored {
            if let Some(pattern) = inner.patterns.get_mut(&id) {
                pattern.touch(&self.config.decay);
                results.push(ResonanceResult {
                    pattern: pattern.clone(),
                    similarity,
                });
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashingEmbedder;
    use crate::snapshot::JsonSnapshotBackend;
    use chrono::Duration;
    use tempfile::tempdir;

    fn seeded_store() -> PatternStore<String> {
        let store = PatternStore::new();
        store.store(
            "python-programming",
            "learning python programming every week".to_string(),
            ["python", "programming"],
            None,
        );
        store.store(
            "python-snake",
            "a python is a constricting snake".to_string(),
            ["python", "animals"],
            None,
        );
        store
    }

    fn age_pattern(store: &PatternStore<String>, id: &str, idle: Duration, strength: f32) {
        let mut records = store.snapshot();
        for record in &mut records {
            if record.id == id {
                record.last_accessed = Utc::now() - idle;
                record.created_at = Utc::now() - idle;
                record.strength = strength;
            }
        }
        store.restore(records);
    }

    #[test]
    fn retrieve_on_empty_store_returns_nothing() {
        let store: PatternStore<String> = PatternStore::new();
        assert!(store.retrieve("anything at all", 5).is_empty());
    }

    #[test]
    fn concept_retrieval_partitions_exactly() {
        let store = seeded_store();
        let both = store.retrieve_by_concept("python");
        assert_eq!(both.len(), 2);
        let programming = store.retrieve_by_concept("programming");
        assert_eq!(programming.len(), 1);
        assert_eq!(programming[0].pattern.id, "python-programming");
        assert!((programming[0].similarity - 1.0).abs() < f32::EPSILON);
        assert!(store.retrieve_by_concept("chemistry").is_empty());
    }

    #[test]
    fn text_retrieval_ranks_the_right_pattern_first() {
        let store = seeded_store();
        let results = store.retrieve("programming", 5);
        assert!(!results.is_empty());
        assert_eq!(results[0].pattern.id, "python-programming");
        let results = store.retrieve("snake", 5);
        assert_eq!(results[0].pattern.id, "python-snake");
    }

    #[test]
    fn retrieval_is_active_reconstruction() {
        let store = seeded_store();
        let before = store.get("python-snake").unwrap();
        let results = store.retrieve("snake", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pattern.access_count, before.access_count + 1);
        assert!(results[0].pattern.strength > before.strength);
        let after = store.get("python-snake").unwrap();
        assert_eq!(after.access_count, before.access_count + 1);
        assert!(after.last_accessed >= before.last_accessed);
    }

    #[test]
    fn limit_bounds_the_result_set() {
        let store = seeded_store();
        assert_eq!(store.retrieve("python", 1).len(), 1);
        assert!(store.retrieve("python", 0).is_empty());
    }

    #[test]
    fn storing_an_existing_id_is_a_fresh_upsert() {
        let store = seeded_store();
        store.demote("python-snake", 2).unwrap();
        store.retrieve("snake", 1);
        let replaced = store.store(
            "python-snake",
            "pythons hunt by ambush".to_string(),
            ["python", "animals"],
            None,
        );
        assert_eq!(store.len(), 2);
        assert_eq!(replaced.compression, CompressionLevel::Full);
        assert_eq!(replaced.access_count, 1);
        assert!((replaced.strength - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn promote_and_demote_clamp_and_report_missing_ids() {
        let store = seeded_store();
        assert_eq!(
            store.demote("python-snake", 10).unwrap(),
            CompressionLevel::Low
        );
        assert_eq!(
            store.promote("python-snake", 10).unwrap(),
            CompressionLevel::Full
        );
        let missing = store.promote("unknown", 1);
        assert!(matches!(
            missing,
            Err(PatternStoreError::NotFound { ref id }) if id == "unknown"
        ));
    }

    #[test]
    fn compress_demotes_the_coldest_fraction() {
        let store = seeded_store();
        age_pattern(&store, "python-snake", Duration::hours(12), 1.0);
        let demoted = store.compress(0.5);
        assert_eq!(demoted, 1);
        assert_eq!(
            store.get("python-snake").unwrap().compression,
            CompressionLevel::High
        );
        assert_eq!(
            store.get("python-programming").unwrap().compression,
            CompressionLevel::Full
        );
    }

    #[test]
    fn consolidation_reaches_a_fixed_point() {
        let store = seeded_store();
        // Cold but strong enough to stay above the retention floor: demoted,
        // not forgotten.
        age_pattern(&store, "python-snake", Duration::hours(28), 2.0);
        let first = store.consolidate();
        assert_eq!(first.demoted, 1);
        assert_eq!(first.removed, 0);
        assert_eq!(
            store.get("python-snake").unwrap().compression,
            CompressionLevel::Low
        );
        let second = store.consolidate();
        assert_eq!(second.promoted, 0);
        assert_eq!(second.demoted, 0);
    }

    #[test]
    fn consolidation_promotes_hot_patterns() {
        let store = seeded_store();
        store.demote("python-programming", 2).unwrap();
        let mut records = store.snapshot();
        for record in &mut records {
            if record.id == "python-programming" {
                record.access_count = 16;
            }
        }
        store.restore(records);
        let stats = store.consolidate();
        assert_eq!(stats.promoted, 1);
        assert_eq!(
            store.get("python-programming").unwrap().compression,
            CompressionLevel::Full
        );
        assert!(store.consolidate().is_noop());
    }

    #[test]
    fn consolidation_forgets_exhausted_patterns() {
        let store = seeded_store();
        age_pattern(&store, "python-snake", Duration::days(3), 1.0);
        let stats = store.consolidate();
        assert_eq!(stats.removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("python-snake").is_none());
    }

    #[test]
    fn stats_track_operations_and_distribution() {
        let store = seeded_store();
        store.retrieve("python", 5);
        store.demote("python-snake", 1).unwrap();
        let stats = store.stats();
        assert_eq!(stats.total_patterns, 2);
        assert_eq!(stats.store_count, 2);
        assert_eq!(stats.retrieve_count, 1);
        assert_eq!(stats.compression_distribution["FULL"], 1);
        assert_eq!(stats.compression_distribution["HIGH"], 1);
        assert_eq!(stats.compression_distribution["LOW"], 0);
    }

    #[test]
    fn snapshot_round_trips_through_json_backend() {
        let dir = tempdir().unwrap();
        let backend = JsonSnapshotBackend::new(dir.path());
        let store = seeded_store();
        store.retrieve("python", 5);
        let saved = store.save_snapshot(&backend).unwrap();
        assert_eq!(saved, 2);

        let revived: PatternStore<String> = PatternStore::new();
        let loaded = revived.load_snapshot(&backend).unwrap();
        assert_eq!(loaded, 2);
        let original = store.get("python-programming").unwrap();
        let restored = revived.get("python-programming").unwrap();
        assert_eq!(restored.access_count, original.access_count);
        assert_eq!(restored.compression, original.compression);
        assert!((restored.strength - original.strength).abs() < f32::EPSILON);
    }

    #[test]
    fn embedder_backfills_vectors_and_serves_embedding_cues() {
        let embedder = Arc::new(HashingEmbedder::new(64));
        let store: PatternStore<String> =
            PatternStore::new().with_embedder(embedder.clone());
        store.store(
            "deploy-note",
            "deploy pipeline failed on friday".to_string(),
            ["ops"],
            None,
        );
        assert!(store.get("deploy-note").unwrap().embedding.is_some());
        let cue = embedder.embed("deploy pipeline");
        let results = store.retrieve_by_embedding(&cue, 3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pattern.id, "deploy-note");
        assert!(results[0].similarity > 0.0);
    }

    #[test]
    fn temperature_profile_reflects_population() {
        let store = seeded_store();
        let profile = store.temperature_profile(&store.config().consolidation);
        assert_eq!(profile.total, 2);
        assert!(profile.mean > 0.3 && profile.mean < 0.8);
    }
}
