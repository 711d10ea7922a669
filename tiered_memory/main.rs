//! Tiered-memory runtime: perceive → attend → consolidate → recall.

use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use holo_pattern_store::pattern::PatternContent;
use holo_pattern_store::resonance::{tokenize, ResonanceResult};
use holo_pattern_store::store::{PatternStore, StoreStats};
use shared_telemetry::{LogLevel, Telemetry};

use crate::{
    attention::AttentionFilter,
    sensory::{SensoryBuffer, SensoryEntry},
    working::{WorkingChunk, WorkingMemory},
};

/// Tier sizing and gating configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    /// Sensory buffer capacity.
    pub sensory_capacity: usize,
    /// Sensory time-to-live in seconds.
    pub sensory_ttl_secs: f64,
    /// Minimum salience admitted by the attention filter.
    pub attention_threshold: f32,
    /// Working-memory chunk capacity.
    pub working_capacity: usize,
    /// Working-memory activation half-life in seconds.
    pub activation_half_life_secs: f64,
    /// Minimum activation consolidated into long-term storage.
    pub consolidation_floor: f32,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            sensory_capacity: 32,
            sensory_ttl_secs: 30.0,
            attention_threshold: 0.3,
            working_capacity: 7,
            activation_half_life_secs: 60.0,
            consolidation_floor: 0.0,
        }
    }
}

/// Outcome of one consolidation sweep over working memory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConsolidateSummary {
    /// Chunks migrated into the long-term store.
    pub consolidated: usize,
}

/// Occupancy of the sensory tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensoryStats {
    /// Entries currently buffered.
    pub held: usize,
    /// Configured capacity.
    pub capacity: usize,
}

/// Occupancy of the working tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingStats {
    /// Chunks currently held.
    pub held: usize,
    /// Configured capacity.
    pub capacity: usize,
    /// Fill level in `[0, 1]`.
    pub utilization: f32,
}

/// Aggregate statistics across all three tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierStats {
    /// Sensory buffer occupancy.
    pub sensory: SensoryStats,
    /// Working memory occupancy.
    pub working: WorkingStats,
    /// Long-term store counters.
    pub longterm: StoreStats,
}

/// Orchestrates the sensory buffer, attention filter, working memory, and
/// long-term pattern store as one memory pipeline.
#[derive(Debug)]
pub struct TieredMemory<T: PatternContent> {
    config: TierConfig,
    sensory: SensoryBuffer<T>,
    attention: AttentionFilter,
    working: WorkingMemory<T>,
    long_term: Arc<PatternStore<T>>,
    telemetry: Option<Telemetry>,
}

impl<T: PatternContent> TieredMemory<T> {
    /// Creates a pipeline over the given long-term store with default tiers.
    #[must_use]
    pub fn new(long_term: Arc<PatternStore<T>>) -> Self {
        Self::with_config(TierConfig::default(), long_term)
    }

    /// Creates a pipeline with explicit tier configuration.
    #[must_use]
    pub fn with_config(config: TierConfig, long_term: Arc<PatternStore<T>>) -> Self {
        Self {
            sensory: SensoryBuffer::new(config.sensory_capacity, config.sensory_ttl_secs),
            attention: AttentionFilter::new(config.attention_threshold),
            working: WorkingMemory::new(config.working_capacity, config.activation_half_life_secs),
            config,
            long_term,
            telemetry: None,
        }
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Stages raw input in the sensory buffer.
    pub fn perceive(&self, content: T, salience: f32) -> SensoryEntry<T> {
        let entry = self.sensory.perceive(content, salience);
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Debug,
                "tiers.perceive",
                json!({ "salience": entry.salience }),
            );
        }
        entry
    }

    /// Drains the sensory buffer through the attention filter and loads the
    /// survivors into working memory. Returns the created chunk ids.
    ///
    /// Chunks displaced by working-memory capacity pressure are consolidated
    /// immediately rather than lost.
    pub fn attend(&self, focus: Option<&str>) -> Vec<String> {
        let staged = self.sensory.drain();
        let attended = self.attention.filter(&staged, focus);
        let mut chunk_ids = Vec::with_capacity(attended.len());
        for entry in attended {
            let concepts = derive_concepts(&entry.content);
            let id = Uuid::new_v4().to_string();
            if let Some(evicted) = self.working.load(id.clone(), entry.content, concepts) {
                self.consolidate_chunk(&evicted);
            }
            chunk_ids.push(id);
        }
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "tiers.attend",
                json!({ "staged": staged.len(), "loaded": chunk_ids.len() }),
            );
        }
        chunk_ids
    }

    /// Bypass path: places content directly into working memory, skipping the
    /// sensory and attention tiers. Returns the chunk id.
    pub fn load_to_working(
        &self,
        content: T,
        concepts: impl IntoIterator<Item = impl Into<String>>,
    ) -> String {
        let concept_set: IndexSet<String> = concepts.into_iter().map(Into::into).collect();
        let id = Uuid::new_v4().to_string();
        if let Some(evicted) = self.working.load(id.clone(), content, concept_set) {
            self.consolidate_chunk(&evicted);
        }
        id
    }

    /// Migrates sufficiently active working chunks into the long-term store
    /// and unloads them.
    pub fn consolidate(&self) -> ConsolidateSummary {
        let now = chrono::Utc::now();
        let mut consolidated = 0;
        for chunk in self.working.snapshot() {
            if chunk.current_activation(now, self.config.activation_half_life_secs)
                >= self.config.consolidation_floor
            {
                self.consolidate_chunk(&chunk);
                self.working.unload(&chunk.id);
                consolidated += 1;
            }
        }
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "tiers.consolidate",
                json!({ "consolidated": consolidated }),
            );
            let _ = tel.event("tiers.consolidate.completed", json!({ "count": consolidated }));
        }
        ConsolidateSummary { consolidated }
    }

    /// Cue-based recall from the long-term store.
    pub fn recall(&self, query: &str, limit: usize) -> Vec<ResonanceResult<T>> {
        let results = self.long_term.retrieve(query, limit);
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Debug,
                "tiers.recall",
                json!({ "query": query, "hits": results.len() }),
            );
        }
        results
    }

    /// Occupancy and counters across all three tiers.
    #[must_use]
    pub fn stats(&self) -> TierStats {
        TierStats {
            sensory: SensoryStats {
                held: self.sensory.len(),
                capacity: self.sensory.capacity(),
            },
            working: WorkingStats {
                held: self.working.len(),
                capacity: self.working.capacity(),
                utilization: self.working.utilization(),
            },
            longterm: self.long_term.stats(),
        }
    }

    /// The long-term store behind this pipeline.
    #[must_use]
    pub fn long_term(&self) -> &Arc<PatternStore<T>> {
        &self.long_term
    }

    /// Direct access to the working tier.
    #[must_use]
    pub const fn working(&self) -> &WorkingMemory<T> {
        &self.working
    }

    /// Direct access to the sensory tier.
    #[must_use]
    pub const fn sensory(&self) -> &SensoryBuffer<T> {
        &self.sensory
    }

    fn consolidate_chunk(&self, chunk: &WorkingChunk<T>) {
        self.long_term.store(
            chunk.id.clone(),
            chunk.content.clone(),
            chunk.concepts.iter().cloned(),
            None,
        );
    }
}

/// Concept tags derived from a payload's textual rendering: the first few
/// distinctive tokens.
fn derive_concepts<T: PatternContent>(content: &T) -> IndexSet<String> {
    content.as_text().map_or_else(IndexSet::new, |text| {
        tokenize(&text)
            .into_iter()
            .filter(|token| token.len() > 3)
            .take(5)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_telemetry::MemoryEventBus;
    use tempfile::tempdir;

    fn pipeline() -> TieredMemory<String> {
        TieredMemory::new(Arc::new(PatternStore::new()))
    }

    #[test]
    fn perceive_attend_consolidate_recall_round_trip() {
        let memory = pipeline();
        memory.perceive("deploy pipeline failed overnight".to_string(), 0.9);
        let before = memory.working().len();
        let chunk_ids = memory.attend(Some("deploy"));
        assert_eq!(chunk_ids.len(), 1);
        assert_eq!(memory.working().len(), before + 1);

        let summary = memory.consolidate();
        assert_eq!(summary.consolidated, 1);
        assert_eq!(memory.working().len(), before);
        assert_eq!(memory.long_term().len(), 1);

        let recalled = memory.recall("deploy pipeline", 5);
        assert!(!recalled.is_empty());
        assert_eq!(recalled[0].pattern.id, chunk_ids[0]);
    }

    #[test]
    fn attend_filters_low_salience_noise() {
        let memory = pipeline();
        memory.perceive("background hum".to_string(), 0.05);
        memory.perceive("alert fired".to_string(), 0.95);
        let chunk_ids = memory.attend(None);
        assert_eq!(chunk_ids.len(), 1);
        assert!(memory.sensory().is_empty());
    }

    #[test]
    fn capacity_evicted_chunks_are_consolidated_not_lost() {
        let config = TierConfig {
            working_capacity: 2,
            ..TierConfig::default()
        };
        let memory = TieredMemory::with_config(config, Arc::new(PatternStore::new()));
        memory.load_to_working("first note".to_string(), ["alpha"]);
        memory.load_to_working("second note".to_string(), ["beta"]);
        memory.load_to_working("third note".to_string(), ["gamma"]);
        assert_eq!(memory.working().len(), 2);
        // The displaced chunk went straight to long-term storage.
        assert_eq!(memory.long_term().len(), 1);
        let results = memory.long_term().retrieve_by_concept("alpha");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn stats_cover_all_three_tiers() {
        let memory = pipeline();
        memory.perceive("observation".to_string(), 0.6);
        memory.load_to_working("task context".to_string(), ["task"]);
        let stats = memory.stats();
        assert_eq!(stats.sensory.held, 1);
        assert_eq!(stats.working.held, 1);
        assert_eq!(stats.longterm.total_patterns, 0);
        assert!(stats.working.utilization > 0.0);
    }

    #[test]
    fn telemetry_records_pipeline_events() {
        let dir = tempdir().unwrap();
        let bus = Arc::new(MemoryEventBus::new(8));
        let telemetry = Telemetry::builder("tiers")
            .log_path(dir.path().join("tiers.log"))
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        let memory = pipeline().with_telemetry(telemetry);
        memory.perceive("observability matters".to_string(), 0.8);
        memory.attend(None);
        memory.consolidate();
        let content = std::fs::read_to_string(dir.path().join("tiers.log")).unwrap();
        assert!(content.contains("tiers.attend"));
        assert!(content.contains("tiers.consolidate"));
        assert_eq!(bus.snapshot().len(), 1);
    }
}
