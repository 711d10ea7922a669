use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Activation added whenever a chunk is read or rewritten.
const ACCESS_BOOST: f32 = 0.25;

/// A unit of attended content held in working memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingChunk<T> {
    /// Chunk identifier.
    pub id: String,
    /// Attended payload.
    pub content: T,
    /// Concept tags carried into consolidation.
    pub concepts: IndexSet<String>,
    /// Activation at the moment of the last boost.
    pub activation: f32,
    /// Insertion timestamp (eviction tiebreak).
    pub loaded_at: DateTime<Utc>,
    /// Timestamp of the last activation boost.
    pub last_boosted: DateTime<Utc>,
}

impl<T> WorkingChunk<T> {
    /// Activation right now: the stored level decayed exponentially since the
    /// last boost.
    #[must_use]
    pub fn current_activation(&self, now: DateTime<Utc>, half_life_secs: f64) -> f32 {
        let idle = ((now - self.last_boosted).num_milliseconds() as f64 / 1000.0).max(0.0);
        let half_life = half_life_secs.max(f64::EPSILON);
        self.activation * 0.5_f64.powf(idle / half_life) as f32
    }
}

/// Fixed-capacity chunk table modeling attentional span (default ≈7).
///
/// Overflow evicts exactly one chunk — the lowest current activation, oldest
/// insertion as tiebreak — and hands it back to the caller so it can be
/// consolidated instead of silently dropped.
#[derive(Debug)]
pub struct WorkingMemory<T> {
    capacity: usize,
    half_life_secs: f64,
    chunks: RwLock<IndexMap<String, WorkingChunk<T>>>,
}

impl<T: Clone> WorkingMemory<T> {
    /// Creates a table holding up to `capacity` chunks whose activation halves
    /// every `activation_half_life_secs`.
    #[must_use]
    pub fn new(capacity: usize, activation_half_life_secs: f64) -> Self {
        Self {
            capacity: capacity.max(1),
            half_life_secs: activation_half_life_secs.max(f64::EPSILON),
            chunks: RwLock::new(IndexMap::new()),
        }
    }

    /// Inserts (or rewrites) a chunk at full activation. Returns the chunk
    /// displaced by capacity pressure, if any.
    pub fn load(
        &self,
        id: impl Into<String>,
        content: T,
        concepts: IndexSet<String>,
    ) -> Option<WorkingChunk<T>> {
        let id = id.into();
        let now = Utc::now();
        let mut chunks = self.chunks.write();
        if let Some(existing) = chunks.get_mut(&id) {
            existing.content = content;
            existing.concepts = concepts;
            existing.activation =
                (existing.current_activation(now, self.half_life_secs) + ACCESS_BOOST).min(1.0);
            existing.last_boosted = now;
            return None;
        }
        let evicted = if chunks.len() >= self.capacity {
            // Strictly-less comparison keeps the earliest insertion among
            // equally cold chunks.
            let mut coldest: Option<(String, f32)> = None;
            for chunk in chunks.values() {
                let activation = chunk.current_activation(now, self.half_life_secs);
                if coldest
                    .as_ref()
                    .map_or(true, |(_, lowest)| activation < *lowest)
                {
                    coldest = Some((chunk.id.clone(), activation));
                }
            }
            coldest.and_then(|(coldest_id, _)| chunks.shift_remove(&coldest_id))
        } else {
            None
        };
        chunks.insert(
            id.clone(),
            WorkingChunk {
                id,
                content,
                concepts,
                activation: 1.0,
                loaded_at: now,
                last_boosted: now,
            },
        );
        evicted
    }

    /// Reads a chunk, boosting its activation (recency effect).
    pub fn get(&self, id: &str) -> Option<WorkingChunk<T>> {
        let now = Utc::now();
        let mut chunks = self.chunks.write();
        let chunk = chunks.get_mut(id)?;
        chunk.activation =
            (chunk.current_activation(now, self.half_life_secs) + ACCESS_BOOST).min(1.0);
        chunk.last_boosted = now;
        Some(chunk.clone())
    }

    /// Removes a chunk explicitly.
    pub fn unload(&self, id: &str) -> Option<WorkingChunk<T>> {
        self.chunks.write().shift_remove(id)
    }

    /// Chunks whose concepts contain `concept` (case-insensitive).
    #[must_use]
    pub fn find_by_concept(&self, concept: &str) -> Vec<WorkingChunk<T>> {
        let needle = concept.to_lowercase();
        self.chunks
            .read()
            .values()
            .filter(|chunk| {
                chunk
                    .concepts
                    .iter()
                    .any(|candidate| candidate.to_lowercase() == needle)
            })
            .cloned()
            .collect()
    }

    /// Chunks whose current activation meets `min_activation`.
    #[must_use]
    pub fn active_chunks(&self, min_activation: f32) -> Vec<WorkingChunk<T>> {
        let now = Utc::now();
        self.chunks
            .read()
            .values()
            .filter(|chunk| chunk.current_activation(now, self.half_life_secs) >= min_activation)
            .cloned()
            .collect()
    }

    /// Clones of every held chunk, insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<WorkingChunk<T>> {
        self.chunks.read().values().cloned().collect()
    }

    /// Number of chunks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fill level in `[0, 1]`.
    #[must_use]
    pub fn utilization(&self) -> f32 {
        self.len() as f32 / self.capacity as f32
    }

    /// Activation decay half-life in seconds.
    #[must_use]
    pub const fn half_life_secs(&self) -> f64 {
        self.half_life_secs
    }
}
