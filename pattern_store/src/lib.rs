#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Holographic long-term memory: decay-aware pattern storage with resonance-ranked,
//! cue-based retrieval and consolidation maintenance.

/// Forgetting-curve and temperature math.
pub mod decay;
/// Injectable embedding strategy.
pub mod embedder;
/// Pattern data model and compression levels.
pub mod pattern;
/// Resonance scoring (lexical overlap, cosine similarity, score blending).
pub mod resonance;
/// Serialization-agnostic persistence boundary.
pub mod snapshot;

/// Long-term pattern store runtime.
#[path = "../store.rs"]
pub mod store;

pub use decay::{ConsolidationTuning, DecayTuning, TemperatureProfile};
pub use embedder::{Embedder, HashingEmbedder};
pub use pattern::{CompressionLevel, Pattern, PatternContent, PatternRecord};
pub use resonance::{ResonanceResult, RetrievalWeights};
pub use snapshot::{JsonSnapshotBackend, SnapshotBackend, SnapshotError};
pub use store::{ConsolidationStats, PatternStore, PatternStoreError, StoreConfig, StoreStats};
