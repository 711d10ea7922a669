#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Three-tier short-term memory pipeline: sensory staging, attention gating,
//! and capacity-bound working memory, consolidating into long-term patterns.

/// Salience gate ordering sensory input for working memory.
pub mod attention;
/// Time-windowed sensory staging buffer.
pub mod sensory;
/// Capacity-bound working memory chunks.
pub mod working;

/// Tiered-memory orchestration entry point.
#[path = "../main.rs"]
pub mod orchestration_entry;

pub use attention::AttentionFilter;
pub use orchestration_entry::{
    ConsolidateSummary, SensoryStats, TierConfig, TierStats, TieredMemory, WorkingStats,
};
pub use sensory::{SensoryBuffer, SensoryEntry};
pub use working::{WorkingChunk, WorkingMemory};
