#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Cue-driven recollection: partial cues are dispatched against the pattern
//! store and the resonating candidates are reconstructed into an answer.

/// Retrieval cues over text, concepts, and embeddings.
pub mod cue;
/// Reconstruction products and method tags.
pub mod recollect;
/// Pluggable reconstruction strategies.
pub mod reconstruct;

/// Recollection agents (orchestration entry point).
#[path = "../main.rs"]
pub mod orchestration_entry;

pub use cue::Cue;
pub use orchestration_entry::{ContextualRecollectionAgent, RecollectionAgent};
pub use recollect::{Recollection, ReconstructionMethod};
pub use reconstruct::{Reconstructor, TopMatchReconstructor, WeightedSynthesisReconstructor};
