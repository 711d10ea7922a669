#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Periodic maintenance over the holographic pattern store: mode-scaled
//! consolidation passes and forgetting-curve analysis.

/// Forgetting-curve analysis and spaced-repetition review intervals.
pub mod forgetting;
/// Consolidation modes and pass results.
pub mod modes;

/// Consolidation agent runtime (orchestration entry point).
#[path = "../main.rs"]
pub mod orchestration_entry;

pub use forgetting::{ForgettingCurveAgent, RetentionReport};
pub use modes::{ConsolidationMode, ConsolidationResult};
pub use orchestration_entry::{ConsolidationAgent, ScheduleTuning};
