use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::decay::DecayTuning;

/// Discrete resolution tier a pattern is stored at. Lower tiers imply a
/// lossier, cheaper representation.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionLevel {
    /// Heavily compressed residue.
    Low,
    /// Reduced detail.
    Medium,
    /// Mostly intact.
    High,
    /// Full resolution.
    #[default]
    Full,
}

impl CompressionLevel {
    /// Label used in stats and telemetry payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Full => "FULL",
        }
    }

    /// All levels ordered from sharpest to coarsest.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Full, Self::High, Self::Medium, Self::Low]
    }

    /// One step toward `Full`, saturating at `Full`.
    #[must_use]
    pub const fn step_up(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Full => Self::Full,
        }
    }

    /// One step toward `Low`, saturating at `Low`.
    #[must_use]
    pub const fn step_down(self) -> Self {
        match self {
            Self::Full => Self::High,
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }

    /// Shifts by `levels` steps in the given direction, clamped to `[Low, Full]`.
    #[must_use]
    pub fn shifted_up(self, levels: u32) -> Self {
        (0..levels).fold(self, |level, _| level.step_up())
    }

    /// Shifts by `levels` steps toward `Low`, clamped to `[Low, Full]`.
    #[must_use]
    pub fn shifted_down(self, levels: u32) -> Self {
        (0..levels).fold(self, |level, _| level.step_down())
    }
}

/// Payload stored inside a pattern.
///
/// Implementors expose an optional textual rendering used for lexical
/// resonance scoring; payloads without a useful text form return `None` and
/// are matched through concepts and embeddings only.
pub trait PatternContent: Clone {
    /// Textual form used by token-overlap scoring.
    fn as_text(&self) -> Option<String>;
}

impl PatternContent for String {
    fn as_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl PatternContent for serde_json::Value {
    fn as_text(&self) -> Option<String> {
        match self {
            Self::String(text) => Some(text.clone()),
            Self::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// A stored memory unit with decay metadata.
///
/// Owned exclusively by the [`crate::store::PatternStore`] that created it;
/// callers always receive clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern<T> {
    /// Unique key.
    pub id: String,
    /// Opaque payload.
    pub content: T,
    /// Unordered concept tags; membership matters.
    pub concepts: IndexSet<String>,
    /// Optional fixed-length vector representation.
    pub embedding: Option<Vec<f32>>,
    /// Resolution tier.
    pub compression: CompressionLevel,
    /// Spaced-repetition multiplier, starts at 1.0 and grows on access.
    pub strength: f32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent access; only moves forward.
    pub last_accessed: DateTime<Utc>,
    /// Number of touches; the store call counts as the first.
    pub access_count: u64,
}

impl<T: PatternContent> Pattern<T> {
    /// Creates a fresh pattern; the creating store call is the first touch.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        content: T,
        concepts: IndexSet<String>,
        embedding: Option<Vec<f32>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            content,
            concepts,
            embedding,
            compression: CompressionLevel::Full,
            strength: 1.0,
            created_at: now,
            last_accessed: now,
            access_count: 1,
        }
    }

    /// Registers an access: bumps the counter, advances `last_accessed`, and
    /// reinforces strength (spaced repetition).
    pub fn touch(&mut self, tuning: &DecayTuning) {
        self.access_count = self.access_count.saturating_add(1);
        let now = Utc::now();
        if now > self.last_accessed {
            self.last_accessed = now;
        }
        self.strength = (self.strength + tuning.strength_gain).min(tuning.strength_cap);
    }

    /// Seconds elapsed since the last access (never negative).
    #[must_use]
    pub fn idle_seconds(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.last_accessed).num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    /// Seconds elapsed since creation (never negative).
    #[must_use]
    pub fn age_seconds(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.created_at).num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    /// Textual rendering of the payload, if it has one.
    #[must_use]
    pub fn content_text(&self) -> Option<String> {
        self.content.as_text()
    }
}

/// Plain serializable mirror of a [`Pattern`] used at the persistence
/// boundary. Carries no behavior so any backend can adapt it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRecord<T> {
    /// Unique key.
    pub id: String,
    /// Opaque payload.
    pub content: T,
    /// Concept tags.
    pub concepts: IndexSet<String>,
    /// Optional vector representation.
    pub embedding: Option<Vec<f32>>,
    /// Resolution tier.
    pub compression: CompressionLevel,
    /// Spaced-repetition multiplier.
    pub strength: f32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Most recent access timestamp.
    pub last_accessed: DateTime<Utc>,
    /// Touch counter.
    pub access_count: u64,
}

impl<T: Clone> From<&Pattern<T>> for PatternRecord<T> {
    fn from(pattern: &Pattern<T>) -> Self {
        Self {
            id: pattern.id.clone(),
            content: pattern.content.clone(),
            concepts: pattern.concepts.clone(),
            embedding: pattern.embedding.clone(),
            compression: pattern.compression,
            strength: pattern.strength,
            created_at: pattern.created_at,
            last_accessed: pattern.last_accessed,
            access_count: pattern.access_count,
        }
    }
}

impl<T> From<PatternRecord<T>> for Pattern<T> {
    fn from(record: PatternRecord<T>) -> Self {
        Self {
            id: record.id,
            content: record.content,
            concepts: record.concepts,
            embedding: record.embedding,
            compression: record.compression,
            strength: record.strength,
            created_at: record.created_at,
            last_accessed: record.last_accessed,
            access_count: record.access_count,
        }
    }
}
