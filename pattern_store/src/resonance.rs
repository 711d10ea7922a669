use std::collections::HashSet;

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;

/// Splits text into lowercase alphanumeric tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let token_re = Regex::new(r"[a-z0-9]+").unwrap();
    let lowered = text.to_lowercase();
    token_re
        .find_iter(&lowered)
        .map(|token| token.as_str().to_string())
        .collect()
}

/// Normalizes whitespace, case, and punctuation into a canonical token string.
#[must_use]
pub fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Token-overlap similarity: the fraction of cue tokens present in the
/// pattern's textual rendering or concept tags.
#[must_use]
pub fn lexical_similarity(
    cue_tokens: &[String],
    text: Option<&str>,
    concepts: &IndexSet<String>,
) -> f32 {
    if cue_tokens.is_empty() {
        return 0.0;
    }
    let mut vocab: HashSet<String> = HashSet::new();
    if let Some(text) = text {
        vocab.extend(tokenize(text));
    }
    for concept in concepts {
        vocab.extend(tokenize(concept));
    }
    if vocab.is_empty() {
        return 0.0;
    }
    let matched = cue_tokens
        .iter()
        .filter(|token| vocab.contains(*token))
        .count();
    (matched as f32 / cue_tokens.len() as f32).clamp(0.0, 1.0)
}

/// Cosine similarity tolerant of length mismatches: the dot product runs over
/// the overlapping prefix while the norms cover both full vectors, so missing
/// components behave as zeros rather than erroring.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

/// Weights combining the resonance components into a single score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalWeights {
    /// Weight of embedding cosine similarity when both sides carry vectors.
    pub embedding_weight: f32,
    /// Weight of lexical token overlap alongside embedding similarity.
    pub lexical_weight: f32,
    /// Floor of the retention multiplier; scores decay toward this share of
    /// their base similarity as retention falls.
    pub retention_bias: f32,
}

impl Default for RetrievalWeights {
    fn default() -> Self {
        Self {
            embedding_weight: 0.6,
            lexical_weight: 0.4,
            retention_bias: 0.35,
        }
    }
}

/// Retention-derived multiplier applied to base similarity.
#[must_use]
pub fn retention_multiplier(retention: f32, weights: &RetrievalWeights) -> f32 {
    let bias = weights.retention_bias.clamp(0.0, 1.0);
    bias + (1.0 - bias) * retention.clamp(0.0, 1.0)
}

/// Blends lexical and (optional) embedding similarity, then applies the
/// retention multiplier. Result is clamped to `[0, 1]`.
#[must_use]
pub fn blend_score(
    lexical: f32,
    embedding: Option<f32>,
    retention: f32,
    weights: &RetrievalWeights,
) -> f32 {
    let base = embedding.map_or(lexical, |cosine| {
        weights.embedding_weight * cosine.clamp(0.0, 1.0) + weights.lexical_weight * lexical
    });
    (base * retention_multiplier(retention, weights)).clamp(0.0, 1.0)
}

/// Read-only projection pairing a pattern clone with its resonance score.
/// Produced per retrieval; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResonanceResult<T> {
    /// Clone of the matched pattern.
    pub pattern: Pattern<T>,
    /// Resonance score in `[0, 1]`.
    pub similarity: f32,
}
