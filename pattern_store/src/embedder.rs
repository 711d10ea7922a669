use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::resonance::tokenize;

/// Injectable embedding strategy.
///
/// The store treats this as an external collaborator: when absent, retrieval
/// degrades gracefully to lexical token overlap.
pub trait Embedder: Send + Sync {
    /// Maps text to a fixed-length vector.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Deterministic bag-of-tokens embedder hashing tokens into a fixed number of
/// buckets. Not a semantic model; it gives tests and model-free deployments a
/// stable vector space.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    /// Creates an embedder producing `dims`-length vectors.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(1),
        }
    }

    /// Vector length produced by this embedder.
    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dims];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dims as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for component in &mut vector {
                *component /= norm;
            }
        }
        vector
    }
}
