use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Partial retrieval cue. Any combination of fields may be populated; an
/// empty cue is a valid value that resolves to a zero-confidence recollection
/// rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cue {
    /// Free-text fragment of the sought memory.
    pub text: Option<String>,
    /// Concept tags the memory should carry.
    pub concepts: IndexSet<String>,
    /// Vector rendering of the sought memory.
    pub embedding: Option<Vec<f32>>,
}

impl Cue {
    /// A cue carrying only free text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A cue carrying only concept tags.
    #[must_use]
    pub fn from_concepts(concepts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            concepts: concepts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A cue carrying only an embedding vector.
    #[must_use]
    pub fn from_embedding(embedding: Vec<f32>) -> Self {
        Self {
            embedding: Some(embedding),
            ..Self::default()
        }
    }

    /// Adds a concept tag to an existing cue.
    #[must_use]
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concepts.insert(concept.into());
        self
    }

    /// Whether no field carries usable information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let blank_text = self
            .text
            .as_ref()
            .map_or(true, |text| text.trim().is_empty());
        let blank_embedding = self
            .embedding
            .as_ref()
            .map_or(true, std::vec::Vec::is_empty);
        blank_text && self.concepts.is_empty() && blank_embedding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cue_is_empty() {
        assert!(Cue::default().is_empty());
        assert!(Cue::from_text("   ").is_empty());
        assert!(Cue::from_embedding(Vec::new()).is_empty());
    }

    #[test]
    fn populated_cues_are_not_empty() {
        assert!(!Cue::from_text("resonance").is_empty());
        assert!(!Cue::from_concepts(["python"]).is_empty());
        assert!(!Cue::from_embedding(vec![0.1, 0.2]).is_empty());
        assert!(!Cue::default().with_concept("ops").is_empty());
    }
}
