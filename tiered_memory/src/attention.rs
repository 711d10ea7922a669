use holo_pattern_store::pattern::PatternContent;
use holo_pattern_store::resonance::{lexical_similarity, tokenize};
use indexmap::IndexSet;

use crate::sensory::SensoryEntry;

/// Stateless salience gate between the sensory buffer and working memory.
///
/// A pure function over its inputs: it owns no entries and keeps no state
/// between calls.
#[derive(Debug, Clone, Copy)]
pub struct AttentionFilter {
    threshold: f32,
}

impl AttentionFilter {
    /// Creates a filter dropping entries below `threshold` salience.
    #[must_use]
    pub const fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Configured salience threshold.
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Keeps entries at or above the salience threshold. With a focus, the
    /// entries whose content relates to it come first; within each group the
    /// original recency order is preserved.
    #[must_use]
    pub fn filter<T: PatternContent>(
        &self,
        entries: &[SensoryEntry<T>],
        focus: Option<&str>,
    ) -> Vec<SensoryEntry<T>> {
        let mut survivors: Vec<SensoryEntry<T>> = entries
            .iter()
            .filter(|entry| entry.salience >= self.threshold)
            .cloned()
            .collect();
        if let Some(focus) = focus {
            let focus_tokens = tokenize(focus);
            if !focus_tokens.is_empty() {
                let no_concepts = IndexSet::new();
                survivors.sort_by_cached_key(|entry| {
                    let related = lexical_similarity(
                        &focus_tokens,
                        entry.content.as_text().as_deref(),
                        &no_concepts,
                    ) > 0.0;
                    !related
                });
            }
        }
        survivors
    }
}

impl Default for AttentionFilter {
    fn default() -> Self {
        Self::new(0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(content: &str, salience: f32) -> SensoryEntry<String> {
        SensoryEntry {
            content: content.to_string(),
            salience,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn drops_low_salience_entries() {
        let filter = AttentionFilter::new(0.5);
        let entries = vec![entry("noise", 0.1), entry("signal", 0.9)];
        let kept = filter.filter(&entries, None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].content, "signal");
    }

    #[test]
    fn focus_orders_related_entries_first() {
        let filter = AttentionFilter::new(0.0);
        let entries = vec![
            entry("weather is sunny", 0.8),
            entry("deploy failed in staging", 0.8),
            entry("lunch plans", 0.8),
            entry("deploy rollback finished", 0.8),
        ];
        let kept = filter.filter(&entries, Some("deploy"));
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[0].content, "deploy failed in staging");
        assert_eq!(kept[1].content, "deploy rollback finished");
        // Unrelated entries keep their original order.
        assert_eq!(kept[2].content, "weather is sunny");
        assert_eq!(kept[3].content, "lunch plans");
    }

    #[test]
    fn without_focus_original_order_is_kept() {
        let filter = AttentionFilter::new(0.0);
        let entries = vec![entry("first", 0.4), entry("second", 0.4)];
        let kept = filter.filter(&entries, None);
        assert_eq!(kept[0].content, "first");
        assert_eq!(kept[1].content, "second");
    }
}
