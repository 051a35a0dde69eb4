//! Greedy near-duplicate sentence removal.

use crate::metrics::{Metrics, Stage};
use crate::similarity::SimilarityEngine;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Default similarity above which a sentence counts as a duplicate
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Default number of sentences examined per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

pub struct Deduplicator {
    similarity: Arc<SimilarityEngine>,
    threshold: f64,
    batch_size: usize,
    metrics: Arc<Metrics>,
}

impl Deduplicator {
    pub fn new(
        similarity: Arc<SimilarityEngine>,
        threshold: f64,
        batch_size: usize,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            similarity,
            threshold,
            batch_size: batch_size.max(1),
            metrics,
        }
    }

    /// Drop every sentence scoring above the threshold against a sentence
    /// already kept. Blank entries are skipped. Kept sentences stay in input
    /// order.
    ///
    /// Input is walked in fixed-size batches; the kept list carries across
    /// batches, so the result is the same as a single pass.
    pub fn remove_duplicates<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<String> {
        let start = Instant::now();
        let mut kept: Vec<String> = Vec::new();

        for batch in sentences.chunks(self.batch_size) {
            for sentence in batch {
                let sentence = sentence.as_ref();
                if sentence.trim().is_empty() {
                    continue;
                }
                let duplicate = kept
                    .iter()
                    .any(|existing| self.similarity.similarity(sentence, existing) > self.threshold);
                if !duplicate {
                    kept.push(sentence.to_string());
                }
            }
        }

        self.metrics.record(Stage::DuplicateRemoval, start.elapsed());
        debug!(
            input = sentences.len(),
            kept = kept.len(),
            "Removed duplicate sentences"
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dedup(batch_size: usize) -> Deduplicator {
        let metrics = Arc::new(Metrics::new());
        let similarity = Arc::new(SimilarityEngine::new(1000, Arc::clone(&metrics)));
        Deduplicator::new(similarity, DEFAULT_THRESHOLD, batch_size, metrics)
    }

    #[test]
    fn test_drops_paraphrase() {
        let kept = dedup(DEFAULT_BATCH_SIZE).remove_duplicates(&[
            "Hamilton wins the race",
            "Hamilton is victorious in the race",
        ]);
        assert_eq!(kept, vec!["Hamilton wins the race"]);
    }

    #[test]
    fn test_keeps_distinct_sentences_in_order() {
        let input = [
            "Lewis Hamilton wins the race",
            "Max Verstappen finished second",
            "Perez completes podium finish",
        ];
        let kept = dedup(DEFAULT_BATCH_SIZE).remove_duplicates(&input);
        assert_eq!(kept, input.to_vec());
    }

    #[test]
    fn test_skips_blank_entries() {
        let kept = dedup(DEFAULT_BATCH_SIZE).remove_duplicates(&["", "   ", "Markets rally"]);
        assert_eq!(kept, vec!["Markets rally"]);
    }

    #[test]
    fn test_keeps_distinct_symbol_only_sentences() {
        let kept = dedup(DEFAULT_BATCH_SIZE).remove_duplicates(&["🏁", "🏆", "—", "🏁"]);
        assert_eq!(kept, vec!["🏁", "🏆", "—"]);
    }

    #[test]
    fn test_exact_duplicates_dropped() {
        let kept = dedup(DEFAULT_BATCH_SIZE).remove_duplicates(&[
            "Storm hits the coast",
            "Markets rally on rate cut",
            "Storm hits the coast",
        ]);
        assert_eq!(kept, vec!["Storm hits the coast", "Markets rally on rate cut"]);
    }

    #[test]
    fn test_batching_spans_boundaries() {
        let mut input: Vec<String> = (0..12)
            .map(|i| format!("Unrelated headline number {} about topic {}", i, i * 7))
            .collect();
        input.insert(0, "Central bank holds interest rates steady".to_string());
        input.push("Central bank holds interest rates steady".to_string());

        let small = dedup(3).remove_duplicates(&input);
        let single = dedup(input.len()).remove_duplicates(&input);
        assert_eq!(small, single);
        assert_eq!(
            small
                .iter()
                .filter(|s| s.starts_with("Central bank"))
                .count(),
            1
        );
    }

    #[test]
    fn test_idempotent() {
        let d = dedup(DEFAULT_BATCH_SIZE);
        let input = [
            "Hamilton wins the race",
            "Hamilton is victorious in the race",
            "Verstappen second",
            "Verstappen finished second",
        ];
        let once = d.remove_duplicates(&input);
        let twice = d.remove_duplicates(&once);
        assert_eq!(once, twice);
    }
}
