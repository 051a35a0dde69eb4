//! Sentence similarity with a bounded result cache.
//!
//! Scores are the Sørensen–Dice coefficient over character bigrams of the
//! lower-cased, punctuation-free text. The cache is keyed by the ordered
//! pair, so `(a, b)` and `(b, a)` are stored separately.

use crate::cache::FifoCache;
use crate::error::{panic_message, EngineError};
use crate::metrics::Metrics;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Lower-case and drop everything except alphanumerics and whitespace
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Bigram overlap of two strings, in `[0, 1]`.
///
/// Identical inputs score 1.0. Inputs with nothing left after normalization
/// (punctuation, symbols, emoji) share no bigrams and score 0.0.
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (a, b) = (normalize(a), normalize(b));
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    strsim::sorensen_dice(&a, &b).clamp(0.0, 1.0)
}

/// [`bigram_similarity`], with any failure reported as
/// [`EngineError::Similarity`].
pub fn try_similarity(a: &str, b: &str) -> Result<f64, EngineError> {
    let score = panic::catch_unwind(AssertUnwindSafe(|| bigram_similarity(a, b)))
        .map_err(|payload| EngineError::Similarity(panic_message(payload.as_ref())))?;
    if score.is_nan() {
        return Err(EngineError::Similarity("score is NaN".to_string()));
    }
    Ok(score)
}

pub struct SimilarityEngine {
    cache: Mutex<FifoCache<(String, String), f64>>,
    metrics: Arc<Metrics>,
}

impl SimilarityEngine {
    pub fn new(cache_capacity: usize, metrics: Arc<Metrics>) -> Self {
        Self {
            cache: Mutex::new(FifoCache::new(cache_capacity)),
            metrics,
        }
    }

    /// Similarity of `a` and `b`. A failed computation scores `0.0`.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let key = (a.to_string(), b.to_string());
        let cached = self.cache.lock().get(&key).copied();
        if let Some(score) = cached {
            self.metrics.record_cache_hit();
            return score;
        }
        self.metrics.record_cache_miss();

        match try_similarity(a, b) {
            Ok(score) => {
                self.cache.lock().put(key, score);
                score
            }
            Err(e) => {
                warn!(error = %e, "Treating sentence pair as not similar");
                0.0
            }
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}
