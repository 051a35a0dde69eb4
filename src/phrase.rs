//! Three-word phrase extraction and its memoizing front end.

use crate::cache::FifoCache;
use crate::error::EngineError;
use crate::metrics::{Metrics, Stage};
use crate::pool::WorkerPool;
use crate::tokenizer::{tokenize, StopWords};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Tokens per phrase
pub const PHRASE_WIDTH: usize = 3;

/// Slide a three-token window over the filtered tokens of `text`.
///
/// Returns an empty list when fewer than three tokens survive filtering.
pub fn extract_phrases(text: &str, stopwords: &StopWords) -> Vec<String> {
    tokenize(text, stopwords)
        .windows(PHRASE_WIDTH)
        .map(|window| window.join(" "))
        .collect()
}

#[derive(Debug, Clone)]
struct CachedPhrases {
    text: String,
    phrases: Vec<String>,
}

/// Runs [`extract_phrases`] on the worker pool, memoizing results.
///
/// Cache entries are keyed by the first `key_chars` characters of the text.
/// An entry is only returned for the exact text it was computed from, so two
/// texts sharing a prefix never see each other's phrases.
pub struct PhraseExtractor {
    pool: Arc<WorkerPool>,
    stopwords: Arc<StopWords>,
    cache: Mutex<FifoCache<String, CachedPhrases>>,
    key_chars: usize,
    metrics: Arc<Metrics>,
}

impl PhraseExtractor {
    pub fn new(
        pool: Arc<WorkerPool>,
        stopwords: StopWords,
        cache_capacity: usize,
        key_chars: usize,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            pool,
            stopwords: Arc::new(stopwords),
            cache: Mutex::new(FifoCache::new(cache_capacity)),
            key_chars,
            metrics,
        }
    }

    /// Extract phrases from `text`, from cache when possible.
    pub async fn extract(&self, text: &str) -> Result<Vec<String>, EngineError> {
        let key = cache_key(text, self.key_chars);
        let cached = {
            let cache = self.cache.lock();
            cache
                .get(&key)
                .filter(|entry| entry.text == text)
                .map(|entry| entry.phrases.clone())
        };
        if let Some(phrases) = cached {
            self.metrics.record_cache_hit();
            return Ok(phrases);
        }
        self.metrics.record_cache_miss();

        let start = Instant::now();
        let owned = text.to_string();
        let stopwords = Arc::clone(&self.stopwords);
        let phrases = self
            .pool
            .submit(move || extract_phrases(&owned, &stopwords))?
            .outcome()
            .await?;
        self.metrics.record(Stage::PhraseExtraction, start.elapsed());
        debug!(phrases = phrases.len(), "Extracted phrases");

        self.cache.lock().put(
            key,
            CachedPhrases {
                text: text.to_string(),
                phrases: phrases.clone(),
            },
        );
        Ok(phrases)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

/// First `chars` characters of `text`
fn cache_key(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}
