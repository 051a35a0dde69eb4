//! Summary assembly.
//!
//! A `summarize` call moves through validation, theme detection, concurrent
//! per-article processing and confidence scoring, then either composes the
//! summary text or returns a fallback.

use crate::article::{articles_from_json, validate_articles, Article};
use crate::config::EngineConfig;
use crate::dedup::Deduplicator;
use crate::error::{EngineError, ErrorKind};
use crate::metrics::{Metrics, MetricsSnapshot, Stage};
use crate::phrase::PhraseExtractor;
use crate::pool::{default_pool_size, WorkerPool};
use crate::similarity::SimilarityEngine;
use crate::summary::{ArticleProcessingResult, Summary};
use crate::themes::ThemeDetector;
use crate::tokenizer::StopWords;
use futures::future::join_all;
use indexmap::IndexSet;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

struct EngineInner {
    config: EngineConfig,
    pool: Arc<WorkerPool>,
    extractor: Arc<PhraseExtractor>,
    similarity: Arc<SimilarityEngine>,
    deduplicator: Deduplicator,
    theme_detector: ThemeDetector,
    metrics: Arc<Metrics>,
    #[cfg(test)]
    faults: parking_lot::Mutex<std::collections::HashMap<String, Fault>>,
}

/// Forced per-article failure, keyed by source.
#[cfg(test)]
#[derive(Clone, Copy)]
enum Fault {
    Error,
    Panic,
}

/// The summarisation engine.
///
/// Owns the worker pool and both caches. Cloning is cheap and clones share
/// all state. Call [`SummaryEngine::shutdown`] once when done.
#[derive(Clone)]
pub struct SummaryEngine {
    inner: Arc<EngineInner>,
}

impl SummaryEngine {
    /// Start the worker pool and set up empty caches
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let workers = match config.workers {
            0 => default_pool_size(),
            n => n,
        };
        let metrics = Arc::new(Metrics::new());
        let pool = Arc::new(WorkerPool::new(workers)?);
        let stopwords = StopWords::english_with(&config.extra_stopwords);
        let extractor = Arc::new(PhraseExtractor::new(
            Arc::clone(&pool),
            stopwords,
            config.cache_capacity,
            config.phrase_key_chars,
            Arc::clone(&metrics),
        ));
        let similarity = Arc::new(SimilarityEngine::new(
            config.cache_capacity,
            Arc::clone(&metrics),
        ));
        let deduplicator = Deduplicator::new(
            Arc::clone(&similarity),
            config.similarity_threshold,
            config.dedup_batch_size,
            Arc::clone(&metrics),
        );
        let theme_detector = ThemeDetector::new(Arc::clone(&extractor), Arc::clone(&metrics));

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                pool,
                extractor,
                similarity,
                deduplicator,
                theme_detector,
                metrics,
                #[cfg(test)]
                faults: Default::default(),
            }),
        })
    }

    pub fn with_defaults() -> Result<Self, EngineError> {
        Self::new(EngineConfig::default())
    }

    /// Summarise a batch of articles.
    ///
    /// Fails only if the engine has been shut down; every other problem
    /// yields a fallback [`Summary`].
    pub async fn summarize(&self, articles: &[Article]) -> Result<Summary, EngineError> {
        let started = Instant::now();
        let inner = &self.inner;
        if inner.pool.is_shut_down() {
            return Err(EngineError::Summarization(
                "engine has been shut down".to_string(),
            ));
        }

        let total = articles.len();
        let valid = validate_articles(articles);
        if valid.is_empty() {
            warn!(total, "No valid articles to summarize");
            return Ok(Summary::fallback("No valid articles to summarize"));
        }
        debug!(total, valid = valid.len(), "Validated articles");

        let themes = inner.theme_detector.detect_themes(&valid).await?;
        let results = self.process_articles(&valid, &themes).await?;

        let processed = results.len();
        let confidence = processed as f64 / valid.len() as f64;
        if confidence < inner.config.min_confidence {
            warn!(
                processed,
                valid = valid.len(),
                confidence,
                "Too few articles processed, returning partial fallback"
            );
            return Ok(Summary::partial(processed, total));
        }

        let text = inner.compose(&themes, &results);
        inner.metrics.record(Stage::Total, started.elapsed());
        info!(
            processed,
            total,
            themes = themes.len(),
            confidence,
            "Summary generated"
        );

        Ok(Summary::new(
            text,
            themes,
            confidence,
            processed,
            total,
            inner.metrics.snapshot(),
        ))
    }

    /// Summarise articles given as a JSON value.
    ///
    /// The value must be an array. Elements that are not article objects
    /// count toward the total and are dropped as invalid.
    pub async fn summarize_value(
        &self,
        input: &serde_json::Value,
    ) -> Result<Summary, EngineError> {
        let items = input.as_array().ok_or_else(|| {
            EngineError::Summarization(format!(
                "expected an array of articles, got {}",
                json_type(input)
            ))
        })?;

        self.summarize(&articles_from_json(items)).await
    }

    /// Ranked cross-article themes for a batch, without building a summary
    pub async fn detect_themes(&self, articles: &[Article]) -> Result<Vec<String>, EngineError> {
        let valid = validate_articles(articles);
        self.inner.theme_detector.detect_themes(&valid).await
    }

    /// Remove near-duplicate sentences, keeping order
    pub fn remove_duplicates<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<String> {
        self.inner.deduplicator.remove_duplicates(sentences)
    }

    /// Cached similarity of two sentences
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        self.inner.similarity.similarity(a, b)
    }

    /// Cached phrase extraction on the worker pool
    pub async fn extract_phrases(&self, text: &str) -> Result<Vec<String>, EngineError> {
        self.inner.extractor.extract(text).await
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    pub fn worker_count(&self) -> usize {
        self.inner.pool.size()
    }

    /// Stop the worker pool and clear both caches.
    pub fn shutdown(&self) {
        self.inner.pool.shutdown();
        self.inner.extractor.clear_cache();
        self.inner.similarity.clear_cache();
        info!("Summary engine shut down");
    }

    /// One task per article; failed or panicked tasks are dropped. A stopped
    /// worker pool fails the whole batch.
    async fn process_articles(
        &self,
        articles: &[Article],
        themes: &[String],
    ) -> Result<Vec<ArticleProcessingResult>, EngineError> {
        let theme_set: Arc<HashSet<String>> = Arc::new(themes.iter().cloned().collect());

        let handles = articles.iter().cloned().map(|article| {
            let inner = Arc::clone(&self.inner);
            let theme_set = Arc::clone(&theme_set);
            tokio::spawn(async move { inner.process_article(&article, &theme_set).await })
        });

        let mut results = Vec::with_capacity(articles.len());
        for (outcome, article) in join_all(handles).await.into_iter().zip(articles) {
            match outcome {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) if e.kind() == ErrorKind::Summarization => return Err(e),
                Ok(Err(e)) => {
                    warn!(source = %article.source, error = %e, "Dropping article");
                }
                Err(e) => {
                    warn!(source = %article.source, error = %e, "Article task failed");
                }
            }
        }
        Ok(results)
    }
}

impl EngineInner {
    async fn process_article(
        &self,
        article: &Article,
        themes: &HashSet<String>,
    ) -> Result<ArticleProcessingResult, EngineError> {
        #[cfg(test)]
        self.check_fault(&article.source)?;

        let sentences = self
            .deduplicator
            .remove_duplicates(&split_sentences(&article.snippet));

        let phrases = match self.extractor.extract(&article.snippet).await {
            Ok(phrases) => phrases,
            Err(e) if e.kind() == ErrorKind::Extraction => {
                warn!(source = %article.source, error = %e, "Key point extraction failed");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut seen = HashSet::new();
        let key_points = phrases
            .into_iter()
            .filter(|phrase| !themes.contains(phrase) && seen.insert(phrase.clone()))
            .collect();

        Ok(ArticleProcessingResult {
            source: article.source.clone(),
            sentences,
            key_points,
        })
    }

    fn compose(&self, themes: &[String], results: &[ArticleProcessingResult]) -> String {
        let mut lines = Vec::new();

        if !themes.is_empty() {
            let lead: Vec<&str> = themes
                .iter()
                .take(self.config.max_themes)
                .map(String::as_str)
                .collect();
            lines.push(format!("Key themes: {}.", lead.join(", ")));
        }

        let combined: Vec<&str> = results
            .iter()
            .flat_map(|result| result.sentences.iter().map(String::as_str))
            .collect();
        let body: Vec<String> = self
            .deduplicator
            .remove_duplicates(&combined)
            .into_iter()
            .take(self.config.max_sentences)
            .collect();
        if !body.is_empty() {
            lines.push(format!("{}.", body.join(". ")));
        }

        let sources: IndexSet<&str> = results.iter().map(|r| r.source.as_str()).collect();
        if !sources.is_empty() {
            let sources: Vec<&str> = sources.into_iter().collect();
            lines.push(format!("Sources: {}", sources.join(", ")));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
impl EngineInner {
    fn check_fault(&self, source: &str) -> Result<(), EngineError> {
        let fault = self.faults.lock().get(source).copied();
        match fault {
            Some(Fault::Error) => Err(EngineError::Extraction(format!(
                "forced failure for {}",
                source
            ))),
            Some(Fault::Panic) => panic!("forced panic for {}", source),
            None => Ok(()),
        }
    }
}

/// Split on runs of `.`, `!` and `?`, trimming and dropping empty pieces.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(&['.', '!', '?'][..])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
