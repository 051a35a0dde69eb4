//! Cross-article theme detection.

use crate::article::Article;
use crate::error::{EngineError, ErrorKind};
use crate::metrics::{Metrics, Stage};
use crate::phrase::PhraseExtractor;
use futures::future::join_all;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub struct ThemeDetector {
    extractor: Arc<PhraseExtractor>,
    metrics: Arc<Metrics>,
}

impl ThemeDetector {
    pub fn new(extractor: Arc<PhraseExtractor>, metrics: Arc<Metrics>) -> Self {
        Self { extractor, metrics }
    }

    /// Phrases shared by more than one article, most frequent first.
    ///
    /// Extraction runs concurrently for every article and all results are
    /// awaited before counting. An article whose extraction fails contributes
    /// no phrases; a stopped worker pool fails the whole call.
    pub async fn detect_themes(&self, articles: &[Article]) -> Result<Vec<String>, EngineError> {
        let start = Instant::now();

        let jobs = articles.iter().map(|article| {
            let text = article.theme_text();
            async move { self.extractor.extract(&text).await }
        });
        let mut per_article: Vec<Vec<String>> = Vec::with_capacity(articles.len());
        for (result, article) in join_all(jobs).await.into_iter().zip(articles) {
            match result {
                Ok(phrases) => per_article.push(phrases),
                Err(e) if e.kind() == ErrorKind::Summarization => return Err(e),
                Err(e) => {
                    warn!(source = %article.source, error = %e, "Phrase extraction failed");
                    per_article.push(Vec::new());
                }
            }
        }

        let themes = rank_themes(&per_article);
        self.metrics.record(Stage::ThemeDetection, start.elapsed());
        debug!(
            articles = articles.len(),
            themes = themes.len(),
            "Detected themes"
        );
        Ok(themes)
    }
}

/// Rank phrases by how often they occur across all articles.
///
/// Only phrases found in at least two distinct articles qualify. Repeats
/// within one article add to a phrase's count. Equal counts keep the order in
/// which the phrases first appear across `per_article`.
pub fn rank_themes(per_article: &[Vec<String>]) -> Vec<String> {
    // phrase -> (occurrences, articles containing it)
    let mut counts: IndexMap<&str, (usize, usize)> = IndexMap::new();
    for phrases in per_article {
        let mut seen = HashSet::new();
        for phrase in phrases {
            let entry = counts.entry(phrase.as_str()).or_insert((0, 0));
            entry.0 += 1;
            if seen.insert(phrase.as_str()) {
                entry.1 += 1;
            }
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, (_, articles))| *articles > 1)
        .map(|(phrase, (occurrences, _))| (phrase, occurrences))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .map(|(phrase, _)| phrase.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::WorkerPool;
    use crate::tokenizer::StopWords;

    fn phrases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_requires_two_articles() {
        let ranked = rank_themes(&[
            phrases(&["solo phrase here", "solo phrase here", "shared phrase one"]),
            phrases(&["shared phrase one"]),
        ]);
        assert_eq!(ranked, vec!["shared phrase one"]);
    }

    #[test]
    fn test_rank_orders_by_count_then_first_seen() {
        let ranked = rank_themes(&[
            phrases(&["beta", "alpha"]),
            phrases(&["alpha", "gamma", "beta"]),
            phrases(&["gamma", "alpha"]),
        ]);
        // alpha: 3, beta: 2, gamma: 2 (beta seen before gamma)
        assert_eq!(ranked, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_rank_counts_repeats_within_an_article() {
        let ranked = rank_themes(&[
            phrases(&["alpha", "beta", "beta", "beta"]),
            phrases(&["alpha", "beta", "alpha"]),
            phrases(&["alpha"]),
        ]);
        // beta: 4 occurrences in 2 articles, alpha: 4 in 3; tie keeps first-seen
        assert_eq!(ranked, vec!["alpha", "beta"]);

        let ranked = rank_themes(&[
            phrases(&["alpha", "beta", "beta", "beta"]),
            phrases(&["alpha", "beta"]),
            phrases(&["alpha"]),
        ]);
        // beta: 4 occurrences outranks alpha: 3 even though alpha is in more articles
        assert_eq!(ranked, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_themes(&[]).is_empty());
        assert!(rank_themes(&[Vec::new(), Vec::new()]).is_empty());
    }

    #[tokio::test]
    async fn test_detect_themes_across_articles() {
        let metrics = Arc::new(Metrics::new());
        let pool = Arc::new(WorkerPool::new(2).unwrap());
        let extractor = Arc::new(PhraseExtractor::new(
            Arc::clone(&pool),
            StopWords::english(),
            100,
            100,
            Arc::clone(&metrics),
        ));
        let detector = ThemeDetector::new(extractor, Arc::clone(&metrics));

        let articles = vec![
            Article::new(
                "Electric vehicle sales surge",
                "Europe reports record demand.",
                "Auto Daily",
            ),
            Article::new(
                "Analysts cheer electric vehicle sales",
                "Battery costs keep falling.",
                "Market Wire",
            ),
            Article::new("Storm warning", "Heavy rain expected tonight.", "Weather Desk"),
        ];

        let themes = detector.detect_themes(&articles).await.unwrap();
        assert_eq!(themes, vec!["electric vehicle sales"]);
        assert!(metrics.snapshot().theme_detection_time >= 0.0);
        pool.shutdown();
    }

    #[tokio::test]
    async fn test_detect_themes_fails_on_stopped_pool() {
        let metrics = Arc::new(Metrics::new());
        let pool = Arc::new(WorkerPool::new(1).unwrap());
        let extractor = Arc::new(PhraseExtractor::new(
            Arc::clone(&pool),
            StopWords::english(),
            100,
            100,
            Arc::clone(&metrics),
        ));
        let detector = ThemeDetector::new(extractor, metrics);
        pool.shutdown();

        let articles = vec![
            Article::new("Electric vehicle sales surge", "Record demand.", "Auto Daily"),
            Article::new("Electric vehicle sales rise", "Costs fall.", "Market Wire"),
        ];
        let err = detector.detect_themes(&articles).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Summarization);
    }
}
