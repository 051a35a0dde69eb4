//! Summary struct - the output record of the engine.

use crate::metrics::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Text returned whenever a full summary cannot be produced
pub const FALLBACK_TEXT: &str = "Unable to generate summary at this time.";

/// Per-article intermediate result, discarded after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleProcessingResult {
    pub source: String,
    /// Deduplicated sentences in snippet order
    pub sentences: Vec<String>,
    /// Phrases from the snippet that are not themes
    pub key_points: Vec<String>,
}

/// Output of a `summarize` call.
///
/// A full summary always carries `processed_articles`, `total_articles` and
/// `metrics`. A fallback has [`FALLBACK_TEXT`], no themes, zero confidence and
/// optionally an error note or partial-data counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    pub themes: Vec<String>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_articles: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_articles: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_data: Option<bool>,
}

impl Summary {
    /// Create a full summary
    pub fn new(
        summary: String,
        themes: Vec<String>,
        confidence: f64,
        processed_articles: usize,
        total_articles: usize,
        metrics: MetricsSnapshot,
    ) -> Self {
        Self {
            summary,
            themes,
            confidence: confidence.clamp(0.0, 1.0),
            processed_articles: Some(processed_articles),
            total_articles: Some(total_articles),
            metrics: Some(metrics),
            error: None,
            partial_data: None,
        }
    }

    /// Fallback with an explanatory note
    pub fn fallback(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty_fallback()
        }
    }

    /// Fallback for a batch where too few articles could be processed
    pub fn partial(processed_articles: usize, total_articles: usize) -> Self {
        Self {
            processed_articles: Some(processed_articles),
            total_articles: Some(total_articles),
            partial_data: Some(true),
            ..Self::empty_fallback()
        }
    }

    fn empty_fallback() -> Self {
        Self {
            summary: FALLBACK_TEXT.to_string(),
            themes: Vec::new(),
            confidence: 0.0,
            processed_articles: None,
            total_articles: None,
            metrics: None,
            error: None,
            partial_data: None,
        }
    }

    /// Check if this is a fallback rather than a full summary
    pub fn is_fallback(&self) -> bool {
        self.metrics.is_none()
    }
}
