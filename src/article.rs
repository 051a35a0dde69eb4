//! Article records handed to the engine by the source provider.

use crate::error::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A cleaned news record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    /// Headline
    pub title: String,
    /// Short body text, already stripped of markup
    pub snippet: String,
    /// Publication the article came from
    pub source: String,
    /// ISO-8601 publication timestamp, if the provider had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

impl Article {
    /// Create a new article without a publication date
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            source: source.into(),
            publish_date: None,
        }
    }

    pub fn with_publish_date(mut self, date: impl Into<String>) -> Self {
        self.publish_date = Some(date.into());
        self
    }

    /// Check that title, snippet and source are all non-blank
    pub fn validate(&self) -> Result<(), EngineError> {
        let fields = [
            ("title", &self.title),
            ("snippet", &self.snippet),
            ("source", &self.source),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(EngineError::Validation(format!("{} is blank", name)));
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Parse `publish_date` as RFC 3339 or a bare `YYYY-MM-DD` date
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.publish_date.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Text used for cross-article theme detection
    pub fn theme_text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }
}

/// Read each JSON element as an article.
///
/// An element that is not an article object becomes a blank article, so it
/// still counts toward the total and is then dropped as invalid.
pub fn articles_from_json(items: &[serde_json::Value]) -> Vec<Article> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Article::deserialize(item).unwrap_or_else(|e| {
                debug!(index, error = %e, "Unreadable article");
                Article::default()
            })
        })
        .collect()
}

/// Keep only valid articles, in input order. Dropped articles are logged.
pub fn validate_articles(articles: &[Article]) -> Vec<Article> {
    articles
        .iter()
        .enumerate()
        .filter_map(|(index, article)| match article.validate() {
            Ok(()) => Some(article.clone()),
            Err(e) => {
                debug!(index, error = %e, "Dropping article");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_articles_from_json_keeps_readable_elements() {
        let items = vec![
            json!({"title": "Rates held", "snippet": "Held.", "source": "Wire", "publishDate": "2024-05-01"}),
            json!({"title": 42, "snippet": "Numbers are not titles.", "source": "Bad"}),
            json!("not an article"),
            json!({"title": "Rates steady", "snippet": "Steady.", "source": "Daily", "publishDate": "2024-05-03T09:30:00Z"}),
        ];

        let articles = articles_from_json(&items);
        assert_eq!(articles.len(), 4);
        assert_eq!(articles[1], Article::default());
        assert_eq!(articles[2], Article::default());
        assert_eq!(validate_articles(&articles).len(), 2);

        let dates: Vec<_> = articles.iter().filter_map(Article::published_at).collect();
        assert_eq!(dates.len(), 2);
        assert!(dates[0] < dates[1]);
    }

    #[test]
    fn test_validate_requires_all_fields() {
        assert!(Article::new("Title", "Body text.", "Wire").is_valid());

        let err = Article::new("  ", "Body", "Wire").validate().unwrap_err();
        assert_eq!(err, EngineError::Validation("title is blank".into()));
        assert!(!Article::new("Title", "", "Wire").is_valid());
        assert!(!Article::new("Title", "Body", "\t\n").is_valid());
    }

    #[test]
    fn test_validate_articles_keeps_order() {
        let articles = vec![
            Article::new("A", "first", "one"),
            Article::new("", "dropped", "two"),
            Article::new("C", "third", "three"),
        ];
        let valid = validate_articles(&articles);
        let sources: Vec<&str> = valid.iter().map(|a| a.source.as_str()).collect();
        assert_eq!(sources, vec!["one", "three"]);
        // input untouched
        assert_eq!(articles.len(), 3);
    }

    #[test]
    fn test_deserialize_camel_case_and_missing_fields() {
        let article: Article = serde_json::from_str(
            r#"{"title":"T","snippet":"S","source":"X","publishDate":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(article.publish_date.as_deref(), Some("2024-03-01T10:00:00Z"));

        let partial: Article = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert!(!partial.is_valid());
    }

    #[test]
    fn test_published_at() {
        let article = Article::new("T", "S", "X").with_publish_date("2024-03-01T10:00:00+02:00");
        let parsed = article.published_at().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T08:00:00+00:00");

        let date_only = Article::new("T", "S", "X").with_publish_date("2024-03-01");
        assert!(date_only.published_at().is_some());

        let garbage = Article::new("T", "S", "X").with_publish_date("yesterday");
        assert!(garbage.published_at().is_none());
    }

    #[test]
    fn test_theme_text() {
        let article = Article::new("Title here", "Snippet body", "X");
        assert_eq!(article.theme_text(), "Title here Snippet body");
    }
}
