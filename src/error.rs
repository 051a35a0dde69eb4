//! Engine error types.
//!
//! Every failure the engine can produce belongs to one of four kinds. Only
//! [`ErrorKind::Summarization`] ever escapes [`crate::SummaryEngine::summarize`];
//! the others are absorbed by the unit of work that raised them.

use thiserror::Error;

/// Discriminant for [`EngineError`], used to match failures at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An article is missing a required field.
    Validation,
    /// A phrase-extraction job failed.
    Extraction,
    /// A similarity computation failed for one pair.
    Similarity,
    /// Malformed input or an internal fault that aborts the whole call.
    Summarization,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid article: {0}")]
    Validation(String),
    #[error("phrase extraction failed: {0}")]
    Extraction(String),
    #[error("similarity check failed: {0}")]
    Similarity(String),
    #[error("summarization failed: {0}")]
    Summarization(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::Extraction(_) => ErrorKind::Extraction,
            EngineError::Similarity(_) => ErrorKind::Similarity,
            EngineError::Summarization(_) => ErrorKind::Summarization,
        }
    }
}

/// Render a caught panic payload as a message.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
