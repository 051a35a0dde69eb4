//! # newsbrief
//!
//! Extractive summarisation of short news articles from many sources.
//!
//! ## Features
//!
//! - **Theme Detection**: Three-word phrases shared across articles lead the summary
//! - **Near-Duplicate Removal**: Bigram similarity drops repeated sentences, keeping order
//! - **Bounded Work**: Phrase extraction runs on a fixed worker pool behind FIFO caches
//! - **Graceful Degradation**: Bad articles are dropped; low confidence yields a fallback

pub mod article;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod phrase;
pub mod pool;
pub mod similarity;
pub mod summary;
pub mod themes;
pub mod tokenizer;

pub use article::Article;
pub use config::{Config, EngineConfig};
pub use engine::SummaryEngine;
pub use error::{EngineError, ErrorKind};
pub use metrics::MetricsSnapshot;
pub use summary::{Summary, FALLBACK_TEXT};
