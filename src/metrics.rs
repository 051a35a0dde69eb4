//! Engine-wide timing and cache counters.
//!
//! Counters use relaxed atomics and are shared by every `summarize` call on an
//! engine. They are advisory: nothing reads them to make a decision.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Timed stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Total,
    PhraseExtraction,
    ThemeDetection,
    DuplicateRemoval,
}

#[derive(Debug, Default)]
pub struct Metrics {
    total_micros: AtomicU64,
    phrase_extraction_micros: AtomicU64,
    theme_detection_micros: AtomicU64,
    duplicate_removal_micros: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` to the accumulated time for `stage`
    pub fn record(&self, stage: Stage, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.counter(stage).fetch_add(micros, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let millis = |counter: &AtomicU64| counter.load(Ordering::Relaxed) as f64 / 1000.0;
        MetricsSnapshot {
            total_processing_time: millis(&self.total_micros),
            phrase_extraction_time: millis(&self.phrase_extraction_micros),
            theme_detection_time: millis(&self.theme_detection_micros),
            duplicate_removal_time: millis(&self.duplicate_removal_micros),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.total_micros,
            &self.phrase_extraction_micros,
            &self.theme_detection_micros,
            &self.duplicate_removal_micros,
            &self.cache_hits,
            &self.cache_misses,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn counter(&self, stage: Stage) -> &AtomicU64 {
        match stage {
            Stage::Total => &self.total_micros,
            Stage::PhraseExtraction => &self.phrase_extraction_micros,
            Stage::ThemeDetection => &self.theme_detection_micros,
            Stage::DuplicateRemoval => &self.duplicate_removal_micros,
        }
    }
}

/// Point-in-time copy of the counters. Times are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_processing_time: f64,
    pub phrase_extraction_time: f64,
    pub theme_detection_time: f64,
    pub duplicate_removal_time: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
