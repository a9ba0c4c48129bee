//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion pipeline (outcomes by status, duration)
//! - Search queries

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

/// Ingest calls total by status category.
pub static INGEST_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("itemdex_ingest_total", "Total ingest calls"),
        &["status"], // "ingested", "invalid_input", "not_found", ...
    )
    .unwrap()
});

/// Ingest duration in seconds, by status category.
pub static INGEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "itemdex_ingest_duration_seconds",
            "Duration of one ingest call",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["status"],
    )
    .unwrap()
});

/// Search queries total.
pub static SEARCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("itemdex_searches_total", "Total search queries").unwrap()
});

/// Register all core metrics with the given registry.
pub fn register_core_metrics(registry: &Registry) {
    let _ = registry.register(Box::new(INGEST_TOTAL.clone()));
    let _ = registry.register(Box::new(INGEST_DURATION.clone()));
    let _ = registry.register(Box::new(SEARCHES_TOTAL.clone()));
}
