//! Query service facade - the two operations the outer surface consumes.
//!
//! The facade performs no business logic; it delegates searches to the index
//! and ingests to the pipeline, and keeps the search path off the network.

use std::sync::Arc;

use crate::index::SearchIndex;
use crate::ingest::{IngestPipeline, IngestStatus};
use crate::metrics;
use crate::store::ItemRecord;

/// Facade over the search index and ingestion pipeline.
pub struct CatalogService {
    index: Arc<SearchIndex>,
    pipeline: Arc<IngestPipeline>,
    result_limit: usize,
}

impl CatalogService {
    pub fn new(
        index: Arc<SearchIndex>,
        pipeline: Arc<IngestPipeline>,
        result_limit: usize,
    ) -> Self {
        Self {
            index,
            pipeline,
            result_limit,
        }
    }

    /// Search items by text. Read path: never fails, never touches the
    /// network, empty query yields an empty result.
    pub fn search(&self, text: &str) -> Vec<ItemRecord> {
        metrics::SEARCHES_TOTAL.inc();
        self.index.query(text, self.result_limit)
    }

    /// Search with an explicit result cap, bounded by the configured limit.
    pub fn search_with_limit(&self, text: &str, limit: usize) -> Vec<ItemRecord> {
        metrics::SEARCHES_TOTAL.inc();
        self.index.query(text, limit.min(self.result_limit))
    }

    /// Ingest one item by id. Write path: may block on the network within
    /// the pipeline's timeout and retry budget.
    pub async fn ingest_item(&self, id: i64) -> IngestStatus {
        self.pipeline.ingest(id).await
    }
}
