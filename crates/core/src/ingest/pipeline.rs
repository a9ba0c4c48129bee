//! The ingestion pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use super::IngestStatus;
use crate::config::IngestConfig;
use crate::index::SearchIndex;
use crate::metrics;
use crate::provider::{FetchedItem, ItemProvider, ProviderError};
use crate::store::{ItemRecord, ItemStore, StoreError, Trend};

/// Per-id gate serializing ingests of the same item.
///
/// `slots` counts the running caller plus queued waiters. One caller may
/// queue behind the in-flight ingest; further callers are rejected.
#[derive(Default)]
struct IdGate {
    lock: tokio::sync::Mutex<()>,
    slots: AtomicU32,
}

/// Orchestrates fetch -> reconcile -> persist -> index for one item id.
pub struct IngestPipeline {
    store: Arc<dyn ItemStore>,
    index: Arc<SearchIndex>,
    provider: Arc<dyn ItemProvider>,
    config: IngestConfig,
    gates: Mutex<HashMap<i64, Arc<IdGate>>>,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn ItemStore>,
        index: Arc<SearchIndex>,
        provider: Arc<dyn ItemProvider>,
        config: IngestConfig,
    ) -> Self {
        Self {
            store,
            index,
            provider,
            config,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Run one ingest call for `id`.
    ///
    /// Ingests of the same id are serialized behind a per-id gate with room
    /// for exactly one queued caller; everyone else gets `Busy` immediately.
    /// Different ids proceed fully in parallel.
    pub async fn ingest(&self, id: i64) -> IngestStatus {
        let started = Instant::now();
        let status = self.ingest_inner(id).await;

        metrics::INGEST_TOTAL
            .with_label_values(&[status.category()])
            .inc();
        metrics::INGEST_DURATION
            .with_label_values(&[status.category()])
            .observe(started.elapsed().as_secs_f64());

        status
    }

    async fn ingest_inner(&self, id: i64) -> IngestStatus {
        if id <= 0 {
            return IngestStatus::InvalidInput(id);
        }

        let gate = self.gate(id);
        if gate.slots.fetch_add(1, Ordering::SeqCst) >= 2 {
            gate.slots.fetch_sub(1, Ordering::SeqCst);
            return IngestStatus::Busy(id);
        }

        let status = {
            let _guard = gate.lock.lock().await;
            self.run(id).await
        };
        gate.slots.fetch_sub(1, Ordering::SeqCst);

        status
    }

    /// The forward pass: fetch, reconcile, persist, index.
    async fn run(&self, id: i64) -> IngestStatus {
        let fetched = match self.fetch_with_retry(id).await {
            Ok(fetched) => fetched,
            Err(status) => return status,
        };

        // Prior record is read inside the gate, so the delta is always
        // computed against the previous committed ingest of this id.
        let prior = match self.store.get(id) {
            Ok(record) => Some(record),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return IngestStatus::StorageFailure(e.to_string()),
        };

        let now = Utc::now();
        let change = match &prior {
            Some(p) => fetched.price - p.current_price,
            // First ingest has no baseline: report no movement.
            None => 0,
        };

        let record = ItemRecord {
            id,
            name: fetched.name,
            description: fetched.description,
            item_type: fetched.item_type,
            icon: fetched.icon,
            icon_large: fetched.icon_large,
            members: fetched.members,
            current_price: fetched.price,
            current_trend: fetched.trend,
            today_price_change: change,
            today_trend: Trend::from_delta(change),
            first_ingested_at: prior.as_ref().map(|p| p.first_ingested_at).unwrap_or(now),
            last_ingested_at: now,
            ingest_count: prior.as_ref().map(|p| p.ingest_count + 1).unwrap_or(1),
        };

        if let Err(e) = self.store.put(&record) {
            warn!("Failed to persist item {}: {}", id, e);
            return IngestStatus::StorageFailure(e.to_string());
        }

        // The record is durable at this point; the index delta cannot fail
        // and must land before the caller sees the success status.
        self.index.update(&record);

        info!(
            "Ingested item {}: {} @ {}gp ({}, {:+})",
            id, record.name, record.current_price, record.today_trend, change
        );

        IngestStatus::Ingested {
            name: record.name,
            price: record.current_price,
            change,
            trend: record.today_trend,
        }
    }

    /// Fetch with bounded retry on transient failures.
    async fn fetch_with_retry(&self, id: i64) -> Result<FetchedItem, IngestStatus> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);

        for attempt in 1..=max_attempts {
            match self.provider.fetch(id).await {
                Ok(fetched) => return Ok(fetched),
                Err(ProviderError::Transient(msg)) => {
                    warn!(
                        "Transient failure fetching item {} (attempt {}/{}): {}",
                        id, attempt, max_attempts, msg
                    );
                    if attempt < max_attempts {
                        sleep(backoff).await;
                        backoff *= 2;
                    }
                }
                Err(ProviderError::NotFound(_)) => {
                    return Err(IngestStatus::NotFound(id));
                }
                Err(ProviderError::Format(msg)) => {
                    warn!("Malformed provider response for item {}: {}", id, msg);
                    return Err(IngestStatus::FormatFailure(msg));
                }
                Err(ProviderError::NotConfigured(msg)) => {
                    warn!("Provider not configured: {}", msg);
                    return Err(IngestStatus::TransientFailure { attempts: attempt });
                }
            }
        }

        Err(IngestStatus::TransientFailure {
            attempts: max_attempts,
        })
    }

    fn gate(&self, id: i64) -> Arc<IdGate> {
        let mut gates = self.gates.lock().unwrap();
        Arc::clone(gates.entry(id).or_default())
    }
}
