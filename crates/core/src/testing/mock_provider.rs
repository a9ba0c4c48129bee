//! Mock item provider for testing.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::provider::{FetchedItem, ItemProvider, ProviderError};

/// Mock implementation of the ItemProvider trait.
///
/// Provides controllable behavior for testing:
/// - Fixed per-id items returned on every fetch
/// - Queued one-shot responses (consumed before fixed items), for retry
///   and failure sequences
/// - Fetch counters for assertions
/// - Optional artificial delay, for concurrency tests
///
/// Ids with neither a fixed item nor a queued response answer `NotFound`.
pub struct MockProvider {
    items: Mutex<HashMap<i64, FetchedItem>>,
    queued: Mutex<HashMap<i64, VecDeque<Result<FetchedItem, ProviderError>>>>,
    fetch_counts: Mutex<HashMap<i64, u32>>,
    delay: Mutex<Option<Duration>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            queued: Mutex::new(HashMap::new()),
            fetch_counts: Mutex::new(HashMap::new()),
            delay: Mutex::new(None),
        }
    }

    /// Set the fixed item returned for its id.
    pub async fn set_item(&self, item: FetchedItem) {
        self.items.lock().await.insert(item.id, item);
    }

    /// Queue a one-shot response for an id. Queued responses are consumed
    /// in order before any fixed item.
    pub async fn push_response(&self, id: i64, response: Result<FetchedItem, ProviderError>) {
        self.queued
            .lock()
            .await
            .entry(id)
            .or_default()
            .push_back(response);
    }

    /// Delay every fetch by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Number of fetches recorded for an id.
    pub async fn fetch_count(&self, id: i64) -> u32 {
        self.fetch_counts.lock().await.get(&id).copied().unwrap_or(0)
    }

    /// Total fetches across all ids.
    pub async fn total_fetches(&self) -> u32 {
        self.fetch_counts.lock().await.values().sum()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemProvider for MockProvider {
    async fn fetch(&self, id: i64) -> Result<FetchedItem, ProviderError> {
        *self.fetch_counts.lock().await.entry(id).or_insert(0) += 1;

        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(queue) = self.queued.lock().await.get_mut(&id) {
            if let Some(response) = queue.pop_front() {
                return response;
            }
        }

        match self.items.lock().await.get(&id) {
            Some(item) => Ok(item.clone()),
            None => Err(ProviderError::NotFound(id)),
        }
    }
}
