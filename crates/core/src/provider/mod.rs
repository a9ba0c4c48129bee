//! Upstream item provider integration.
//!
//! The provider client isolates all network and wire-format concerns of the
//! remote item catalogue. Responses are strictly validated at this boundary;
//! anything missing fields or carrying out-of-range values is rejected as a
//! format error rather than passed deeper into the pipeline.

mod grand_exchange;
mod rate_limit;
mod types;

pub use grand_exchange::GrandExchangeClient;
pub use rate_limit::RateLimiter;
pub use types::FetchedItem;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching from the upstream provider.
///
/// The three fetch categories drive retry policy: `Transient` is retryable,
/// `NotFound` and `Format` are not.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The id does not exist upstream.
    #[error("Item {0} not found upstream")]
    NotFound(i64),

    /// Network failure, timeout, or upstream 5xx. Retryable.
    #[error("Transient provider failure: {0}")]
    Transient(String),

    /// Response received but malformed or schema-violating.
    #[error("Malformed provider response: {0}")]
    Format(String),

    /// Client could not be constructed.
    #[error("Provider client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for upstream item providers.
#[async_trait]
pub trait ItemProvider: Send + Sync {
    /// Fetch metadata and the current price signal for one item id.
    async fn fetch(&self, id: i64) -> Result<FetchedItem, ProviderError>;
}
