//! Ingestion pipeline - fetch, reconcile, persist, index.
//!
//! One ingest call is a single forward pass:
//! validate -> fetch (with bounded retry) -> reconcile against the prior
//! record -> durable write -> index delta -> status. Ingests of the same id
//! are serialized; different ids proceed fully in parallel.

mod pipeline;
mod types;

pub use pipeline::IngestPipeline;
pub use types::IngestStatus;
