//! Ingest status reporting.

use crate::store::Trend;

/// Outcome of one ingest call.
///
/// Every pipeline fault collapses to one of these categories; no provider
/// or storage error type crosses the facade boundary. `Display` renders the
/// human-readable status message, `category` the stable machine label.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestStatus {
    /// The record was fetched, persisted and indexed.
    Ingested {
        name: String,
        price: i64,
        change: i64,
        trend: Trend,
    },
    /// The id was not a positive integer. No network call was made.
    InvalidInput(i64),
    /// The id does not exist upstream. No mutation.
    NotFound(i64),
    /// Retries exhausted against a transient provider failure. No mutation.
    TransientFailure { attempts: u32 },
    /// The provider response was malformed or schema-violating. No mutation.
    FormatFailure(String),
    /// The durable write failed. Fetched data was discarded.
    StorageFailure(String),
    /// An ingest for this id is already in flight with a caller queued.
    Busy(i64),
}

impl IngestStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, IngestStatus::Ingested { .. })
    }

    /// Stable label for the status category.
    pub fn category(&self) -> &'static str {
        match self {
            IngestStatus::Ingested { .. } => "ingested",
            IngestStatus::InvalidInput(_) => "invalid_input",
            IngestStatus::NotFound(_) => "not_found",
            IngestStatus::TransientFailure { .. } => "transient_failure",
            IngestStatus::FormatFailure(_) => "format_failure",
            IngestStatus::StorageFailure(_) => "storage_failure",
            IngestStatus::Busy(_) => "busy",
        }
    }
}

impl std::fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestStatus::Ingested {
                name,
                price,
                change,
                trend,
            } => write!(
                f,
                "Ingested: {} @ {}gp ({}, {:+} today)",
                name, price, trend, change
            ),
            IngestStatus::InvalidInput(id) => {
                write!(f, "Invalid ID: {} (must be a positive integer)", id)
            }
            IngestStatus::NotFound(id) => write!(f, "Failed: item {} not found", id),
            IngestStatus::TransientFailure { attempts } => {
                write!(f, "Failed: provider unreachable after {} attempts", attempts)
            }
            IngestStatus::FormatFailure(detail) => {
                write!(f, "Failed: malformed provider response ({})", detail)
            }
            IngestStatus::StorageFailure(detail) => {
                write!(f, "Failed: could not persist record ({})", detail)
            }
            IngestStatus::Busy(id) => {
                write!(f, "Busy: an ingest for item {} is already queued", id)
            }
        }
    }
}
