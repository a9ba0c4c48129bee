//! Item record store - the canonical, durable copy of every catalog item.
//!
//! The store owns item records keyed by id. Records are created on first
//! successful ingest, updated in place on re-ingest, and never deleted.

mod sqlite;
mod types;

pub use sqlite::SqliteItemStore;
pub use types::*;

/// Trait for durable item record storage.
pub trait ItemStore: Send + Sync {
    /// Get a record by item id.
    fn get(&self, id: i64) -> Result<ItemRecord, StoreError>;

    /// Upsert a record keyed by its id.
    ///
    /// The write is committed before this returns, so a reported success
    /// survives process restart. Atomic with respect to concurrent
    /// `get`/`put` on the same id.
    fn put(&self, record: &ItemRecord) -> Result<(), StoreError>;

    /// Load all records, ordered by id. Used to build the search index
    /// at startup.
    fn all(&self) -> Result<Vec<ItemRecord>, StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<u64, StoreError>;

    /// Get store statistics.
    fn stats(&self) -> Result<StoreStats, StoreError>;
}
