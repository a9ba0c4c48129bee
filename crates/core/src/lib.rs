pub mod config;
pub mod index;
pub mod ingest;
pub mod metrics;
pub mod provider;
pub mod service;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    IngestConfig, ProviderConfig, SearchConfig, ServerConfig,
};
pub use index::SearchIndex;
pub use ingest::{IngestPipeline, IngestStatus};
pub use provider::{FetchedItem, GrandExchangeClient, ItemProvider, ProviderError, RateLimiter};
pub use service::CatalogService;
pub use store::{ItemRecord, ItemStore, SqliteItemStore, StoreError, StoreStats, Trend};
