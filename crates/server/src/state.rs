use std::sync::Arc;

use itemdex_core::{CatalogService, Config, ItemStore};

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<CatalogService>,
    store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<CatalogService>, store: Arc<dyn ItemStore>) -> Self {
        Self {
            config,
            service,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    pub fn store(&self) -> &dyn ItemStore {
        self.store.as_ref()
    }
}
