use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itemdex_core::{
    load_config, validate_config, CatalogService, GrandExchangeClient, IngestPipeline,
    ItemProvider, ItemStore, SearchIndex, SqliteItemStore,
};

use itemdex_server::api::create_router;
use itemdex_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ITEMDEX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Provider base URL: {}", config.provider.base_url);

    // Create SQLite item store
    let store: Arc<dyn ItemStore> = Arc::new(
        SqliteItemStore::new(&config.database.path).context("Failed to create item store")?,
    );
    info!("Item store initialized");

    // Rebuild the in-memory search index from persisted records
    let index = Arc::new(SearchIndex::new());
    let records = store.all().context("Failed to load items from store")?;
    let count = records.len();
    index.rebuild(records);
    info!("Search index rebuilt with {} items", count);

    // Create provider client
    let provider: Arc<dyn ItemProvider> = Arc::new(
        GrandExchangeClient::new(&config.provider).context("Failed to create provider client")?,
    );

    // Create ingest pipeline
    let pipeline = Arc::new(IngestPipeline::new(
        Arc::clone(&store),
        Arc::clone(&index),
        provider,
        config.ingest.clone(),
    ));

    // Create catalog service
    let service = Arc::new(CatalogService::new(
        Arc::clone(&index),
        Arc::clone(&pipeline),
        config.search.result_limit,
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), service, store));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
