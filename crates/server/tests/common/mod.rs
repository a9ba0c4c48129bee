//! Common test utilities for API testing with mocks.
//!
//! Provides a test fixture that builds an in-process server with a mock
//! item provider injected, so the full HTTP surface can be exercised
//! without external infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use itemdex_core::{
    testing::MockProvider, CatalogService, Config, IngestPipeline, ItemProvider, ItemStore,
    SearchIndex, SqliteItemStore,
};

use itemdex_server::api::create_router;
use itemdex_server::state::AppState;

/// Re-export fixtures for test convenience
pub use itemdex_core::testing::fixtures;

/// Test fixture for API testing with a mock provider.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock provider - configure upstream responses
    pub provider: Arc<MockProvider>,
    /// Store handle, for asserting on persisted records
    pub store: Arc<dyn ItemStore>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty store and default config.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let mut config = Config::default();
        config.database.path = db_path.clone();
        config.ingest.max_attempts = 2;
        config.ingest.retry_backoff_ms = 1;

        let provider = Arc::new(MockProvider::new());

        let store: Arc<dyn ItemStore> =
            Arc::new(SqliteItemStore::new(&db_path).expect("Failed to create item store"));

        let index = Arc::new(SearchIndex::new());

        let pipeline = Arc::new(IngestPipeline::new(
            Arc::clone(&store),
            Arc::clone(&index),
            Arc::clone(&provider) as Arc<dyn ItemProvider>,
            config.ingest.clone(),
        ));

        let service = Arc::new(CatalogService::new(
            index,
            pipeline,
            config.search.result_limit,
        ));

        let state = Arc::new(AppState::new(config, service, Arc::clone(&store)));
        let router = create_router(state);

        Self {
            router,
            provider,
            store,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with no body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
