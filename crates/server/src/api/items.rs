//! Item API handlers: search, ingest and store statistics.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use itemdex_core::{IngestStatus, ItemRecord, StoreStats};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<ItemRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Stable status category: "ingested", "invalid_input", "not_found",
    /// "transient_failure", "format_failure", "storage_failure", "busy".
    pub status: String,
    /// Human-readable status message.
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/items/search?q=<text>&limit=<n>
///
/// Search items by text. The read path: never fails, an empty or missing
/// query yields an empty result.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let text = params.q.unwrap_or_default();

    let items = match params.limit {
        Some(limit) => state.service().search_with_limit(&text, limit),
        None => state.service().search(&text),
    };

    let total = items.len();
    Json(SearchResponse { items, total })
}

/// POST /api/v1/items/{id}/ingest
///
/// Fetch an item from the upstream catalogue and reconcile it into the
/// store and index. The HTTP status is mapped from the ingest category.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<IngestResponse>) {
    let status = state.service().ingest_item(id).await;

    let http_status = match &status {
        IngestStatus::Ingested { .. } => StatusCode::OK,
        IngestStatus::InvalidInput(_) => StatusCode::BAD_REQUEST,
        IngestStatus::NotFound(_) => StatusCode::NOT_FOUND,
        IngestStatus::Busy(_) => StatusCode::CONFLICT,
        IngestStatus::TransientFailure { .. } | IngestStatus::FormatFailure(_) => {
            StatusCode::BAD_GATEWAY
        }
        IngestStatus::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        http_status,
        Json(IngestResponse {
            status: status.category().to_string(),
            message: status.to_string(),
        }),
    )
}

/// GET /api/v1/items/stats
///
/// Get store statistics.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoreStats>, (StatusCode, Json<ErrorResponse>)> {
    match state.store().stats() {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
