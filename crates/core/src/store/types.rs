//! Types for the item record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Price movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Trend {
    /// Direction implied by a signed price delta.
    pub fn from_delta(delta: i64) -> Self {
        match delta {
            d if d > 0 => Trend::Up,
            d if d < 0 => Trend::Down,
            _ => Trend::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Trend::Up),
            "down" => Some(Trend::Down),
            "neutral" => Some(Trend::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical stored representation of one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item id, assigned upstream. Immutable once stored.
    pub id: i64,
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: String,
    /// Item category as reported by the provider.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Icon URL.
    pub icon: String,
    /// Large icon URL.
    pub icon_large: String,
    /// Members-only flag.
    pub members: bool,
    /// Latest known price. Never negative.
    pub current_price: i64,
    /// Provider-reported direction for the current price.
    pub current_trend: Trend,
    /// Delta between the latest fetched price and the previously stored
    /// one, recomputed on every ingest. Zero on first ingest.
    pub today_price_change: i64,
    /// Direction of `today_price_change`. Sign always agrees with it.
    pub today_trend: Trend,
    /// When this item was first ingested.
    pub first_ingested_at: DateTime<Utc>,
    /// When this item was last ingested.
    pub last_ingested_at: DateTime<Utc>,
    /// Number of successful ingests for this item.
    pub ingest_count: u32,
}

/// Store statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total stored items.
    pub total_items: u64,
    /// Oldest first-ingest timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_ingest: Option<DateTime<Utc>>,
    /// Most recent ingest timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_ingest: Option<DateTime<Utc>>,
}

/// Errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Item not found: {0}")]
    NotFound(i64),
}
