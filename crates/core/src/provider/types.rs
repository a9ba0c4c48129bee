//! Validated provider response types.

use serde::{Deserialize, Serialize};

use crate::store::Trend;

/// One item as fetched and validated from the upstream catalogue.
///
/// Construction enforces the boundary invariants: the price is non-negative
/// and the trend label is a known one. Raw wire types never leave the
/// provider module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub item_type: String,
    pub icon: String,
    pub icon_large: String,
    pub members: bool,
    /// Current price. Non-negative.
    pub price: i64,
    /// Provider-reported direction for the current price.
    pub trend: Trend,
}
