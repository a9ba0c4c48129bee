//! Testing utilities and mock implementations.
//!
//! Provides a mock item provider so the pipeline and server can be exercised
//! end to end without the real catalogue API.

mod mock_provider;

pub use mock_provider::MockProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::provider::FetchedItem;
    use crate::store::Trend;

    /// Create a fetched item with reasonable defaults.
    pub fn fetched_item(id: i64, name: &str, price: i64) -> FetchedItem {
        FetchedItem {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            item_type: "Melee weapons".to_string(),
            icon: format!("https://example.com/{}.gif", id),
            icon_large: format!("https://example.com/{}_large.gif", id),
            members: true,
            price,
            trend: Trend::Neutral,
        }
    }
}
