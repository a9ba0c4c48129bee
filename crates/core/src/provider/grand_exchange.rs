//! Grand Exchange catalogue API client.
//!
//! The catalogue exposes a per-id detail lookup returning item metadata and
//! current/today price blocks. Prices arrive loosely typed: either JSON
//! numbers or abbreviated strings like `"75.8k"`, `"1,234"` or `"+5"`.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{FetchedItem, ItemProvider, ProviderError, RateLimiter};
use crate::config::ProviderConfig;
use crate::store::Trend;
use async_trait::async_trait;

/// Client for the Grand Exchange item catalogue API.
pub struct GrandExchangeClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
}

impl GrandExchangeClient {
    /// Create a new catalogue client.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        if config.base_url.is_empty() {
            return Err(ProviderError::NotConfigured(
                "provider base URL is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(config.rate_limit_rpm),
        })
    }
}

#[async_trait]
impl ItemProvider for GrandExchangeClient {
    async fn fetch(&self, id: i64) -> Result<FetchedItem, ProviderError> {
        self.limiter.acquire().await;

        let url = format!("{}/catalogue/detail.json", self.base_url);

        debug!("Catalogue detail fetch: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&[("item", id.to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Transient(format!("request timed out: {}", e))
                } else {
                    ProviderError::Transient(e.to_string())
                }
            })?;

        let status = response.status();
        if status == 404 {
            return Err(ProviderError::NotFound(id));
        }
        if status.is_server_error() || status == 429 {
            return Err(ProviderError::Transient(format!(
                "upstream returned status {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::Format(format!(
                "unexpected status {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transient(e.to_string()))?;

        // The catalogue answers missing ids with an empty body rather than
        // a 404, which fails parsing here.
        let detail: GeDetailResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Format(format!("failed to parse detail response: {}", e)))?;

        validate_item(detail.item, id)
    }
}

// ============================================================================
// Catalogue wire types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GeDetailResponse {
    item: GeItem,
}

#[derive(Debug, Deserialize)]
struct GeItem {
    id: i64,
    name: String,
    description: String,
    #[serde(rename = "type")]
    item_type: String,
    icon: String,
    icon_large: String,
    /// "true" or "false" as a string.
    members: String,
    current: GePrice,
    #[allow(dead_code)]
    today: Option<GePrice>,
}

#[derive(Debug, Deserialize)]
struct GePrice {
    trend: String,
    price: GePriceValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GePriceValue {
    Number(f64),
    Text(String),
}

// ============================================================================
// Validation
// ============================================================================

fn validate_item(item: GeItem, requested_id: i64) -> Result<FetchedItem, ProviderError> {
    if item.id != requested_id {
        return Err(ProviderError::Format(format!(
            "response id {} does not match requested id {}",
            item.id, requested_id
        )));
    }

    if item.name.is_empty() {
        return Err(ProviderError::Format("item name is empty".to_string()));
    }

    let members = match item.members.as_str() {
        "true" => true,
        "false" => false,
        other => {
            return Err(ProviderError::Format(format!(
                "unexpected members flag: {:?}",
                other
            )))
        }
    };

    let trend = parse_trend(&item.current.trend)?;

    let price = parse_price(&item.current.price)?;
    if price < 0 {
        return Err(ProviderError::Format(format!(
            "negative current price: {}",
            price
        )));
    }

    Ok(FetchedItem {
        id: item.id,
        name: item.name,
        description: item.description,
        item_type: item.item_type,
        icon: item.icon,
        icon_large: item.icon_large,
        members,
        price,
        trend,
    })
}

fn parse_trend(label: &str) -> Result<Trend, ProviderError> {
    match label {
        "positive" => Ok(Trend::Up),
        "negative" => Ok(Trend::Down),
        "neutral" => Ok(Trend::Neutral),
        other => Err(ProviderError::Format(format!(
            "unknown trend label: {:?}",
            other
        ))),
    }
}

/// Parse a catalogue price value.
///
/// Numbers pass through; strings may carry a thousands separator, a sign
/// prefix and a k/m/b magnitude suffix. Anything else is a format error.
fn parse_price(value: &GePriceValue) -> Result<i64, ProviderError> {
    let s = match value {
        GePriceValue::Number(n) => return Ok(*n as i64),
        GePriceValue::Text(s) => s,
    };

    let mut s = s.replace([',', ' '], "");
    if let Some(stripped) = s.strip_prefix('+') {
        s = stripped.to_string();
    }

    let multiplier = match s.chars().last() {
        Some('k') | Some('K') => 1_000.0,
        Some('m') | Some('M') => 1_000_000.0,
        Some('b') | Some('B') => 1_000_000_000.0,
        _ => 1.0,
    };
    if multiplier > 1.0 {
        s.pop();
    }

    let val: f64 = s
        .parse()
        .map_err(|_| ProviderError::Format(format!("unparseable price value: {:?}", s)))?;

    Ok((val * multiplier) as i64)
}
