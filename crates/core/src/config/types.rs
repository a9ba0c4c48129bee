use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("itemdex.db")
}

/// Upstream item provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the item catalogue API.
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Hard timeout for a single catalogue request, in seconds.
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
    /// User-Agent header sent with catalogue requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Max catalogue requests per minute. The upstream API asks clients
    /// to keep a cooldown between calls.
    #[serde(default = "default_rate_limit_rpm")]
    pub rate_limit_rpm: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            timeout_secs: default_provider_timeout(),
            user_agent: default_user_agent(),
            rate_limit_rpm: default_rate_limit_rpm(),
        }
    }
}

fn default_provider_base_url() -> String {
    "https://services.runescape.com/m=itemdb_rs/api".to_string()
}

fn default_provider_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("itemdex/{}", env!("CARGO_PKG_VERSION"))
}

fn default_rate_limit_rpm() -> u32 {
    12
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Max fetch attempts for transient provider failures.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff between retries, in milliseconds. Doubles per attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Max results returned per query.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

fn default_result_limit() -> usize {
    50
}
