use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider base URL and timeout are usable
/// - Ingest retry budget is at least one attempt
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.provider.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.base_url cannot be empty".to_string(),
        ));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.provider.rate_limit_rpm == 0 {
        return Err(ConfigError::ValidationError(
            "provider.rate_limit_rpm cannot be 0".to_string(),
        ));
    }

    if config.ingest.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "ingest.max_attempts cannot be 0".to_string(),
        ));
    }

    if config.search.result_limit == 0 {
        return Err(ConfigError::ValidationError(
            "search.result_limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}
