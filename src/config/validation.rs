use crate::config::types::{Config, CrawlerConfig, HttpConfig, PolicyConfig};
use crate::ConfigError;

/// Upper bound on the concurrent worker pool
const MAX_WORKERS: usize = 100;

impl Config {
    /// Validates the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_crawler_config(&self.crawler)?;
        validate_http_config(&self.http)?;
        validate_policy_config(&self.policy)?;
        Ok(())
    }
}

/// Validates traversal limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay_seconds must be a finite number >= 0, got {}",
            config.delay_seconds
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.client_identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "client_identity cannot be empty".to_string(),
        ));
    }

    for (field, value) in [
        ("client_identity", &config.client_identity),
        ("accept_language", &config.accept_language),
    ] {
        if reqwest::header::HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid header value: {:?}",
                field, value
            )));
        }
    }

    if !config.timeout_seconds.is_finite() || config.timeout_seconds <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be a finite number > 0, got {}",
            config.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates the ignore list
fn validate_policy_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    for ext in &config.ignore_extensions {
        if ext.is_empty() {
            return Err(ConfigError::Validation(
                "ignore_extensions cannot contain an empty entry".to_string(),
            ));
        }
    }

    Ok(())
}
