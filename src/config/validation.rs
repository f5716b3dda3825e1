use crate::config::types::{BrowserConfig, CacheConfig, Config, OutputConfig, ScraperConfig};
use crate::output::OutputFormat;
use crate::ConfigError;
use scraper::Selector;
use std::collections::BTreeMap;
use url::Url;

/// Upper bound for `max_backoff`
const MAX_BACKOFF_LIMIT: f64 = 1000.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_cache_config(&config.cache)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates request pacing and extraction settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.requests_per_minute < 1 || config.requests_per_minute > 6000 {
        return Err(ConfigError::Validation(format!(
            "requests_per_minute must be between 1 and 6000, got {}",
            config.requests_per_minute
        )));
    }

    if !config.backoff_factor.is_finite() || config.backoff_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_factor must be >= 1.0, got {}",
            config.backoff_factor
        )));
    }

    if !config.max_backoff.is_finite()
        || config.max_backoff < 1.0
        || config.max_backoff > MAX_BACKOFF_LIMIT
    {
        return Err(ConfigError::Validation(format!(
            "max_backoff must be between 1.0 and {}, got {}",
            MAX_BACKOFF_LIMIT, config.max_backoff
        )));
    }

    if !config.recovery_divisor.is_finite() || config.recovery_divisor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "recovery_divisor must be >= 1.0, got {}",
            config.recovery_divisor
        )));
    }

    if config.text_max_length == 0 {
        return Err(ConfigError::Validation(
            "text_max_length must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.enabled && config.ttl_hours == 0 {
        return Err(ConfigError::Validation(
            "ttl_hours must be >= 1 when the cache is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.page_load_timeout == 0 {
        return Err(ConfigError::Validation(
            "page_load_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.wait_timeout == 0 {
        return Err(ConfigError::Validation(
            "wait_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(ref remote) = config.remote_url {
        let url = Url::parse(remote)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid remote_url: {}", e)))?;

        if !matches!(url.scheme(), "ws" | "wss" | "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "remote_url must use ws, wss, http or https, got '{}'",
                url.scheme()
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    config
        .format
        .parse::<OutputFormat>()
        .map_err(ConfigError::Validation)?;

    Ok(())
}

/// Validates that every configured selector name is usable and every selector parses
fn validate_selectors(selectors: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    for (name, selector) in selectors {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "selector names cannot be empty".to_string(),
            ));
        }

        Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
            name: name.clone(),
            message: format!("{:?}", e),
        })?;
    }

    Ok(())
}
