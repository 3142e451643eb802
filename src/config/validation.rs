use crate::config::types::{
    BrowserConfig, Config, CrawlTarget, CrawlerConfig, OutputConfig, RetryConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound accepted for `max-concurrent-probes`
const MAX_PROBE_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_browser_config(&config.browser)?;
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;
    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.ready_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "ready-selector cannot be empty".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("tags-url", &config.tags_url)?;
    validate_http_url("thumbnail-cdn", &config.thumbnail_cdn)?;

    if config.item_url_pattern.is_empty() {
        return Err(ConfigError::Validation(
            "item-url-pattern cannot be empty".to_string(),
        ));
    }

    if config.end_marker.is_empty() {
        return Err(ConfigError::Validation(
            "end-marker cannot be empty".to_string(),
        ));
    }

    if config.max_concurrent_probes < 1 || config.max_concurrent_probes > MAX_PROBE_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-probes must be between 1 and {}, got {}",
            MAX_PROBE_CONCURRENCY, config.max_concurrent_probes
        )));
    }

    if config.tags_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "tags-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.run_deadline_secs == 0 {
        return Err(ConfigError::Validation(
            "run-deadline-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    for (name, attempts) in [
        ("page-attempts", config.page_attempts),
        ("item-attempts", config.item_attempts),
        ("probe-attempts", config.probe_attempts),
    ] {
        if attempts < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, attempts
            )));
        }
    }

    for (name, secs) in [
        ("page-timeout-secs", config.page_timeout_secs),
        ("single-page-timeout-secs", config.single_page_timeout_secs),
        ("item-timeout-step-secs", config.item_timeout_step_secs),
        ("probe-timeout-step-secs", config.probe_timeout_step_secs),
    ] {
        if secs < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, secs
            )));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.items_path.is_empty() {
        return Err(ConfigError::Validation(
            "items-path cannot be empty".to_string(),
        ));
    }

    if config.tags_path.is_empty() {
        return Err(ConfigError::Validation(
            "tags-path cannot be empty".to_string(),
        ));
    }

    if config.items_path == config.tags_path {
        return Err(ConfigError::Validation(format!(
            "items-path and tags-path must differ, both are '{}'",
            config.items_path
        )));
    }

    Ok(())
}

fn validate_targets(targets: &[CrawlTarget]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] is required".to_string(),
        ));
    }

    for target in targets {
        validate_http_url("target url", &target.url)?;
    }

    Ok(())
}

/// Checks that a URL parses and uses HTTP or HTTPS
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTP or HTTPS",
            name, value
        )));
    }

    Ok(())
}
