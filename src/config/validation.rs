use crate::config::types::{Config, CrawlConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent fetches
const MAX_CONCURRENCY: usize = 1000;

/// Upper bound on the post-fetch throttle (milliseconds)
const MAX_FETCH_DELAY_MS: u64 = 60_000;

/// Upper bound on the crawl duration (one week, in seconds)
const MAX_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    let target = match config.target.as_deref() {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ConfigError::MissingTarget),
    };
    validate_target(target)?;

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.duration > MAX_DURATION_SECS {
        return Err(ConfigError::Validation(format!(
            "duration must be <= {}s, got {}s",
            MAX_DURATION_SECS, config.duration
        )));
    }

    if config.fetch_delay_ms > MAX_FETCH_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "fetch-delay-ms must be <= {}ms, got {}ms",
            MAX_FETCH_DELAY_MS, config.fetch_delay_ms
        )));
    }

    Ok(())
}

/// Validates that the target is an absolute http(s) URL with a host
fn validate_target(target: &str) -> Result<(), ConfigError> {
    let url = Url::parse(target).map_err(|e| ConfigError::InvalidUrl(format!("{target}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::InvalidUrl(format!(
                "{target}: unsupported scheme '{other}'"
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("{target}: missing host")));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}
