use serde::Deserialize;
use std::time::Duration;

/// Default crawl duration in seconds
pub const DEFAULT_DURATION_SECS: u64 = 5;

/// Default number of concurrent fetches
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Main configuration structure for Sumi-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Base URL to crawl; everything printed lives beneath it
    #[serde(default)]
    pub target: Option<String>,

    /// How long to crawl, in seconds
    #[serde(default = "default_duration")]
    pub duration: u64,

    /// Maximum number of fetches in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Fixed delay held after each fetch before its token is released (milliseconds)
    #[serde(rename = "fetch-delay-ms", default)]
    pub fetch_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            target: None,
            duration: DEFAULT_DURATION_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_delay_ms: 0,
        }
    }
}

impl CrawlConfig {
    /// The crawl deadline as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration)
    }

    /// The post-fetch throttle as a `Duration`
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL)`, or `CrawlerName/Version`
    /// when no contact URL is configured.
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Values supplied on the command line, applied over file or default values
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub duration: Option<u64>,
    pub concurrency: Option<usize>,
    pub fetch_delay_ms: Option<u64>,
}

impl Config {
    /// Applies command-line overrides on top of this configuration
    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(target) = overrides.target {
            self.crawl.target = Some(target);
        }
        if let Some(duration) = overrides.duration {
            self.crawl.duration = duration;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.crawl.concurrency = concurrency;
        }
        if let Some(delay) = overrides.fetch_delay_ms {
            self.crawl.fetch_delay_ms = delay;
        }
        self
    }
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECS
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_crawler_name() -> String {
    "SumiSweep".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
