//! Sumi-Sweep: a time-boxed origin sweeper
//!
//! This crate discovers and prints reachable URLs beneath a target origin
//! within a fixed time budget, bounding outbound concurrency and honoring
//! the `User-agent: *` disallow rules of the target's robots.txt.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Process exit code for a normal timed termination or sitemap short-circuit
pub const EXIT_SUCCESS: i32 = 0;

/// Process exit code when no target was given or the configuration is unusable
pub const EXIT_USAGE: i32 = 1;

/// Process exit code when robots.txt could not be retrieved
pub const EXIT_ROBOTS_UNREACHABLE: i32 = 2;

/// Process exit code when robots.txt disallows the whole origin
pub const EXIT_EXPLICIT_DISALLOW: i32 = 3;

/// Main error type for Sumi-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Problem with robots.txt at {url}: {reason}")]
    RobotsFetch { url: String, reason: String },

    #[error("Error getting site map {url}: {reason}")]
    SitemapFetch { url: String, reason: String },

    #[error("Cannot crawl {origin}, explicitly disallowed")]
    ExplicitDisallow { origin: String },

    #[error("Couldn't read {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    /// Maps the error to the process exit code reported by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RobotsFetch { .. } => EXIT_ROBOTS_UNREACHABLE,
            Self::ExplicitDisallow { .. } => EXIT_EXPLICIT_DISALLOW,
            _ => EXIT_USAGE,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Must declare a target")]
    MissingTarget,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sumi-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome};
pub use output::CrawlStats;
pub use state::CrawlPhase;
pub use crate::url::normalize_origin;
