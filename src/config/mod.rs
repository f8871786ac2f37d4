//! Configuration module for Sumi-Sweep
//!
//! Configuration is built once from defaults, an optional TOML file and
//! command-line overrides, validated, and then passed by value into the crawl.
//!
//! # Example
//!
//! ```no_run
//! use sumi_sweep::config::{load_config, validate, Overrides};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml"))
//!     .unwrap()
//!     .apply_overrides(Overrides {
//!         target: Some("https://example.com".to_string()),
//!         ..Default::default()
//!     });
//! validate(&config).unwrap();
//! println!("Crawling for {}s", config.crawl.duration);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, Overrides, UserAgentConfig, DEFAULT_CONCURRENCY, DEFAULT_DURATION_SECS,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
