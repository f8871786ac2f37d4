//! Crawler module for the time-boxed frontier crawl
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Pattern-based link extraction
//! - The concurrency gate bounding in-flight fetches
//! - The coordinator loop that deduplicates, prints and dispatches URLs

mod coordinator;
mod extractor;
mod fetcher;
mod gate;

pub use coordinator::{fetch_links, Coordinator, ResultBatch};
pub use extractor::LinkExtractor;
pub use fetcher::{build_http_client, fetch_url, fetch_url_with_timeout, FetchResult};
pub use gate::{ConcurrencyGate, GateToken};

use crate::config::{validate, Config};
use crate::output::CrawlStats;
use crate::robots::{derive_disallow_set, fetch_robots, parse_robots, RobotsOutcome};
use crate::sitemap::{read_sitemap, report_sitemap, SitemapEntry};
use crate::url::normalize_origin;
use crate::{ConfigError, SweepError};
use std::io::Write;

/// How a crawl ended
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The frontier crawl ran to its deadline
    Crawled(CrawlStats),

    /// robots.txt named a sitemap, which was printed instead of crawling
    Sitemap {
        /// Entries read from the sitemap
        entries: Vec<SitemapEntry>,
    },
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and normalize the origin
/// 2. Fetch and interpret the origin's robots.txt
/// 3. Either print the advertised sitemap, or
/// 4. Run the coordinator until the deadline, printing each new URL
///
/// The deadline is armed only after robots.txt has been handled, so its
/// fetch does not count against the crawl duration.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `out` - Where discovered URLs are written, one per line
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl or sitemap report completed
/// * `Err(SweepError)` - Configuration was invalid, robots.txt was unreachable
///   or disallowed everything, or the sitemap could not be read
pub async fn crawl<W: Write>(config: Config, out: &mut W) -> Result<CrawlOutcome, SweepError> {
    validate(&config)?;

    let target = config
        .crawl
        .target
        .as_deref()
        .ok_or(ConfigError::MissingTarget)?;
    let origin = normalize_origin(target);

    let client = build_http_client(&config.user_agent)?;

    tracing::info!("Reading robots.txt for {}", origin);
    let robots_body = fetch_robots(&client, &origin).await?;

    let agents = match parse_robots(&robots_body) {
        RobotsOutcome::Sitemap(sitemap_url) => {
            tracing::info!("robots.txt names a site map: {}", sitemap_url);
            let entries = read_sitemap(&client, &sitemap_url).await?;
            report_sitemap(&entries, out)?;
            return Ok(CrawlOutcome::Sitemap { entries });
        }
        RobotsOutcome::Agents(agents) => agents,
    };

    let disallowed = derive_disallow_set(&agents, &origin)?;
    tracing::debug!(
        "{} agent records, {} disallowed prefixes",
        agents.len(),
        disallowed.len()
    );

    let coordinator = Coordinator::new(&config, client, disallowed)?;
    let stats = coordinator.run(out).await?;

    Ok(CrawlOutcome::Crawled(stats))
}
