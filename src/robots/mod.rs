//! Robots.txt handling module
//!
//! This module fetches and parses the target's robots.txt and turns the
//! wildcard rules into the crawl's exclusion set.

mod disallow;
mod parser;

pub use disallow::{derive_disallow_set, DisallowSet};
pub use parser::{parse_robots, AgentRecord, RobotsOutcome};

use crate::crawler::fetch_url;
use crate::url::robots_url;
use crate::SweepError;
use reqwest::Client;

/// Fetches robots.txt for an origin
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - The normalized crawl origin (no trailing slash)
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The robots.txt body
/// * `Err(SweepError::RobotsFetch)` - The request failed or did not return 200
pub async fn fetch_robots(client: &Client, origin: &str) -> Result<Vec<u8>, SweepError> {
    let url = robots_url(origin);
    tracing::debug!("Fetching robots.txt: {}", url);

    fetch_url(client, &url)
        .await
        .into_body()
        .map_err(|reason| SweepError::RobotsFetch { url, reason })
}
