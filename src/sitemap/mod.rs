//! Sitemap handling module
//!
//! When robots.txt names a sitemap, the crawl is replaced by reading it: every
//! `<url>` location is printed and the process ends without fetching pages.

mod decode;

pub use decode::{decode_sitemap, SitemapEntry};

use crate::crawler::fetch_url_with_timeout;
use crate::output::emit_url;
use crate::SweepError;
use reqwest::Client;
use std::io::Write;
use std::time::Duration;

/// Request timeout for sitemap retrieval
const SITEMAP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches and decodes a sitemap document
///
/// Decoding is tolerant: a malformed document yields whatever entries were
/// read before the error.
///
/// # Returns
///
/// * `Ok(Vec<SitemapEntry>)` - The entries in document order
/// * `Err(SweepError::SitemapFetch)` - The request failed or did not return 200
pub async fn read_sitemap(client: &Client, url: &str) -> Result<Vec<SitemapEntry>, SweepError> {
    tracing::debug!("Fetching site map: {}", url);

    let body = fetch_url_with_timeout(client, url, SITEMAP_TIMEOUT)
        .await
        .into_body()
        .map_err(|reason| SweepError::SitemapFetch {
            url: url.to_string(),
            reason,
        })?;

    let entries = decode_sitemap(&body);

    if let Some(newest) = entries.iter().filter_map(SitemapEntry::modified_at).max() {
        tracing::debug!("Newest site map entry modified {}", newest.to_rfc3339());
    }

    Ok(entries)
}

/// Reports a sitemap short-circuit: the count to stderr, every location to `out`
///
/// The count line is written even when logging is silenced.
pub fn report_sitemap<W: Write>(entries: &[SitemapEntry], out: &mut W) -> std::io::Result<()> {
    report_sitemap_to(entries, out, &mut std::io::stderr())
}

fn report_sitemap_to<W: Write, N: Write>(
    entries: &[SitemapEntry],
    out: &mut W,
    notice: &mut N,
) -> std::io::Result<()> {
    writeln!(
        notice,
        "Found {} links from the site map. Crawl skipped.",
        entries.len()
    )?;
    for entry in entries {
        emit_url(out, &entry.location)?;
    }
    Ok(())
}
