//! Output module for crawl results
//!
//! This module handles:
//! - Writing newly seen URLs, one per line, as they are discovered
//! - Recording crawl statistics for the diagnostics stream

pub mod stats;

pub use stats::CrawlStats;

use std::io::Write;

/// Writes a single URL line and flushes it so it is visible immediately
pub fn emit_url<W: Write>(out: &mut W, url: &str) -> std::io::Result<()> {
    writeln!(out, "{}", url)?;
    out.flush()
}
