//! Link extraction from raw page bytes
//!
//! This is a pattern scan, not an HTML parser. It finds absolute `http(s)://`
//! URLs anywhere in the body and keeps the ones under the crawl origin.
//!
//! **Known limits, kept on purpose:**
//! - Relative links are never found
//! - A match stops at the first character outside `[A-Za-z0-9./?=_%:-]`, so
//!   URLs containing `#`, `&`, `~` and similar are truncated
//! - Filtering is by substring, so `/jpgs/` is dropped along with `.jpg`

use regex::bytes::Regex;

/// Matches absolute URLs made of a conservative character class
const LINK_PATTERN: &str = r"(http|https)://[a-zA-Z0-9./?=_%:-]*";

/// Matches substrings associated with non-document resources
const IGNORE_PATTERN: &str = r"(jpg|png|gif|\.js|\.aspx)";

/// Extracts same-origin links from page bodies
///
/// Patterns are compiled once and shared by every fetch task.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    origin: String,
    link_pattern: Regex,
    ignore_pattern: Regex,
}

impl LinkExtractor {
    /// Creates an extractor for the given normalized origin
    ///
    /// # Returns
    ///
    /// * `Ok(LinkExtractor)` - Patterns compiled
    /// * `Err(regex::Error)` - A pattern failed to compile
    pub fn new(origin: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            origin: origin.into(),
            link_pattern: Regex::new(LINK_PATTERN)?,
            ignore_pattern: Regex::new(IGNORE_PATTERN)?,
        })
    }

    /// Returns every same-origin link in `body`, in order of appearance
    ///
    /// Duplicates are kept; deduplication belongs to the control loop.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_sweep::crawler::LinkExtractor;
    ///
    /// let extractor = LinkExtractor::new("http://example.com").unwrap();
    /// let body = br#"<img src="http://example.com/a.png"><a href="http://example.com/page2">"#;
    /// assert_eq!(extractor.extract(body), vec!["http://example.com/page2"]);
    /// ```
    pub fn extract(&self, body: &[u8]) -> Vec<String> {
        self.link_pattern
            .find_iter(body)
            .map(|m| m.as_bytes())
            .filter(|candidate| !self.ignore_pattern.is_match(candidate))
            .filter(|candidate| candidate.starts_with(self.origin.as_bytes()))
            // The character class is pure ASCII, so matches are always valid UTF-8
            .filter_map(|candidate| std::str::from_utf8(candidate).ok())
            .map(str::to_string)
            .collect()
    }
}
