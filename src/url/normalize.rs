/// Normalizes a crawl target into the origin string used for all prefix checks
///
/// Surrounding whitespace and a single trailing slash are removed. Nothing else
/// is rewritten: discovered links are compared against the origin byte for
/// byte, so scheme and host case are kept as given.
///
/// # Examples
///
/// ```
/// use sumi_sweep::url::normalize_origin;
///
/// assert_eq!(normalize_origin("http://a.test/"), "http://a.test");
/// assert_eq!(normalize_origin("http://a.test/docs"), "http://a.test/docs");
/// ```
pub fn normalize_origin(target: &str) -> String {
    let trimmed = target.trim();
    trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
}

/// Returns the robots.txt location for a normalized origin
pub fn robots_url(origin: &str) -> String {
    format!("{origin}/robots.txt")
}
