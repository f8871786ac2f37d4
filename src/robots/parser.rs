//! Robots.txt parser implementation
//!
//! A single line-oriented parser for the `directive: value` grammar. Only
//! `User-agent`, `Allow`, `Disallow` and `Sitemap` are understood; anything
//! else is skipped without failing the parse.

/// Rules collected for one `User-agent` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRecord {
    /// The user-agent value as written in robots.txt
    pub name: String,

    /// `Allow` path suffixes, in file order
    pub allowed: Vec<String>,

    /// `Disallow` path suffixes, in file order
    pub disallowed: Vec<String>,
}

impl AgentRecord {
    /// Creates an empty record for the given user-agent value
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed: Vec::new(),
            disallowed: Vec::new(),
        }
    }

    /// Adds a path suffix to the list of allowed suffixes
    pub fn add_allowed(&mut self, suffix: impl Into<String>) {
        self.allowed.push(suffix.into());
    }

    /// Adds a path suffix to the list of disallowed suffixes
    pub fn add_disallowed(&mut self, suffix: impl Into<String>) {
        self.disallowed.push(suffix.into());
    }

    /// Returns true if this record applies to every crawler
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

/// Result of parsing a robots.txt body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsOutcome {
    /// Parsing reached end of input; records are in the order they were closed
    Agents(Vec<AgentRecord>),

    /// A `Sitemap` directive was found; parsing stopped there and the crawl
    /// must be replaced by reading this sitemap
    Sitemap(String),
}

/// Parses a robots.txt body
///
/// # Parsing Rules
///
/// - Each line is `directive: value`; the directive is case-insensitive and
///   whitespace around both parts is ignored
/// - `#` starts a comment that runs to the end of the line
/// - A `User-agent` line with a value different from the open record closes
///   that record and opens a new one; repeating the open record's value keeps
///   adding to it
/// - `Allow` / `Disallow` append to the open record
/// - `Sitemap` ends parsing immediately with [`RobotsOutcome::Sitemap`]
/// - Lines without a colon, unknown directives, empty values and rules that
///   appear before any `User-agent` line are skipped
///
/// # Arguments
///
/// * `body` - Raw robots.txt bytes; invalid UTF-8 is replaced, not rejected
///
/// # Example
///
/// ```
/// use sumi_sweep::robots::{parse_robots, RobotsOutcome};
///
/// let outcome = parse_robots(b"User-agent: *\nDisallow: /private");
/// match outcome {
///     RobotsOutcome::Agents(records) => assert_eq!(records[0].disallowed, vec!["/private"]),
///     RobotsOutcome::Sitemap(_) => unreachable!(),
/// }
/// ```
pub fn parse_robots(body: &[u8]) -> RobotsOutcome {
    let text = String::from_utf8_lossy(body);
    let mut records = Vec::new();
    let mut current: Option<AgentRecord> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((directive, value)) = line.split_once(':') else {
            tracing::debug!("robots.txt line {}: no directive, skipped", index + 1);
            continue;
        };

        let directive = directive.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match directive.as_str() {
            "user-agent" => {
                let continues = current.as_ref().is_some_and(|agent| agent.name == value);
                if !continues {
                    if let Some(done) = current.take() {
                        records.push(done);
                    }
                    current = Some(AgentRecord::new(value));
                }
            }
            "allow" => match current.as_mut() {
                Some(agent) => agent.add_allowed(value),
                None => tracing::debug!(
                    "robots.txt line {}: Allow before any User-agent, skipped",
                    index + 1
                ),
            },
            "disallow" => match current.as_mut() {
                Some(agent) => agent.add_disallowed(value),
                None => tracing::debug!(
                    "robots.txt line {}: Disallow before any User-agent, skipped",
                    index + 1
                ),
            },
            "sitemap" => return RobotsOutcome::Sitemap(value.to_string()),
            other => {
                tracing::trace!("robots.txt line {}: ignoring directive '{}'", index + 1, other)
            }
        }
    }

    if let Some(done) = current {
        records.push(done);
    }

    RobotsOutcome::Agents(records)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(body: &str) -> Vec<AgentRecord> {
        match parse_robots(body.as_bytes()) {
            RobotsOutcome::Agents(records) => records,
            RobotsOutcome::Sitemap(url) => panic!("unexpected sitemap {}", url),
        }
    }

    #[test]
    fn test_parse_disallow_specific() {
        let records = agents("User-agent: *\nDisallow: /private");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "*");
        assert!(records[0].is_wildcard());
        assert_eq!(records[0].disallowed, vec!["/private"]);
        assert!(records[0].allowed.is_empty());
    }

    #[test]
    fn test_parse_allow_and_disallow_in_order() {
        let records = agents("User-agent: *\nDisallow: /private\nAllow: /private/public\nDisallow: /tmp");
        assert_eq!(records[0].disallowed, vec!["/private", "/tmp"]);
        assert_eq!(records[0].allowed, vec!["/private/public"]);
    }

    #[test]
    fn test_new_agent_closes_previous_record() {
        let records = agents("User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nDisallow: /admin");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "BadBot");
        assert_eq!(records[0].disallowed, vec!["/"]);
        assert_eq!(records[1].name, "*");
        assert_eq!(records[1].disallowed, vec!["/admin"]);
    }

    #[test]
    fn test_repeated_agent_continues_record() {
        let records = agents("User-agent: *\nDisallow: /a\nUser-agent: *\nDisallow: /b");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disallowed, vec!["/a", "/b"]);
    }

    #[test]
    fn test_non_adjacent_repeats_make_separate_records() {
        let records = agents("User-agent: *\nDisallow: /a\nUser-agent: bot\nUser-agent: *\nDisallow: /b");
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["*", "bot", "*"]);
    }

    #[test]
    fn test_directives_case_insensitive_and_whitespace() {
        let records = agents("  USER-AGENT :   *  \n\tdisAllow:/x   \nALLOW:   /y");
        assert_eq!(records[0].name, "*");
        assert_eq!(records[0].disallowed, vec!["/x"]);
        assert_eq!(records[0].allowed, vec!["/y"]);
    }

    #[test]
    fn test_comments_are_stripped() {
        let records = agents("# header\nUser-agent: * # everyone\nDisallow: /private # secret");
        assert_eq!(records[0].name, "*");
        assert_eq!(records[0].disallowed, vec!["/private"]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let records = agents("This is not valid robots.txt {{{\nUser-agent: *\nCrawl-delay: 10\nDisallow /nocolon\nDisallow: /ok");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disallowed, vec!["/ok"]);
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let records = agents("User-agent: *\nDisallow:\nAllow:   ");
        assert_eq!(records.len(), 1);
        assert!(records[0].disallowed.is_empty());
        assert!(records[0].allowed.is_empty());
    }

    #[test]
    fn test_rules_before_agent_are_skipped() {
        let records = agents("Disallow: /early\nUser-agent: *\nDisallow: /late");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disallowed, vec!["/late"]);
    }

    #[test]
    fn test_empty_robots_txt() {
        assert!(agents("").is_empty());
        assert!(agents("\n\n   \n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = agents("User-agent: *\r\nDisallow: /private\r\n");
        assert_eq!(records[0].disallowed, vec!["/private"]);
    }

    #[test]
    fn test_sitemap_stops_parsing() {
        let outcome = parse_robots(
            b"User-agent: *\nDisallow: /\nSitemap: https://example.com/sitemap.xml\nDisallow: /later",
        );
        assert_eq!(
            outcome,
            RobotsOutcome::Sitemap("https://example.com/sitemap.xml".to_string())
        );
    }

    #[test]
    fn test_sitemap_directive_case_insensitive() {
        let outcome = parse_robots(b"SITEMAP: http://a.test/map.xml");
        assert_eq!(outcome, RobotsOutcome::Sitemap("http://a.test/map.xml".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut body = b"User-agent: *\nDisallow: /caf".to_vec();
        body.push(0xff);
        body.extend_from_slice(b"\nDisallow: /ok");
        let RobotsOutcome::Agents(records) = parse_robots(&body) else {
            panic!("expected agent records");
        };
        assert_eq!(records[0].disallowed.len(), 2);
        assert_eq!(records[0].disallowed[1], "/ok");
    }
}
