//! Exclusion set derived from the wildcard robots.txt rules

use crate::robots::AgentRecord;
use crate::SweepError;
use std::collections::BTreeSet;

/// URL prefixes the crawl must never print or fetch
///
/// Built once before the first fetch and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisallowSet {
    prefixes: BTreeSet<String>,
}

impl DisallowSet {
    /// Creates an empty set that excludes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `prefix` is a member of the set
    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Returns true if `url` starts with any member prefix
    pub fn is_disallowed(&self, url: &str) -> bool {
        self.prefixes.iter().any(|prefix| url.starts_with(prefix.as_str()))
    }

    /// Number of prefixes in the set
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns true if nothing is excluded
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterates over the prefixes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

impl FromIterator<String> for DisallowSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            prefixes: iter.into_iter().collect(),
        }
    }
}

/// Derives the exclusion set for an origin from parsed robots.txt records
///
/// Only records named `*` contribute. Each disallowed suffix becomes the
/// prefix `origin + suffix`.
///
/// # Returns
///
/// * `Ok(DisallowSet)` - The prefixes to exclude
/// * `Err(SweepError::ExplicitDisallow)` - A wildcard record disallows `/`,
///   so the whole origin is off limits
pub fn derive_disallow_set(records: &[AgentRecord], origin: &str) -> Result<DisallowSet, SweepError> {
    let mut prefixes = BTreeSet::new();

    for record in records.iter().filter(|r| r.is_wildcard()) {
        for suffix in &record.disallowed {
            if suffix == "/" {
                return Err(SweepError::ExplicitDisallow {
                    origin: origin.to_string(),
                });
            }
            prefixes.insert(format!("{origin}{suffix}"));
        }
    }

    Ok(DisallowSet { prefixes })
}
