//! Crawl phase definitions for the frontier control loop
//!
//! The loop moves strictly forward: it is seeded with the origin, runs until
//! its deadline elapses, and then stops selecting on new batches.

use std::fmt;

/// Represents the current phase of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// The origin has not yet been posted as the initial batch
    Seeding,

    /// Result batches are being consumed and fetch tasks dispatched
    Running,

    /// The deadline elapsed; in-flight fetch tasks are abandoned
    Terminated,
}

impl CrawlPhase {
    /// Returns true if no further batches will be processed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns true if moving from this phase to `next` is allowed
    ///
    /// Seeding may be cut short by the deadline, so both Seeding and Running
    /// may move to Terminated.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Seeding, Self::Running)
                | (Self::Seeding, Self::Terminated)
                | (Self::Running, Self::Terminated)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
