//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the Seeding -> Running -> Terminated lifecycle of the control loop

mod phase;

pub use phase::CrawlPhase;
