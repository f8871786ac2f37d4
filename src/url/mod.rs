//! URL handling module for Sumi-Sweep
//!
//! The crawl treats URLs as plain strings scoped by an origin prefix. This
//! module owns the one-time normalization of that origin.

mod normalize;

pub use normalize::{normalize_origin, robots_url};
