//! YouTube Data API access
//!
//! Provides the blocking HTTP client used to enumerate channel videos
//! and collect top-level video comments.

pub mod youtube;
