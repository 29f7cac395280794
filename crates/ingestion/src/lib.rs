//! Feed ingestion for the orbit tracker.
//!
//! This crate handles:
//! - Fetching the raw state-vector document (HTTP or local file)
//! - Parsing and validating it into ordered state vectors

pub mod parser;
pub mod source;

pub use parser::FeedParser;
pub use source::{FeedSource, FileFeedSource, HttpFeedSource};
