//! State-vector cache for the orbit tracker.
//!
//! This crate provides:
//! - A SQLite-backed map from canonical epoch key to state vector
//! - Load-once population from a feed source, safe under concurrent first access
//! - A fixed-schema record encoding for cached rows

pub mod codec;
pub mod series;

pub use series::SeriesStore;
