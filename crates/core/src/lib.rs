//! Core types and configuration for the orbit tracker.
//!
//! This crate provides shared types used across all other crates:
//! - State vectors and canonical epoch keys
//! - Speed computation
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
