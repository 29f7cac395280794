//! HTTP API for the orbit tracker.
//!
//! Exposes the cached state-vector series over HTTP:
//! - Whole series or offset/limit windows
//! - Point lookup by epoch, with speed and ground location
//! - Sample closest to now

pub mod error;
pub mod handlers;
pub mod location;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use location::{GeodeticLocator, GroundLocation, Locator, ReverseGeocoder};
pub use server::{router, serve};
pub use state::AppState;
