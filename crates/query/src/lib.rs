//! Query engine for the orbit tracker.
//!
//! Read-only functions over state-vector snapshots:
//! - Offset/limit windows
//! - Nearest sample to a timestamp
//! - Epoch coverage and speed statistics
//! - Whole-series summary

pub mod kinematics;
pub mod nearest;
pub mod slice;
pub mod summary;

pub use kinematics::{average_speed, epoch_range, instantaneous_speed, EpochRange};
pub use nearest::{nearest_epoch, nearest_to_now};
pub use slice::range_slice;
pub use summary::{summarize, SeriesSummary};
