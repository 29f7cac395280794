//! Time span and speed statistics over a series.

use chrono::{Duration, NaiveDateTime};
use orbit_core::{Error, Result, StateVector};
use tracing::debug;

/// First and last epoch of a series and the time between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochRange {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    pub span: Duration,
}

/// Earliest and latest epoch, independent of input order.
pub fn epoch_range(series: &[StateVector]) -> Result<EpochRange> {
    let first = series.iter().map(|sv| sv.epoch).min().ok_or(Error::EmptySeries)?;
    let last = series.iter().map(|sv| sv.epoch).max().ok_or(Error::EmptySeries)?;

    debug!(%first, %last, "series coverage");
    Ok(EpochRange {
        first,
        last,
        span: last - first,
    })
}

/// Speed of a single record, km/s.
#[inline]
pub fn instantaneous_speed(record: &StateVector) -> Result<f64> {
    record.speed()
}

/// Mean speed over every record, km/s.
pub fn average_speed(series: &[StateVector]) -> Result<f64> {
    if series.is_empty() {
        return Err(Error::EmptySeries);
    }

    let mut total = 0.0;
    for sv in series {
        total += instantaneous_speed(sv)?;
    }
    let avg = total / series.len() as f64;

    debug!(avg, records = series.len(), "average speed");
    Ok(avg)
}
