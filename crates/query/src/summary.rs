//! One-shot report over a whole series.

use crate::kinematics::{average_speed, epoch_range, instantaneous_speed, EpochRange};
use crate::nearest::nearest_epoch;
use chrono::NaiveDateTime;
use orbit_core::{Result, StateVector};
use std::fmt;

/// Coverage, closest sample and speeds for a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub records: usize,
    pub range: EpochRange,
    pub nearest: StateVector,
    pub nearest_speed: f64,
    pub average_speed: f64,
}

/// Summarize `series` relative to `now`.
pub fn summarize(series: &[StateVector], now: NaiveDateTime) -> Result<SeriesSummary> {
    let range = epoch_range(series)?;
    let nearest = nearest_epoch(series, now)?.clone();
    let nearest_speed = instantaneous_speed(&nearest)?;

    Ok(SeriesSummary {
        records: series.len(),
        range,
        nearest,
        nearest_speed,
        average_speed: average_speed(series)?,
    })
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Data covers {} state vectors from {} to {}",
            self.records, self.range.first, self.range.last
        )?;
        writeln!(f, "Which is {} seconds apart", self.range.span.num_seconds())?;
        writeln!(
            f,
            "Closest state vector: {} (x={:.3}, y={:.3}, z={:.3} km)",
            self.nearest.epoch, self.nearest.x, self.nearest.y, self.nearest.z
        )?;
        writeln!(f, "Average speed: {:.6} km/s", self.average_speed)?;
        write!(f, "Speed of closest state vector: {:.6} km/s", self.nearest_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, three_sample};
    use approx::assert_relative_eq;
    use orbit_core::Error;

    #[test]
    fn test_summary_fields() {
        let summary = summarize(&three_sample(), at(12, 9)).unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.range.first, at(12, 0));
        assert_eq!(summary.nearest.epoch, at(12, 10));
        assert_relative_eq!(summary.nearest_speed, 27f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(summary.average_speed, 2.0 * 3f64.sqrt(), epsilon = 1e-12);

        let text = summary.to_string();
        assert!(text.contains("600 seconds apart"), "{text}");
    }

    #[test]
    fn test_summary_of_empty_series() {
        assert!(matches!(summarize(&[], at(12, 0)), Err(Error::EmptySeries)));
    }
}
