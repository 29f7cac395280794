//! Core data types for the orbit tracker.

use crate::error::{Error, Result};
use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Epoch layout used by the upstream feed (day-of-year based, UTC).
pub const FEED_EPOCH_FORMAT: &str = "%Y-%jT%H:%M:%S%.fZ";

/// Canonical cache key layout (whole seconds, UTC).
pub const KEY_EPOCH_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an epoch in the feed's `YYYY-DDDThh:mm:ss.ffffffZ` layout.
pub fn parse_feed_epoch(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), FEED_EPOCH_FORMAT)
        .map_err(|e| Error::invalid_input(format!("bad epoch '{raw}': {e}")))
}

/// Euclidean norm of a velocity vector.
///
/// Rejects NaN and infinite components instead of letting them propagate
/// into the result.
#[inline]
pub fn speed(x_dot: f64, y_dot: f64, z_dot: f64) -> Result<f64> {
    if !(x_dot.is_finite() && y_dot.is_finite() && z_dot.is_finite()) {
        return Err(Error::invalid_input(format!(
            "non-numeric velocity ({x_dot}, {y_dot}, {z_dot})"
        )));
    }
    Ok((x_dot * x_dot + y_dot * y_dot + z_dot * z_dot).sqrt())
}

/// A single position/velocity sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// Sample time (UTC).
    #[serde(with = "display_epoch")]
    pub epoch: NaiveDateTime,
    /// Position, km.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Velocity, km/s.
    pub x_dot: f64,
    pub y_dot: f64,
    pub z_dot: f64,
}

impl StateVector {
    /// Cache key for this record.
    #[inline]
    pub fn key(&self) -> EpochKey {
        EpochKey::from_epoch(self.epoch)
    }

    /// Whether all six components are finite.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.x_dot, self.y_dot, self.z_dot]
            .iter()
            .all(|c| c.is_finite())
    }

    /// Speed at this sample, km/s.
    #[inline]
    pub fn speed(&self) -> Result<f64> {
        speed(self.x_dot, self.y_dot, self.z_dot)
    }
}

/// Canonical cache key: an epoch truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochKey(NaiveDateTime);

impl EpochKey {
    /// Build a key from any epoch, dropping sub-second precision.
    pub fn from_epoch(epoch: NaiveDateTime) -> Self {
        EpochKey(epoch.trunc_subsecs(0))
    }

    /// The truncated epoch.
    pub fn epoch(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for EpochKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_EPOCH_FORMAT))
    }
}

impl FromStr for EpochKey {
    type Err = Error;

    /// Accepts the feed layout or the canonical key layout.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(epoch) = NaiveDateTime::parse_from_str(s, FEED_EPOCH_FORMAT) {
            return Ok(EpochKey::from_epoch(epoch));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
            .map(EpochKey::from_epoch)
            .map_err(|_| {
                Error::invalid_input(format!(
                    "epoch '{s}' is neither YYYY-DDDThh:mm:ss.ffffffZ nor YYYY-MM-DD hh:mm:ss"
                ))
            })
    }
}

/// Serde adapter rendering epochs in the key layout, keeping any fraction.
mod display_epoch {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    pub fn serialize<S: Serializer>(epoch: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&epoch.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, Timelike};

    fn sample(epoch: NaiveDateTime) -> StateVector {
        StateVector {
            epoch,
            x: -4500.1,
            y: 2000.2,
            z: 4300.3,
            x_dot: 3.0,
            y_dot: 4.0,
            z_dot: 0.0,
        }
    }

    #[test]
    fn test_speed_values() {
        assert_relative_eq!(speed(3.0, 4.0, 0.0).unwrap(), 5.0);
        assert_eq!(speed(0.0, 0.0, 0.0).unwrap(), 0.0);
        assert_relative_eq!(speed(1.0, 2.0, 2.0).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_speed_rejects_nan() {
        assert!(matches!(speed(f64::NAN, 1.0, 1.0), Err(Error::InvalidInput(_))));
        assert!(matches!(speed(1.0, f64::INFINITY, 1.0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_feed_epoch_day_of_year() {
        let epoch = parse_feed_epoch("2024-047T12:00:00.123456Z").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 16)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 123_456)
            .unwrap();
        assert_eq!(epoch, expected);
        assert!(parse_feed_epoch("2024-02-16T12:00:00Z").is_err());
    }

    #[test]
    fn test_key_truncates_subseconds() {
        let epoch = parse_feed_epoch("2024-047T12:00:05.999999Z").unwrap();
        let key = EpochKey::from_epoch(epoch);
        assert_eq!(key.to_string(), "2024-02-16 12:00:05");
        assert_eq!(key.epoch().nanosecond(), 0);
    }

    #[test]
    fn test_key_from_str_accepts_both_layouts() {
        let a: EpochKey = "2024-047T12:00:05.500000Z".parse().unwrap();
        let b: EpochKey = "2024-02-16 12:00:05".parse().unwrap();
        assert_eq!(a, b);
        assert!(matches!("yesterday".parse::<EpochKey>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_state_vector_json_epoch() {
        let sv = sample(parse_feed_epoch("2024-047T12:00:05.000000Z").unwrap());
        let json = serde_json::to_value(&sv).unwrap();
        assert_eq!(json["epoch"], "2024-02-16 12:00:05");

        let back: StateVector = serde_json::from_value(json).unwrap();
        assert_eq!(back, sv);
    }

    #[test]
    fn test_key_truncates_and_finite() {
        let sv = sample(parse_feed_epoch("2024-047T12:00:05.250000Z").unwrap());
        assert_eq!(sv.key().epoch().nanosecond(), 0);
        assert!(sv.is_finite());
        assert_relative_eq!(sv.speed().unwrap(), 5.0);

        let bad = StateVector { z: f64::NAN, ..sv };
        assert!(!bad.is_finite());
    }
}
