//! Nearest-sample lookup.

use chrono::{NaiveDateTime, Utc};
use orbit_core::{Error, Result, StateVector};
use tracing::debug;

/// Find the record whose epoch is closest to `target`.
///
/// Linear scan; on an exact tie the record met first in iteration order wins.
pub fn nearest_epoch(series: &[StateVector], target: NaiveDateTime) -> Result<&StateVector> {
    let mut iter = series.iter();
    let mut best = iter.next().ok_or(Error::EmptySeries)?;
    let mut best_gap = (best.epoch - target).abs();

    for sv in iter {
        let gap = (sv.epoch - target).abs();
        if gap < best_gap {
            best = sv;
            best_gap = gap;
        }
    }

    debug!(epoch = %best.epoch, gap_s = best_gap.num_seconds(), "nearest state vector");
    Ok(best)
}

/// Find the record closest to the current UTC time.
pub fn nearest_to_now(series: &[StateVector]) -> Result<&StateVector> {
    nearest_epoch(series, Utc::now().naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, three_sample};

    #[test]
    fn test_between_samples() {
        let s = three_sample();
        let sv = nearest_epoch(&s, at(12, 6)).unwrap();
        assert_eq!(sv.epoch, at(12, 5));
    }

    #[test]
    fn test_exact_match() {
        let s = three_sample();
        assert_eq!(nearest_epoch(&s, at(12, 10)).unwrap().epoch, at(12, 10));
        assert_eq!(nearest_epoch(&s, at(12, 0)).unwrap().epoch, at(12, 0));
    }

    #[test]
    fn test_outside_span_clamps_to_ends() {
        let s = three_sample();
        assert_eq!(nearest_epoch(&s, at(9, 0)).unwrap().epoch, at(12, 0));
        assert_eq!(nearest_epoch(&s, at(23, 0)).unwrap().epoch, at(12, 10));
    }

    #[test]
    fn test_tie_keeps_first_in_order() {
        let s = three_sample();
        // 12:02:30 is equidistant from 12:00 and 12:05.
        let midpoint = at(12, 2) + chrono::Duration::seconds(30);
        assert_eq!(nearest_epoch(&s, midpoint).unwrap().epoch, at(12, 0));

        let reversed: Vec<_> = s.iter().rev().cloned().collect();
        assert_eq!(nearest_epoch(&reversed, midpoint).unwrap().epoch, at(12, 5));
    }

    #[test]
    fn test_empty_series() {
        assert!(matches!(nearest_epoch(&[], at(12, 0)), Err(Error::EmptySeries)));
        assert!(matches!(nearest_to_now(&[]), Err(Error::EmptySeries)));
    }

    #[test]
    fn test_now_on_single_record() {
        let s = vec![three_sample().remove(1)];
        assert_eq!(nearest_to_now(&s).unwrap().epoch, at(12, 5));
    }
}
