//! Offset/limit windows over a series.

use orbit_core::{Error, Result, StateVector};

/// Return a window of `series` starting at `offset`.
///
/// `offset` must satisfy `0 < offset < len`; offset 0 is rejected as well.
/// A non-positive `limit`, or one reaching past the end, returns everything
/// from `offset` to the end. Otherwise exactly `limit` records are returned.
pub fn range_slice(series: &[StateVector], limit: i64, offset: i64) -> Result<Vec<StateVector>> {
    let len = series.len();
    if len == 0 {
        return Err(Error::out_of_range("series is empty"));
    }
    if offset <= 0 || offset as u64 >= len as u64 {
        return Err(Error::out_of_range(format!(
            "offset {offset} outside 1..{len}"
        )));
    }

    let start = offset as usize;
    let end = if limit <= 0 || offset.saturating_add(limit) as u64 >= len as u64 {
        len
    } else {
        start + limit as usize
    };

    Ok(series[start..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::every_four_minutes as series;

    #[test]
    fn test_exact_window() {
        let s = series(8);
        let window = range_slice(&s, 2, 3).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].x, 3.0);
        assert_eq!(window[1].x, 4.0);
    }

    #[test]
    fn test_negative_offset_rejected() {
        let s = series(8);
        assert!(matches!(range_slice(&s, 2000, -1), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn test_zero_offset_rejected() {
        let s = series(8);
        assert!(matches!(range_slice(&s, 2, 0), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn test_offset_at_len_rejected() {
        let s = series(8);
        assert!(matches!(range_slice(&s, 2, 8), Err(Error::OutOfRange(_))));
        assert!(range_slice(&s, 2, 7).is_ok());
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(range_slice(&[], 2, 1), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn test_limit_clamps_to_end() {
        let s = series(8);
        // Non-positive limit.
        assert_eq!(range_slice(&s, 0, 5).unwrap().len(), 3);
        assert_eq!(range_slice(&s, -4, 5).unwrap().len(), 3);
        // Past the end.
        assert_eq!(range_slice(&s, 2000, 5).unwrap().len(), 3);
        assert_eq!(range_slice(&s, i64::MAX, 5).unwrap().len(), 3);
        // Exactly reaching the end.
        let tail = range_slice(&s, 3, 5).unwrap();
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[2].x, 7.0);
    }
}
