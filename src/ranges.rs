///! Inclusive range predicates for the filter stages
///!
///! Three kinds of range are matched: plain scalars (dec/ra/duration),
///! calendar dates, and times of day. Time ranges may wrap past midnight
///! (22:00–02:00 means "late evening through small hours"). Absent values
///! never match any range.
///!
///! Range bounds arrive as user-supplied strings and are parsed once per
///! filter call, not once per row.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

const DATE_BOUND_FORMAT: &str = "%Y-%m-%d";
const TIME_BOUND_FORMAT: &str = "%H:%M";

/// `low <= value <= high`, both ends inclusive. The caller guarantees
/// `low <= high`. Absent values are excluded unconditionally.
pub fn in_value_range(value: Option<f64>, range: (f64, f64)) -> bool {
    match value {
        Some(v) => range.0 <= v && v <= range.1,
        None => false,
    }
}

/// An inclusive calendar-date range. Matching looks at the date portion of
/// a timestamp only, so the whole final day is inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    low: NaiveDate,
    high: NaiveDate,
}

impl DateRange {
    /// Parse `%Y-%m-%d` bounds. A malformed bound is an [`Error::Format`].
    pub fn parse(low: &str, high: &str) -> Result<Self> {
        Ok(Self {
            low: parse_date_bound(low)?,
            high: parse_date_bound(high)?,
        })
    }

    pub fn contains(&self, value: Option<NaiveDateTime>) -> bool {
        match value {
            Some(t) => self.low <= t.date() && t.date() <= self.high,
            None => false,
        }
    }
}

/// An inclusive time-of-day range. When `low > high` the range wraps past
/// midnight and matches `t >= low || t <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    low: NaiveTime,
    high: NaiveTime,
}

impl TimeRange {
    /// Parse `%H:%M` bounds. A malformed bound is an [`Error::Format`].
    pub fn parse(low: &str, high: &str) -> Result<Self> {
        Ok(Self {
            low: parse_time_bound(low)?,
            high: parse_time_bound(high)?,
        })
    }

    pub fn contains(&self, value: Option<NaiveDateTime>) -> bool {
        let Some(t) = value.map(|dt| dt.time()) else {
            return false;
        };

        if self.low <= self.high {
            self.low <= t && t <= self.high
        } else {
            // Wraps past midnight
            t >= self.low || t <= self.high
        }
    }
}

fn parse_date_bound(bound: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(bound, DATE_BOUND_FORMAT).map_err(|_| Error::Format {
        input: bound.to_string(),
    })
}

fn parse_time_bound(bound: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(bound, TIME_BOUND_FORMAT).map_err(|_| Error::Format {
        input: bound.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> Option<NaiveDateTime> {
        Some(
            NaiveDate::from_ymd_opt(2022, 9, 20)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    fn on(y: i32, mo: u32, d: u32, h: u32) -> Option<NaiveDateTime> {
        Some(
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_value_range_inclusive_bounds() {
        assert!(in_value_range(Some(-90.0), (-90.0, 0.0)));
        assert!(in_value_range(Some(0.0), (-90.0, 0.0)));
        assert!(in_value_range(Some(-45.0), (-90.0, 0.0)));
        assert!(!in_value_range(Some(0.001), (-90.0, 0.0)));
        assert!(!in_value_range(Some(10.0), (-90.0, 0.0)));
    }

    #[test]
    fn test_value_range_absent_excluded() {
        assert!(!in_value_range(None, (f64::MIN, f64::MAX)));
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let range = DateRange::parse("2022-09-19", "2022-10-10").unwrap();
        assert!(range.contains(on(2022, 9, 19, 0)));
        assert!(range.contains(on(2022, 10, 10, 0)));
        assert!(range.contains(on(2022, 9, 25, 12)));
        assert!(!range.contains(on(2022, 9, 18, 23)));
        assert!(!range.contains(on(2022, 10, 11, 0)));
    }

    #[test]
    fn test_date_range_compares_date_portion_only() {
        // A timestamp late on the final day is still inside the range
        let range = DateRange::parse("2022-09-19", "2022-10-10").unwrap();
        assert!(range.contains(on(2022, 10, 10, 23)));
    }

    #[test]
    fn test_date_range_absent_excluded() {
        let range = DateRange::parse("2022-09-19", "2022-10-10").unwrap();
        assert!(!range.contains(None));
    }

    #[test]
    fn test_bad_bounds_are_format_errors() {
        assert!(matches!(
            DateRange::parse("19/09/2022", "2022-10-10"),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            TimeRange::parse("22:00", "25:99"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_time_range_plain() {
        let range = TimeRange::parse("09:00", "17:00").unwrap();
        assert!(range.contains(at(12, 0)));
        assert!(range.contains(at(9, 0)));
        assert!(range.contains(at(17, 0)));
        assert!(!range.contains(at(20, 0)));
        assert!(!range.contains(at(8, 59)));
    }

    #[test]
    fn test_time_range_wraps_past_midnight() {
        let range = TimeRange::parse("22:00", "02:00").unwrap();
        assert!(range.contains(at(23, 0)));
        assert!(range.contains(at(1, 0)));
        assert!(range.contains(at(22, 0)));
        assert!(range.contains(at(2, 0)));
        assert!(!range.contains(at(12, 0)));
        assert!(!range.contains(at(2, 1)));
        assert!(!range.contains(at(21, 59)));
    }

    #[test]
    fn test_time_range_absent_excluded() {
        let range = TimeRange::parse("22:00", "02:00").unwrap();
        assert!(!range.contains(None));
    }

    #[test]
    fn test_time_range_matches_rotation_oracle() {
        // Independent formulation: rotate the clock so `low` sits at 00:00;
        // membership then reduces to a plain comparison. Checked across a
        // minute grid for wrapping and non-wrapping ranges alike.
        let cases = [
            ("22:00", "02:00"),
            ("09:00", "17:00"),
            ("19:30", "00:00"),
            ("00:00", "23:59"),
            ("12:00", "12:00"),
            ("23:59", "00:01"),
        ];

        for (low, high) in cases {
            let range = TimeRange::parse(low, high).unwrap();
            let low_min = minutes_of(low);
            let high_min = minutes_of(high);
            let span = (high_min - low_min).rem_euclid(24 * 60);

            for m in (0..24 * 60).step_by(7) {
                let t = at((m / 60) as u32, (m % 60) as u32);
                let rotated = (m - low_min).rem_euclid(24 * 60);
                assert_eq!(
                    range.contains(t),
                    rotated <= span,
                    "range {low}-{high}, minute {m}"
                );
            }
        }
    }

    fn minutes_of(bound: &str) -> i32 {
        let (h, m) = bound.split_once(':').unwrap();
        h.parse::<i32>().unwrap() * 60 + m.parse::<i32>().unwrap()
    }
}
