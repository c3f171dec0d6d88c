///! Data model for scraped ephemeris events.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dates;

/// One predicted event (eclipse, maximum, ...) for a star. A star with
/// several upcoming events yields several records sharing its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Joining key back to the catalogue target
    pub star_name: String,
    /// Epoch column exactly as printed on the page (an HJD label)
    pub epoch: String,
    pub start: Option<NaiveDateTime>,
    pub mid: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// Event length in hours, end minus start. Filled in once after the
    /// UT offset has been applied.
    pub ecliptic_period: Option<f64>,
}

impl EventRecord {
    /// Shift every timestamp column by the configured UT offset.
    pub fn apply_offset(&mut self, hours: i64) {
        self.start = dates::offset_hours(self.start, hours);
        self.mid = dates::offset_hours(self.mid, hours);
        self.end = dates::offset_hours(self.end, hours);
    }

    /// Derive the event duration from the (already offset) start and end.
    pub fn derive_duration(&mut self) {
        self.ecliptic_period = match (self.start, self.end) {
            (Some(start), Some(end)) => {
                Some((end - start).num_seconds() as f64 / 3600.0)
            }
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn record() -> EventRecord {
        EventRecord {
            star_name: "SW Lac".to_string(),
            epoch: "2459845.12345".to_string(),
            start: Some(dt(2022, 9, 20, 19, 0)),
            mid: Some(dt(2022, 9, 20, 22, 0)),
            end: Some(dt(2022, 9, 21, 1, 0)),
            ecliptic_period: None,
        }
    }

    #[test]
    fn test_duration_is_end_minus_start_in_hours() {
        let mut r = record();
        r.derive_duration();
        assert_eq!(r.ecliptic_period, Some(6.0));
    }

    #[test]
    fn test_duration_absent_without_both_bounds() {
        let mut r = record();
        r.end = None;
        r.derive_duration();
        assert_eq!(r.ecliptic_period, None);
    }

    #[test]
    fn test_offset_shifts_all_timestamp_columns() {
        let mut r = record();
        r.apply_offset(10);
        assert_eq!(r.start, Some(dt(2022, 9, 21, 5, 0)));
        assert_eq!(r.mid, Some(dt(2022, 9, 21, 8, 0)));
        assert_eq!(r.end, Some(dt(2022, 9, 21, 11, 0)));

        // The offset moves both bounds, so the duration is unchanged
        r.derive_duration();
        assert_eq!(r.ecliptic_period, Some(6.0));
    }
}
