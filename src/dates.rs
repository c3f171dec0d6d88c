///! Heterogeneous date normalization
///!
///! The scraped ephemeris tables and the catalogue mix several textual
///! date/time representations. Everything funnels through [`normalize`]
///! into a single `NaiveDateTime` so later stages never see raw strings.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Render format for canonical timestamps in exports and logs.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The recognized input formats, tried in priority order. The first full
/// match wins; chrono's strict parsing rejects trailing input, so the
/// formats cannot collide.
const FORMATS: [(&str, bool); 6] = [
    ("%d %b %Y %H:%M", true),
    ("%d %b %Y %H:%M:%S", true),
    ("%d %b %Y", false),
    ("%Y-%m-%d %H:%M", true),
    ("%Y-%m-%d", false),
    ("%Y-%m-%d %H:%M:%S", true),
];

/// Parse a textual timestamp into the canonical representation.
///
/// Date-only formats yield midnight. Anything outside the six recognized
/// formats is an [`Error::Format`]; no coercion is attempted.
pub fn normalize(input: &str) -> Result<NaiveDateTime> {
    for (format, has_time) in FORMATS {
        if has_time {
            if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(dt);
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(Error::Format {
        input: input.to_string(),
    })
}

/// [`normalize`] lifted over missing cells: an absent input stays absent
/// instead of becoming an error.
pub fn normalize_opt(input: Option<&str>) -> Result<Option<NaiveDateTime>> {
    match input {
        Some(s) => normalize(s).map(Some),
        None => Ok(None),
    }
}

/// Shift a timestamp by a whole number of hours (the configured UT
/// offset). Absent values pass through; offsets are additive and an
/// offset of zero is the identity.
pub fn offset_hours(t: Option<NaiveDateTime>, hours: i64) -> Option<NaiveDateTime> {
    t.map(|dt| dt + Duration::hours(hours))
}

/// Render a canonical timestamp for export.
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_normalize_all_six_formats() {
        assert_eq!(normalize("20 Sep 2022 19:00").unwrap(), dt(2022, 9, 20, 19, 0, 0));
        assert_eq!(
            normalize("20 Sep 2022 19:00:30").unwrap(),
            dt(2022, 9, 20, 19, 0, 30)
        );
        assert_eq!(normalize("20 Sep 2022").unwrap(), dt(2022, 9, 20, 0, 0, 0));
        assert_eq!(normalize("2022-09-20 19:00").unwrap(), dt(2022, 9, 20, 19, 0, 0));
        assert_eq!(normalize("2022-09-20").unwrap(), dt(2022, 9, 20, 0, 0, 0));
        assert_eq!(
            normalize("2022-09-20 19:00:30").unwrap(),
            dt(2022, 9, 20, 19, 0, 30)
        );
    }

    #[test]
    fn test_normalize_round_trip() {
        // normalize(format(t)) == t, mod the precision each format keeps
        let t = dt(2022, 9, 21, 1, 30, 45);
        for (format, has_time) in FORMATS {
            let rendered = t.format(format).to_string();
            let parsed = normalize(&rendered).unwrap();
            if has_time {
                let expected = if format.ends_with("%H:%M") {
                    dt(2022, 9, 21, 1, 30, 0)
                } else {
                    t
                };
                assert_eq!(parsed, expected, "format {format}");
            } else {
                assert_eq!(parsed, dt(2022, 9, 21, 0, 0, 0), "format {format}");
            }
        }
    }

    #[test]
    fn test_normalize_rejects_unknown_formats() {
        for bad in ["2022/09/20", "Sep 20 2022", "20-09-2022", "19:00", "garbage", ""] {
            assert!(matches!(normalize(bad), Err(Error::Format { .. })), "input {bad:?}");
        }
    }

    #[test]
    fn test_normalize_rejects_trailing_input() {
        assert!(normalize("2022-09-20 19:00 extra").is_err());
        assert!(normalize("20 Sep 2022 19:00:30:99").is_err());
    }

    #[test]
    fn test_normalize_opt_absent_passes_through() {
        assert_eq!(normalize_opt(None).unwrap(), None);
        assert_eq!(
            normalize_opt(Some("2022-09-20")).unwrap(),
            Some(dt(2022, 9, 20, 0, 0, 0))
        );
        assert!(normalize_opt(Some("nonsense")).is_err());
    }

    #[test]
    fn test_offset_is_additive() {
        let t = Some(dt(2022, 9, 20, 22, 0, 0));
        assert_eq!(offset_hours(offset_hours(t, 3), 7), offset_hours(t, 10));
        assert_eq!(offset_hours(t, 0), t);
        // Crossing midnight rolls the date
        assert_eq!(offset_hours(t, 10), Some(dt(2022, 9, 21, 8, 0, 0)));
        // Negative offsets are legal
        assert_eq!(offset_hours(t, -23), Some(dt(2022, 9, 19, 23, 0, 0)));
    }

    #[test]
    fn test_offset_absent_passes_through() {
        assert_eq!(offset_hours(None, 10), None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&dt(2022, 9, 20, 19, 5, 0)), "2022-09-20 19:05:00");
    }
}
