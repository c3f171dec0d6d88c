///! Solar rise/set solver
///!
///! NOAA sunrise equation generalized to an arbitrary horizon depression.
///! Accurate to a few minutes, which is ample for planning around
///! twilight; refraction is not modelled.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::config::GeoPosition;

const J2000: f64 = 2451545.0;
const OBLIQUITY_DEG: f64 = 23.4397;

/// Sun crossings of a depressed horizon, in UT. The trait seam lets
/// calculator tests substitute a fixed ephemeris.
pub trait SolarEphemeris: Send + Sync {
    /// Most recent rise above the depressed horizon at or before
    /// `reference`. Absent when the sun never crosses it (polar day or
    /// night at that depression).
    fn previous_rising(
        &self,
        position: GeoPosition,
        depression_deg: f64,
        reference: NaiveDateTime,
    ) -> Option<NaiveDateTime>;

    /// Next set below the depressed horizon at or after `reference`.
    fn next_setting(
        &self,
        position: GeoPosition,
        depression_deg: f64,
        reference: NaiveDateTime,
    ) -> Option<NaiveDateTime>;
}

pub struct NoaaSolar;

impl NoaaSolar {
    /// Rise and set Julian dates for solar day `n` (days since J2000 at
    /// the site), or `None` when the sun stays on one side of the
    /// depressed horizon all day.
    fn crossings(position: GeoPosition, depression_deg: f64, n: f64) -> Option<(f64, f64)> {
        let j_star = n - position.longitude / 360.0;

        let mean_anomaly = (357.5291 + 0.985_600_28 * j_star).rem_euclid(360.0);
        let center = 1.9148 * sin_deg(mean_anomaly)
            + 0.0200 * sin_deg(2.0 * mean_anomaly)
            + 0.0003 * sin_deg(3.0 * mean_anomaly);
        let ecliptic_longitude = (mean_anomaly + center + 180.0 + 102.9372).rem_euclid(360.0);

        let transit = J2000
            + j_star
            + 0.0053 * sin_deg(mean_anomaly)
            - 0.0069 * sin_deg(2.0 * ecliptic_longitude);

        let sin_decl = sin_deg(ecliptic_longitude) * sin_deg(OBLIQUITY_DEG);
        let cos_decl = (1.0 - sin_decl * sin_decl).sqrt();

        let cos_hour_angle = (sin_deg(-depression_deg)
            - sin_deg(position.latitude) * sin_decl)
            / (cos_deg(position.latitude) * cos_decl);

        if !(-1.0..=1.0).contains(&cos_hour_angle) {
            return None;
        }

        let hour_angle = cos_hour_angle.acos().to_degrees();
        Some((transit - hour_angle / 360.0, transit + hour_angle / 360.0))
    }

    fn day_number(reference: NaiveDateTime) -> f64 {
        (julian_day(reference) - J2000 + 0.0008).ceil()
    }
}

impl SolarEphemeris for NoaaSolar {
    fn previous_rising(
        &self,
        position: GeoPosition,
        depression_deg: f64,
        reference: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let jd_ref = julian_day(reference);
        let n0 = Self::day_number(reference);

        // Scan neighbouring solar days and keep the latest rise that is
        // not after the reference.
        let mut best: Option<f64> = None;
        for offset in -2i32..=1 {
            if let Some((rise, _)) = Self::crossings(position, depression_deg, n0 + offset as f64) {
                if rise <= jd_ref && best.is_none_or(|b| rise > b) {
                    best = Some(rise);
                }
            }
        }
        best.and_then(from_julian_day)
    }

    fn next_setting(
        &self,
        position: GeoPosition,
        depression_deg: f64,
        reference: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let jd_ref = julian_day(reference);
        let n0 = Self::day_number(reference);

        let mut best: Option<f64> = None;
        for offset in -1i32..=2 {
            if let Some((_, set)) = Self::crossings(position, depression_deg, n0 + offset as f64) {
                if set >= jd_ref && best.is_none_or(|b| set < b) {
                    best = Some(set);
                }
            }
        }
        best.and_then(from_julian_day)
    }
}

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Julian date of a UT timestamp.
pub fn julian_day(t: NaiveDateTime) -> f64 {
    let days = t.date().num_days_from_ce() as f64;
    let frac = t.num_seconds_from_midnight() as f64 / 86400.0;
    days + 1_721_424.5 + frac
}

/// Inverse of [`julian_day`], rounded to the nearest second.
pub fn from_julian_day(jd: f64) -> Option<NaiveDateTime> {
    let offset = jd - 1_721_424.5;
    let mut days = offset.floor() as i64;
    let mut secs = ((offset - offset.floor()) * 86400.0).round() as i64;
    if secs >= 86400 {
        days += 1;
        secs -= 86400;
    }

    let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, 0)?;
    Some(date.and_time(time))
}
