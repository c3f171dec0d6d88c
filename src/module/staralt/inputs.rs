///! Staralt form input preparation
///!
///! Pure data shaping: merged rows become one form submission per
///! observing date. The browser side never makes decisions, so
///! everything that can go wrong with grouping or formatting is
///! testable here without a Chrome process.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::ObservingConfig;
use crate::module::ephemeris::EventRecord;
use crate::module::pipeline::ObservingRow;

/// Which event timestamp the plot dates are grouped by. Rows missing
/// the chosen timestamp are left out of the plots entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupColumn {
    #[default]
    Start,
    Mid,
    End,
}

impl GroupColumn {
    /// Parse a column name. Unknown names fall back to the start
    /// timestamp with a warning rather than failing the run.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "start" => GroupColumn::Start,
            "mid" => GroupColumn::Mid,
            "end" => GroupColumn::End,
            other => {
                tracing::warn!("Unknown group column {:?}, using start", other);
                GroupColumn::Start
            }
        }
    }

    fn timestamp(&self, event: &EventRecord) -> Option<NaiveDateTime> {
        match self {
            GroupColumn::Start => event.start,
            GroupColumn::Mid => event.mid,
            GroupColumn::End => event.end,
        }
    }
}

/// One staralt form submission: the night's date plus the coordinate
/// list for every star observable that night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotInput {
    pub date: NaiveDate,
    /// One `name ra dec` line per star, spaces in names replaced with
    /// underscores so the form parses each line as three fields.
    pub coordinates: String,
}

/// Group merged rows into per-date staralt inputs. Dates appear in
/// first-seen row order; rows without an event, without the chosen
/// timestamp, or without catalogue coordinates are skipped.
pub fn plot_inputs(rows: &[ObservingRow], group: GroupColumn) -> Vec<PlotInput> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut lines: HashMap<NaiveDate, Vec<String>> = HashMap::new();

    for row in rows {
        let Some(event) = row.event.as_ref() else {
            continue;
        };
        let Some(stamp) = group.timestamp(event) else {
            continue;
        };
        let (Some(ra), Some(dec)) = (row.target.ra, row.target.dec) else {
            tracing::debug!(
                "No catalogue coordinates for {}, left out of the plots",
                row.target.star_name
            );
            continue;
        };

        let date = stamp.date();
        if !lines.contains_key(&date) {
            order.push(date);
        }
        let name = row.target.star_name.replace(' ', "_");
        lines
            .entry(date)
            .or_default()
            .push(format!("{} {} {}", name, ra, dec));
    }

    order
        .into_iter()
        .map(|date| PlotInput {
            coordinates: lines.remove(&date).unwrap_or_default().join("\n"),
            date,
        })
        .collect()
}

/// Site coordinate string the staralt form expects:
/// longitude, latitude, elevation and UT offset separated by spaces.
pub fn observatory_string(config: &ObservingConfig) -> String {
    format!(
        "{} {} {} {}",
        config.longitude, config.latitude, config.elevation, config.ut_offset
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use chrono::NaiveDateTime;

    use crate::module::targets::TargetRecord;

    fn stamp(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn row(name: &str, ra: Option<f64>, dec: Option<f64>, start: Option<&str>) -> ObservingRow {
        let target = TargetRecord {
            star_name: name.to_string(),
            ra,
            dec,
            other_info: None,
            extra: BTreeMap::new(),
        };
        let mut row = ObservingRow::from_target(target);
        row.event = Some(EventRecord {
            star_name: name.to_string(),
            epoch: "2459843.5".to_string(),
            start: start.map(stamp),
            mid: start.map(|s| stamp(s) + chrono::Duration::hours(3)),
            end: None,
            ecliptic_period: None,
        });
        row
    }

    #[test]
    fn test_groups_rows_by_start_date() {
        let rows = vec![
            row("SW Lac", Some(328.6), Some(37.9), Some("2022-09-20 19:00:00")),
            row("RZ Cas", Some(43.7), Some(69.6), Some("2022-09-21 01:00:00")),
            row("TV Boo", Some(214.1), Some(42.5), Some("2022-09-20 22:30:00")),
        ];

        let inputs = plot_inputs(&rows, GroupColumn::Start);
        assert_eq!(inputs.len(), 2);
        assert_eq!(
            inputs[0].date,
            NaiveDate::from_ymd_opt(2022, 9, 20).unwrap()
        );
        assert_eq!(
            inputs[0].coordinates,
            "SW_Lac 328.6 37.9\nTV_Boo 214.1 42.5"
        );
        assert_eq!(
            inputs[1].date,
            NaiveDate::from_ymd_opt(2022, 9, 21).unwrap()
        );
        assert_eq!(inputs[1].coordinates, "RZ_Cas 43.7 69.6");
    }

    #[test]
    fn test_dates_keep_first_seen_order() {
        let rows = vec![
            row("B Star", Some(10.0), Some(20.0), Some("2022-09-22 19:00:00")),
            row("A Star", Some(30.0), Some(40.0), Some("2022-09-20 19:00:00")),
        ];

        let inputs = plot_inputs(&rows, GroupColumn::Start);
        let dates: Vec<_> = inputs.iter().map(|i| i.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2022, 9, 22).unwrap(),
                NaiveDate::from_ymd_opt(2022, 9, 20).unwrap(),
            ]
        );
    }

    #[test]
    fn test_grouping_by_mid_uses_mid_timestamp() {
        // Start 23:30 rolls past midnight at mid, so grouping by mid
        // lands the row on the next date.
        let rows = vec![row(
            "SW Lac",
            Some(328.6),
            Some(37.9),
            Some("2022-09-20 23:30:00"),
        )];

        let by_start = plot_inputs(&rows, GroupColumn::Start);
        let by_mid = plot_inputs(&rows, GroupColumn::Mid);
        assert_eq!(
            by_start[0].date,
            NaiveDate::from_ymd_opt(2022, 9, 20).unwrap()
        );
        assert_eq!(
            by_mid[0].date,
            NaiveDate::from_ymd_opt(2022, 9, 21).unwrap()
        );
    }

    #[test]
    fn test_rows_missing_group_timestamp_are_skipped() {
        let mut no_start = row("RZ Cas", Some(43.7), Some(69.6), None);
        no_start.event.as_mut().unwrap().mid = Some(stamp("2022-09-20 22:00:00"));

        let rows = vec![
            row("SW Lac", Some(328.6), Some(37.9), Some("2022-09-20 19:00:00")),
            no_start,
        ];

        let inputs = plot_inputs(&rows, GroupColumn::Start);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].coordinates, "SW_Lac 328.6 37.9");
    }

    #[test]
    fn test_eventless_and_coordinate_less_rows_are_skipped() {
        let target = TargetRecord {
            star_name: "TV Boo".to_string(),
            ra: Some(214.1),
            dec: Some(42.5),
            other_info: None,
            extra: BTreeMap::new(),
        };
        let rows = vec![
            ObservingRow::from_target(target),
            row("No Dec", Some(10.0), None, Some("2022-09-20 19:00:00")),
            row("SW Lac", Some(328.6), Some(37.9), Some("2022-09-20 19:00:00")),
        ];

        let inputs = plot_inputs(&rows, GroupColumn::Start);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].coordinates, "SW_Lac 328.6 37.9");
    }

    #[test]
    fn test_group_column_from_name() {
        assert_eq!(GroupColumn::from_name("start"), GroupColumn::Start);
        assert_eq!(GroupColumn::from_name("Mid"), GroupColumn::Mid);
        assert_eq!(GroupColumn::from_name("END"), GroupColumn::End);
        assert_eq!(GroupColumn::from_name("bogus"), GroupColumn::Start);
    }

    #[test]
    fn test_observatory_string_field_order() {
        let config: ObservingConfig = toml::from_str(
            r#"
            api_key = "k"
            latitude = 51.5
            longitude = -0.1
            elevation = 35.0
            ut_offset = 1
            "#,
        )
        .unwrap();

        assert_eq!(observatory_string(&config), "-0.1 51.5 35 1");
    }
}
