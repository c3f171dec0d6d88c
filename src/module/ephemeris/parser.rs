///! Ephemeris table reshaper
///!
///! The VSX ephemeris page renders one flat stream of `<td>` cells: page
///! chrome, a header row, an empty spacer cell, then data rows. The
///! functions here recover a rectangular table from that stream and turn
///! it into typed [`EventRecord`]s.

use regex::Regex;
use tracing::warn;

use super::types::EventRecord;
use crate::dates;
use crate::error::{Error, Result};

const EPHEMERIS_URL_PATTERN: &str =
    r"https://www\.aavso\.org/vsx/index\.php\?view=detail\.ephemeris[^\s|\]]*";

/// Page-chrome cells before the table content.
const LEADING_CELLS: usize = 3;
/// Footer cells after the table content.
const TRAILING_CELLS: usize = 2;

/// Pull the ephemeris-page URL out of a target's free-text notes.
///
/// Notes occasionally carry more than one copy of the link; the first is
/// taken and the duplicates are reported as a warning, not an error.
pub fn extract_ephemeris_url(notes: &str) -> Option<String> {
    let re = Regex::new(EPHEMERIS_URL_PATTERN).ok()?;
    let mut matches = re.find_iter(notes);
    let first = matches.next()?;

    if matches.next().is_some() {
        warn!("Multiple ephemeris URLs in one notes field, taking the first");
    }

    Some(first.as_str().to_string())
}

/// Reshape the flat cell stream of one star's ephemeris page into event
/// records.
///
/// The header row width is inferred from the position of the first empty
/// cell; empty cells elsewhere are row separators and are dropped. Header
/// names are case-folded and a synthetic star-name column is prepended.
/// Timestamp columns are normalized; the epoch column is kept verbatim.
pub fn reshape_event_cells(star_name: &str, cells: &[String]) -> Result<Vec<EventRecord>> {
    if cells.len() < LEADING_CELLS + TRAILING_CELLS {
        return Err(Error::scrape_shape(
            star_name,
            format!("page too short ({} cells)", cells.len()),
        ));
    }
    let table = &cells[LEADING_CELLS..cells.len() - TRAILING_CELLS];

    let row_length = table
        .iter()
        .position(|cell| cell.is_empty())
        .ok_or_else(|| Error::scrape_shape(star_name, "no header separator cell"))?;
    if row_length == 0 {
        return Err(Error::scrape_shape(star_name, "empty header row"));
    }

    let values: Vec<&str> = table
        .iter()
        .filter(|cell| !cell.is_empty())
        .map(String::as_str)
        .collect();

    let headers: Vec<String> = values[..row_length]
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    let data = &values[row_length..];

    if data.len() % row_length != 0 {
        return Err(Error::scrape_shape(
            star_name,
            format!(
                "ragged table: {} data cells at row width {}",
                data.len(),
                row_length
            ),
        ));
    }

    let epoch_col = column(&headers, "epoch", star_name)?;
    let start_col = column(&headers, "start", star_name)?;
    let mid_col = column(&headers, "mid", star_name)?;
    let end_col = column(&headers, "end", star_name)?;

    let mut records = Vec::with_capacity(data.len() / row_length);
    for row in data.chunks(row_length) {
        records.push(EventRecord {
            star_name: star_name.to_string(),
            epoch: row[epoch_col].to_string(),
            start: Some(dates::normalize(row[start_col])?),
            mid: Some(dates::normalize(row[mid_col])?),
            end: Some(dates::normalize(row[end_col])?),
            ecliptic_period: None,
        });
    }

    Ok(records)
}

fn column(headers: &[String], name: &str, star_name: &str) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        Error::scrape_shape(
            star_name,
            format!("missing {name:?} column, headers are {headers:?}"),
        )
    })
}
