///! Stage exports
///!
///! Every pipeline operation can serialize its resulting snapshot. The
///! CSV column set is fixed per stage so downstream tooling can rely on
///! it: the catalogue stage dumps the full target table (typed columns
///! first, passthrough columns in sorted order), the merged stage writes
///! the documented observing columns.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::dates;
use crate::error::{Error, Result};
use crate::module::pipeline::{PipelineStage, Snapshot};
use crate::module::twilight::TwilightCategory;

/// Write a snapshot as CSV, choosing the column set by stage.
pub fn write_stage_csv(snapshot: &Snapshot, path: &Path) -> Result<()> {
    write_csv_inner(snapshot, path).map_err(|source| Error::Export {
        path: path.display().to_string(),
        source,
    })
}

/// Dump a snapshot's rows as pretty-printed JSON, structure untouched.
pub fn write_rows_json(snapshot: &Snapshot, path: &Path) -> Result<()> {
    write_json_inner(snapshot, path).map_err(|source| Error::Export {
        path: path.display().to_string(),
        source,
    })
}

fn write_csv_inner(snapshot: &Snapshot, path: &Path) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    match snapshot.stage() {
        PipelineStage::Empty | PipelineStage::TargetsFetched => {
            write_target_rows(&mut writer, snapshot)?
        }
        PipelineStage::EventsScraped => write_merged_rows(&mut writer, snapshot)?,
    }

    writer.flush()?;
    Ok(())
}

fn write_json_inner(snapshot: &Snapshot, path: &Path) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    let body = serde_json::to_string_pretty(snapshot.rows())?;
    std::fs::write(path, body)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_target_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    snapshot: &Snapshot,
) -> anyhow::Result<()> {
    // Union of passthrough columns across all rows, in sorted order
    let mut extra_keys = BTreeSet::new();
    for row in snapshot.rows() {
        extra_keys.extend(row.target.extra.keys().cloned());
    }

    let mut header = vec![
        "star_name".to_string(),
        "ra".to_string(),
        "dec".to_string(),
        "other_info".to_string(),
    ];
    header.extend(extra_keys.iter().cloned());
    writer.write_record(&header)?;

    for row in snapshot.rows() {
        let target = &row.target;
        let mut record = vec![
            target.star_name.clone(),
            fmt_opt_f64(target.ra),
            fmt_opt_f64(target.dec),
            target.other_info.clone().unwrap_or_default(),
        ];
        for key in &extra_keys {
            record.push(target.extra.get(key).map(fmt_value).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    Ok(())
}

fn write_merged_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    snapshot: &Snapshot,
) -> anyhow::Result<()> {
    let mut header = vec![
        "star_name".to_string(),
        "ra".to_string(),
        "dec".to_string(),
        "epoch".to_string(),
        "start".to_string(),
        "mid".to_string(),
        "end".to_string(),
        "ecliptic_period".to_string(),
    ];
    for category in TwilightCategory::ALL {
        let (start, end) = category.column_names();
        header.push(start);
        header.push(end);
    }
    writer.write_record(&header)?;

    for row in snapshot.rows() {
        let target = &row.target;
        let mut record = vec![
            target.star_name.clone(),
            fmt_opt_f64(target.ra),
            fmt_opt_f64(target.dec),
        ];

        match &row.event {
            Some(event) => {
                record.push(event.epoch.clone());
                record.push(fmt_opt_timestamp(event.start));
                record.push(fmt_opt_timestamp(event.mid));
                record.push(fmt_opt_timestamp(event.end));
                record.push(fmt_opt_f64(event.ecliptic_period));
            }
            None => record.extend(std::iter::repeat_n(String::new(), 5)),
        }

        for category in TwilightCategory::ALL {
            match row.twilight_for(category) {
                Some(window) => {
                    record.push(fmt_opt_timestamp(window.start));
                    record.push(fmt_opt_timestamp(window.end));
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }

        writer.write_record(&record)?;
    }
    Ok(())
}

fn fmt_opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_opt_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|t| dates::format_timestamp(&t))
        .unwrap_or_default()
}

fn fmt_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
