//! CSV reader for the wide traffic-count table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use tracing::{debug, info};

use crate::config::KEY_COLUMNS;
use crate::error::PipelineError;
use crate::pipeline::types::{RawRecord, RawTable, SegmentKey};

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Opens `path` and reads it with [`parse_table`].
#[tracing::instrument(skip(interval_labels))]
pub fn load_table(path: &str, interval_labels: &[String], segment_id: &str) -> Result<RawTable> {
    let file = File::open(path).with_context(|| format!("failed to open input table {path}"))?;
    parse_table(file, interval_labels, segment_id)
}

/// Parses a traffic-count CSV, keeping only rows of `segment_id`.
///
/// Every key column and every interval label must be present in the header;
/// other columns are ignored. Dates are month/day/year and are only parsed for
/// rows of the requested segment.
///
/// # Errors
///
/// Returns [`PipelineError::MissingColumn`] or [`PipelineError::InvalidDate`]
/// (wrapped in `anyhow`) for schema problems, and CSV errors as-is.
pub fn parse_table<R: Read>(
    reader: R,
    interval_labels: &[String],
    segment_id: &str,
) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let key_idx = KEY_COLUMNS
        .iter()
        .map(|name| column_index(&headers, name))
        .collect::<Result<Vec<_>, _>>()?;
    let interval_idx = interval_labels
        .iter()
        .map(|name| column_index(&headers, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut segments = HashSet::new();
    let mut records = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |i: usize| record.get(key_idx[i]).unwrap_or_default().trim();

        let segment = field(1);
        segments.insert(segment.to_string());
        if !segment_matches(segment, segment_id) {
            continue;
        }

        let date_text = field(6);
        let date = parse_date(date_text).ok_or_else(|| PipelineError::InvalidDate {
            value: date_text.to_string(),
            row: row + 1,
        })?;

        let volumes = interval_idx
            .iter()
            .map(|&i| {
                let cell = record.get(i).unwrap_or_default().trim();
                (!cell.is_empty()).then(|| cell.to_string())
            })
            .collect();

        records.push(RawRecord {
            key: SegmentKey {
                id: field(0).to_string(),
                segment_id: segment.to_string(),
                roadway_name: field(2).to_string(),
                from: field(3).to_string(),
                to: field(4).to_string(),
                direction: field(5).to_string(),
            },
            date,
            volumes,
        });
    }

    debug!(distinct_segments = segments.len(), "Segments present in input");
    info!(segment_id, records = records.len(), "Loaded segment records");

    Ok(RawTable {
        interval_labels: interval_labels.to_vec(),
        records,
    })
}

/// Segment identifiers compare as numbers when both sides parse, so `36705`,
/// `36705.0` and `036705` name the same segment.
fn segment_matches(cell: &str, target: &str) -> bool {
    match (cell.parse::<f64>(), target.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => cell == target.trim(),
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, PipelineError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
}

/// Parses `month/day/year`, tolerating a trailing time component.
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok().or_else(|| {
        let day_part = text.split_whitespace().next()?;
        NaiveDate::parse_from_str(day_part, DATE_FORMAT).ok()
    })
}
