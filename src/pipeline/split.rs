//! Date-range partitioning of raw records into training and evaluation sets.

use chrono::NaiveDate;
use std::fmt;

use crate::error::PipelineError;
use crate::pipeline::types::RawTable;

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if some date falls in both ranges.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Raw records split by date. Records outside both ranges are dropped.
#[derive(Debug, Clone, Default)]
pub struct RawPartition {
    pub training: RawTable,
    pub evaluation: RawTable,
}

/// Splits a raw table into the training and evaluation ranges.
///
/// # Errors
///
/// Returns [`PipelineError::OverlappingRanges`] if the two ranges share a date.
pub fn split_by_date(
    table: RawTable,
    training: DateRange,
    evaluation: DateRange,
) -> Result<RawPartition, PipelineError> {
    if training.overlaps(&evaluation) {
        return Err(PipelineError::OverlappingRanges {
            training: training.to_string(),
            evaluation: evaluation.to_string(),
        });
    }

    let mut partition = RawPartition {
        training: RawTable {
            interval_labels: table.interval_labels.clone(),
            records: Vec::new(),
        },
        evaluation: RawTable {
            interval_labels: table.interval_labels,
            records: Vec::new(),
        },
    };

    for record in table.records {
        if training.contains(record.date) {
            partition.training.records.push(record);
        } else if evaluation.contains(record.date) {
            partition.evaluation.records.push(record);
        }
    }

    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{RawRecord, SegmentKey};
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate) -> RawRecord {
        RawRecord {
            key: SegmentKey {
                id: date.to_string(),
                segment_id: "36705".into(),
                roadway_name: "BROADWAY".into(),
                from: "A".into(),
                to: "B".into(),
                direction: "NB".into(),
            },
            date,
            volumes: vec![],
        }
    }

    fn ranges() -> (DateRange, DateRange) {
        (
            DateRange::new(date(2012, 1, 1), date(2017, 1, 1)),
            DateRange::new(date(2017, 1, 1), date(2019, 1, 1)),
        )
    }

    #[test]
    fn test_range_is_half_open() {
        let (training, _) = ranges();
        assert!(training.contains(date(2012, 1, 1)));
        assert!(training.contains(date(2016, 12, 31)));
        assert!(!training.contains(date(2017, 1, 1)));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let (training, evaluation) = ranges();
        assert!(!training.overlaps(&evaluation));
        assert!(training.overlaps(&DateRange::new(date(2016, 1, 1), date(2018, 1, 1))));
    }

    #[test]
    fn test_split_is_disjoint_and_drops_outsiders() {
        let (training, evaluation) = ranges();
        let table = RawTable {
            interval_labels: vec![],
            records: vec![
                record(date(2011, 12, 31)),
                record(date(2012, 1, 1)),
                record(date(2016, 12, 31)),
                record(date(2017, 1, 1)),
                record(date(2018, 6, 1)),
                record(date(2019, 1, 1)),
            ],
        };

        let partition = split_by_date(table, training, evaluation).unwrap();
        assert_eq!(partition.training.records.len(), 2);
        assert_eq!(partition.evaluation.records.len(), 2);

        let train_keys: HashSet<_> = partition
            .training
            .records
            .iter()
            .map(|r| (r.key.segment_id.clone(), r.date))
            .collect();
        assert!(
            partition
                .evaluation
                .records
                .iter()
                .all(|r| !train_keys.contains(&(r.key.segment_id.clone(), r.date)))
        );
    }

    #[test]
    fn test_split_rejects_overlap() {
        let (training, _) = ranges();
        let evaluation = DateRange::new(date(2016, 6, 1), date(2018, 1, 1));
        let result = split_by_date(RawTable::default(), training, evaluation);
        assert!(matches!(result, Err(PipelineError::OverlappingRanges { .. })));
    }
}
