//! Row types flowing through the reshape/clean/discretize stages.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

/// Static descriptive fields of a counted roadway segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SegmentKey {
    pub id: String,
    pub segment_id: String,
    pub roadway_name: String,
    pub from: String,
    pub to: String,
    pub direction: String,
}

/// One input row: a segment on a date with one raw cell per interval.
///
/// `volumes` is aligned with the interval labels the table was read with.
/// Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub key: SegmentKey,
    pub date: NaiveDate,
    pub volumes: Vec<Option<String>>,
}

/// Parsed input table: interval labels plus the records carrying them.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub interval_labels: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Traffic count as it moves through cleaning.
#[derive(Debug, Clone, PartialEq)]
pub enum Volume {
    Missing,
    Literal(String),
    Count(f64),
}

impl Volume {
    pub fn is_missing(&self) -> bool {
        matches!(self, Volume::Missing)
    }

    pub fn count(&self) -> Option<f64> {
        match self {
            Volume::Count(v) => Some(*v),
            _ => None,
        }
    }
}

/// Long-format row produced by the melt stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub key: SegmentKey,
    pub date: NaiveDate,
    pub interval: String,
    pub volume: Volume,
}

/// Observation with derived calendar features.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledObservation {
    pub observation: Observation,
    pub day_of_week: Weekday,
    pub hour: u8,
}

/// Ordinal traffic bucket. `Undefined` marks volumes outside every bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VolumeCategory {
    Low,
    Medium,
    High,
    Undefined,
}

impl VolumeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeCategory::Low => "Low",
            VolumeCategory::Medium => "Medium",
            VolumeCategory::High => "High",
            VolumeCategory::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for VolumeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully processed row: what the model is fitted on and evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedObservation {
    pub key: SegmentKey,
    pub date: NaiveDate,
    pub day_of_week: Weekday,
    pub hour: u8,
    pub volume: f64,
    pub category: VolumeCategory,
}
