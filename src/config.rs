//! Embedded pipeline constants and the run configuration built from them.

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::pipeline::split::DateRange;

/// Default input file name of the NYC "Traffic Volume Counts" export.
pub const DEFAULT_INPUT: &str = "Traffic_Volume_Counts_20241012.csv";

/// Segment the model is fitted for.
pub const DEFAULT_SEGMENT_ID: &str = "36705";

/// BDeu equivalent sample size used when fitting the network.
pub const DEFAULT_EQUIVALENT_SAMPLE_SIZE: f64 = 10.0;

/// Identifier columns every input table must carry.
pub const KEY_COLUMNS: [&str; 7] = [
    "ID",
    "SegmentID",
    "Roadway Name",
    "From",
    "To",
    "Direction",
    "Date",
];

/// The 24 hourly interval columns, in day order.
pub const INTERVAL_LABELS: [&str; 24] = [
    "00:00-01:00",
    "01:00-02:00",
    "02:00-03:00",
    "03:00-04:00",
    "04:00-05:00",
    "05:00-06:00",
    "06:00-07:00",
    "07:00-08:00",
    "08:00-09:00",
    "09:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "12:00-13:00",
    "13:00-14:00",
    "14:00-15:00",
    "15:00-16:00",
    "16:00-17:00",
    "17:00-18:00",
    "18:00-19:00",
    "19:00-20:00",
    "20:00-21:00",
    "21:00-22:00",
    "22:00-23:00",
    "23:00-00:00",
];

/// Everything a single run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub segment_id: String,
    pub training: DateRange,
    pub evaluation: DateRange,
    pub interval_labels: Vec<String>,
    pub equivalent_sample_size: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segment_id: DEFAULT_SEGMENT_ID.to_string(),
            training: DateRange::new(ymd(2012, 1, 1), ymd(2017, 1, 1)),
            evaluation: DateRange::new(ymd(2017, 1, 1), ymd(2019, 1, 1)),
            interval_labels: INTERVAL_LABELS.iter().map(|l| l.to_string()).collect(),
            equivalent_sample_size: DEFAULT_EQUIVALENT_SAMPLE_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Checks the invariants a run relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::OverlappingRanges`] if a date could land in
    /// both partitions.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.training.overlaps(&self.evaluation) {
            return Err(PipelineError::OverlappingRanges {
                training: self.training.to_string(),
                evaluation: self.evaluation.to_string(),
            });
        }
        Ok(())
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("embedded date constant is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interval_labels.len(), 24);
        assert_eq!(config.segment_id, "36705");
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let mut config = PipelineConfig::default();
        config.evaluation = DateRange::new(ymd(2016, 6, 1), ymd(2019, 1, 1));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, PipelineError::OverlappingRanges { .. }));
    }
}
