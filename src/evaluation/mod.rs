//! Predicted-vs-actual comparison on the evaluation set.
//!
//! For each day the modal actual category per hour is compared with the
//! model's prediction for that hour. The headline accuracy pairs the two
//! sequences by position, truncating to the shorter one; an hour-keyed
//! accuracy is reported next to it so misaligned days are visible.

pub mod accuracy;
pub mod query;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::evaluation::accuracy::{actual_modes, hour_accuracy, index_accuracy, mean};
use crate::evaluation::query::{DayPrediction, predict_week};
use crate::model::CategoryPredictor;
use crate::pipeline::features::day_name;
use crate::pipeline::types::{CategorizedObservation, VolumeCategory};

/// Comparison data for a day that could be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEvaluation {
    pub day: String,
    /// Chart positions, `0..actual.len()`.
    pub hours: Vec<u8>,
    /// Hours that actually had evaluation rows.
    pub actual_hours: Vec<u8>,
    pub actual: Vec<VolumeCategory>,
    /// Predictions truncated to the compared length.
    pub predicted: Vec<Option<VolumeCategory>>,
    pub accuracy: f64,
    pub hour_aligned_accuracy: Option<f64>,
}

impl DayEvaluation {
    /// True if index alignment compared different hours.
    pub fn is_misaligned(&self) -> bool {
        self.actual_hours != self.hours
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoActualRows,
    NoOverlap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayOutcome {
    Scored(DayEvaluation),
    Skipped { day: String, reason: SkipReason },
}

impl DayOutcome {
    pub fn scored(&self) -> Option<&DayEvaluation> {
        match self {
            DayOutcome::Scored(eval) => Some(eval),
            DayOutcome::Skipped { .. } => None,
        }
    }
}

/// Outcome of every day plus the mean over scored days.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub days: Vec<DayOutcome>,
    pub mean_accuracy: Option<f64>,
}

/// Scores one day of the evaluation set against its hourly predictions.
///
/// A day with no evaluation rows is skipped, not an error.
pub fn evaluate_day(prediction: &DayPrediction, rows: &[CategorizedObservation]) -> DayOutcome {
    let name = day_name(prediction.day).to_string();

    let modes = actual_modes(rows, prediction.day);
    if modes.is_empty() {
        info!(day = %name, "No actual traffic data for day in evaluation set, skipping");
        return DayOutcome::Skipped {
            day: name,
            reason: SkipReason::NoActualRows,
        };
    }

    let actual: Vec<VolumeCategory> = modes.iter().map(|(_, c)| *c).collect();
    let Some(accuracy) = index_accuracy(&actual, &prediction.predicted) else {
        info!(day = %name, "Nothing to compare for day, skipping");
        return DayOutcome::Skipped {
            day: name,
            reason: SkipReason::NoOverlap,
        };
    };

    let overlap = actual.len().min(prediction.predicted.len());
    let evaluation = DayEvaluation {
        hours: (0..overlap as u8).collect(),
        actual_hours: modes.iter().map(|(h, _)| *h).collect(),
        hour_aligned_accuracy: hour_accuracy(&modes, &prediction.hours, &prediction.predicted),
        predicted: prediction.predicted[..overlap].to_vec(),
        actual,
        accuracy,
        day: name,
    };

    if evaluation.is_misaligned() {
        warn!(
            day = %evaluation.day,
            actual_hours = ?evaluation.actual_hours,
            "Actual hours are not contiguous from 0; index-aligned accuracy compares different hours"
        );
    }
    info!(
        day = %evaluation.day,
        accuracy_pct = %format!("{:.2}", evaluation.accuracy * 100.0),
        "Model accuracy for day"
    );

    DayOutcome::Scored(evaluation)
}

/// Queries every day and hour, then scores Monday through Sunday.
///
/// All 168 queries run even for days the evaluation set does not cover.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn evaluate<P: CategoryPredictor + ?Sized>(
    predictor: &P,
    rows: &[CategorizedObservation],
) -> EvaluationReport {
    let predictions = predict_week(predictor);
    let missing: usize = predictions.iter().map(DayPrediction::missing).sum();
    if missing > 0 {
        warn!(missing, "Some day/hour queries produced no prediction");
    }

    let days: Vec<DayOutcome> = predictions
        .iter()
        .map(|prediction| evaluate_day(prediction, rows))
        .collect();

    let scores: Vec<f64> = days
        .iter()
        .filter_map(DayOutcome::scored)
        .map(|d| d.accuracy)
        .collect();

    EvaluationReport {
        generated_at: Utc::now(),
        mean_accuracy: mean(&scores),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::evaluation::query::predict_day;
    use crate::pipeline::types::SegmentKey;
    use crate::pipeline::types::VolumeCategory::*;
    use chrono::{NaiveDate, Weekday};
    use std::cell::Cell;

    struct Constant(VolumeCategory);

    /// Counts queries; fails for every weekend day.
    struct Counting {
        calls: Cell<usize>,
    }

    impl CategoryPredictor for Counting {
        fn predict_most_likely(&self, day: Weekday, _: u8) -> Result<VolumeCategory, QueryError> {
            self.calls.set(self.calls.get() + 1);
            match day {
                Weekday::Sat | Weekday::Sun => Err(QueryError::UnknownEvidence {
                    variable: "DayOfWeek",
                    value: day_name(day).into(),
                }),
                _ => Ok(Low),
            }
        }
    }

    impl CategoryPredictor for Constant {
        fn predict_most_likely(&self, _: Weekday, _: u8) -> Result<VolumeCategory, QueryError> {
            Ok(self.0)
        }
    }

    fn row(day: Weekday, hour: u8, category: VolumeCategory) -> CategorizedObservation {
        CategorizedObservation {
            key: SegmentKey {
                id: "1".into(),
                segment_id: "36705".into(),
                roadway_name: "BROADWAY".into(),
                from: "A".into(),
                to: "B".into(),
                direction: "NB".into(),
            },
            date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            day_of_week: day,
            hour,
            volume: 1.0,
            category,
        }
    }

    #[test]
    fn test_empty_day_is_skipped() {
        let outcome = evaluate_day(&predict_day(&Constant(Low), Weekday::Mon), &[]);
        assert_eq!(
            outcome,
            DayOutcome::Skipped {
                day: "Monday".into(),
                reason: SkipReason::NoActualRows
            }
        );
    }

    #[test]
    fn test_day_uses_modal_category() {
        let rows = vec![
            row(Weekday::Mon, 0, Low),
            row(Weekday::Mon, 0, Medium),
            row(Weekday::Mon, 0, Medium),
            row(Weekday::Mon, 1, Low),
        ];
        let outcome = evaluate_day(&predict_day(&Constant(Medium), Weekday::Mon), &rows);
        let eval = outcome.scored().unwrap();

        assert_eq!(eval.actual, vec![Medium, Low]);
        assert_eq!(eval.predicted, vec![Some(Medium), Some(Medium)]);
        assert_eq!(eval.hours, vec![0, 1]);
        assert_eq!(eval.accuracy, 0.5);
        assert!(!eval.is_misaligned());
    }

    #[test]
    fn test_gap_in_hours_is_flagged() {
        let rows = vec![row(Weekday::Wed, 5, High), row(Weekday::Wed, 9, High)];
        let eval = evaluate_day(&predict_day(&Constant(High), Weekday::Wed), &rows);
        let eval = eval.scored().unwrap();

        assert!(eval.is_misaligned());
        assert_eq!(eval.actual_hours, vec![5, 9]);
        assert_eq!(eval.hour_aligned_accuracy, Some(1.0));
    }

    #[test]
    fn test_skipped_days_do_not_count_toward_mean() {
        let rows = vec![row(Weekday::Mon, 0, Low), row(Weekday::Tue, 0, High)];
        let report = evaluate(&Constant(Low), &rows);

        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days.iter().filter(|d| d.scored().is_some()).count(), 2);
        assert_eq!(report.mean_accuracy, Some(0.5));
    }

    #[test]
    fn test_no_rows_at_all() {
        let report = evaluate(&Constant(Low), &[]);
        assert!(report.days.iter().all(|d| d.scored().is_none()));
        assert_eq!(report.mean_accuracy, None);
    }

    #[test]
    fn test_every_day_and_hour_is_queried_even_when_skipped() {
        let predictor = Counting {
            calls: Cell::new(0),
        };
        let rows = vec![row(Weekday::Mon, 0, Low)];
        let report = evaluate(&predictor, &rows);

        assert_eq!(predictor.calls.get(), 168);
        assert_eq!(report.days.iter().filter(|d| d.scored().is_some()).count(), 1);
        assert_eq!(report.mean_accuracy, Some(1.0));
    }
}
