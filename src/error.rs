//! Error types for the traffic pipeline and the fitted model.

use thiserror::Error;

/// Structural failures. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("required column '{0}' is missing from the input table")]
    MissingColumn(String),

    #[error("malformed interval label '{0}', expected 'HH:MM-HH:MM'")]
    MalformedInterval(String),

    #[error("unparseable date '{value}' in row {row}, expected month/day/year")]
    InvalidDate { value: String, row: usize },

    #[error("training range {training} overlaps evaluation range {evaluation}")]
    OverlappingRanges {
        training: String,
        evaluation: String,
    },

    #[error("cannot fit model: training set has no rows")]
    EmptyTrainingSet,
}

/// A single most-likely-category query that produced no answer.
///
/// Recoverable: the query loop records a missing prediction and moves on.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("{variable} = {value} was never observed in training")]
    UnknownEvidence { variable: &'static str, value: String },

    #[error("posterior for {day} at hour {hour} is undefined")]
    UndefinedPosterior { day: String, hour: u8 },
}
