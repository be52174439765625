//! Calendar features: English weekday names and the start hour of an interval.

use chrono::{Datelike, Weekday};

use crate::error::PipelineError;
use crate::pipeline::types::{LabeledObservation, Observation};

/// Days in reporting order.
pub const DAYS_OF_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday, independent of locale.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Start hour of an interval label such as `"13:00-14:00"`.
///
/// Takes the text before `-`, then the integer before `:`. Zero padding is not
/// required (`"9:00-10:00"` is hour 9).
///
/// # Errors
///
/// Returns [`PipelineError::MalformedInterval`] if no hour in `0..=23` can be
/// read.
pub fn extract_hour(label: &str) -> Result<u8, PipelineError> {
    let start = label.split('-').next().unwrap_or_default();
    let hour_text = start.split(':').next().unwrap_or_default().trim();

    match hour_text.parse::<u8>() {
        Ok(hour) if hour < 24 => Ok(hour),
        _ => Err(PipelineError::MalformedInterval(label.to_string())),
    }
}

/// Attaches day-of-week and hour to every observation.
///
/// Runs before cleaning, so a malformed label fails the run even when its
/// volume would have been dropped.
pub fn derive_features(rows: Vec<Observation>) -> Result<Vec<LabeledObservation>, PipelineError> {
    rows.into_iter()
        .map(|observation| -> Result<LabeledObservation, PipelineError> {
            let hour = extract_hour(&observation.interval)?;
            let day_of_week = observation.date.weekday();
            Ok(LabeledObservation {
                observation,
                day_of_week,
                hour,
            })
        })
        .collect()
}
