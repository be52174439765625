//! Hour-by-hour predictions for each day of the week.

use chrono::Weekday;
use tracing::warn;

use crate::model::CategoryPredictor;
use crate::pipeline::features::{DAYS_OF_WEEK, day_name};
use crate::pipeline::types::VolumeCategory;

/// Hours queried for every day.
pub const HOURS: std::ops::Range<u8> = 0..24;

/// Predictions for hours 0..24 of one day. A failed query leaves `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPrediction {
    pub day: Weekday,
    pub hours: Vec<u8>,
    pub predicted: Vec<Option<VolumeCategory>>,
}

impl DayPrediction {
    pub fn missing(&self) -> usize {
        self.predicted.iter().filter(|p| p.is_none()).count()
    }
}

/// Queries the most likely category for each hour of `day`.
///
/// Query failures are logged and recorded as `None`; they never abort the
/// loop.
pub fn predict_day<P: CategoryPredictor + ?Sized>(predictor: &P, day: Weekday) -> DayPrediction {
    let hours: Vec<u8> = HOURS.collect();
    let predicted = hours
        .iter()
        .map(|&hour| match predictor.predict_most_likely(day, hour) {
            Ok(category) => Some(category),
            Err(e) => {
                warn!(day = day_name(day), hour, error = %e, "Prediction failed");
                None
            }
        })
        .collect();

    DayPrediction {
        day,
        hours,
        predicted,
    }
}

/// Runs [`predict_day`] for Monday through Sunday.
pub fn predict_week<P: CategoryPredictor + ?Sized>(predictor: &P) -> Vec<DayPrediction> {
    DAYS_OF_WEEK
        .iter()
        .map(|&day| predict_day(predictor, day))
        .collect()
}
