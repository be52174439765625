//! Drops rows without a usable numeric volume.

use crate::pipeline::types::{LabeledObservation, Volume};

/// Removes missing volumes, coerces the rest to numbers, then removes the
/// literals that failed to coerce.
///
/// The coercion has to run before the second drop: it is what turns malformed
/// literals into missing values. `NaN` literals count as missing. The result
/// only holds [`Volume::Count`] rows, so applying this again is a no-op.
pub fn clean(rows: Vec<LabeledObservation>) -> Vec<LabeledObservation> {
    rows.into_iter()
        .filter(|row| !row.observation.volume.is_missing())
        .map(|mut row| {
            row.observation.volume = coerce(row.observation.volume);
            row
        })
        .filter(|row| !row.observation.volume.is_missing())
        .collect()
}

fn coerce(volume: Volume) -> Volume {
    match volume {
        Volume::Literal(text) => match text.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => Volume::Count(v),
            _ => Volume::Missing,
        },
        Volume::Count(v) if v.is_nan() => Volume::Missing,
        other => other,
    }
}
