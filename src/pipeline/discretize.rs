//! Bucketing of numeric volumes into [`VolumeCategory`].

use crate::pipeline::types::{CategorizedObservation, LabeledObservation, VolumeCategory};

/// Bin edges. Bins are left-open and right-closed: `(0, 100]`, `(100, 200]`,
/// `(200, 500]`.
pub const BIN_EDGES: [f64; 4] = [0.0, 100.0, 200.0, 500.0];

const BIN_LABELS: [VolumeCategory; 3] = [
    VolumeCategory::Low,
    VolumeCategory::Medium,
    VolumeCategory::High,
];

/// Maps a volume to its category.
///
/// Anything outside `(0, 500]`, zero and `NaN` included, is
/// [`VolumeCategory::Undefined`].
pub fn discretize(volume: f64) -> VolumeCategory {
    BIN_EDGES
        .windows(2)
        .zip(BIN_LABELS)
        .find(|(edges, _)| volume > edges[0] && volume <= edges[1])
        .map(|(_, category)| category)
        .unwrap_or(VolumeCategory::Undefined)
}

/// Categorizes cleaned rows. Rows without a numeric count are skipped.
pub fn categorize(rows: Vec<LabeledObservation>) -> Vec<CategorizedObservation> {
    rows.into_iter()
        .filter_map(|row| {
            let volume = row.observation.volume.count()?;
            Some(CategorizedObservation {
                key: row.observation.key,
                date: row.observation.date,
                day_of_week: row.day_of_week,
                hour: row.hour,
                volume,
                category: discretize(volume),
            })
        })
        .collect()
}
