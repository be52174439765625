//! Wide-to-long melt of the per-interval columns.

use crate::pipeline::types::{Observation, RawTable, Volume};

/// Melts every raw record into one [`Observation`] per interval label.
///
/// Output order is record by record, and label order within a record. The
/// segment key is duplicated onto each output row, so a table of `R` records
/// and `N` labels always yields `R * N` rows.
pub fn melt(table: &RawTable) -> Vec<Observation> {
    let mut rows = Vec::with_capacity(table.records.len() * table.interval_labels.len());

    for record in &table.records {
        for (label, cell) in table.interval_labels.iter().zip(&record.volumes) {
            let volume = match cell {
                Some(text) => Volume::Literal(text.clone()),
                None => Volume::Missing,
            };

            rows.push(Observation {
                key: record.key.clone(),
                date: record.date,
                interval: label.clone(),
                volume,
            });
        }
    }

    rows
}
