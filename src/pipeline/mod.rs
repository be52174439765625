//! Reshaping and discretization of raw traffic counts.
//!
//! Raw records are split by date first, then each partition is melted to
//! long format, given calendar features, cleaned and bucketed into
//! [`types::VolumeCategory`] values ready for fitting or evaluation.

pub mod clean;
pub mod discretize;
pub mod features;
pub mod reshape;
pub mod split;
pub mod types;

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::pipeline::split::DateRange;
use crate::pipeline::types::{CategorizedObservation, RawTable};

/// Categorized rows for both partitions.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub training: Vec<CategorizedObservation>,
    pub evaluation: Vec<CategorizedObservation>,
}

/// Runs melt, feature derivation, cleaning and discretization on one table.
///
/// # Errors
///
/// Fails on the first malformed interval label.
pub fn process(table: &RawTable) -> Result<Vec<CategorizedObservation>, PipelineError> {
    let melted = reshape::melt(table);
    let melted_count = melted.len();

    let labeled = features::derive_features(melted)?;
    let cleaned = clean::clean(labeled);
    debug!(
        melted = melted_count,
        kept = cleaned.len(),
        dropped = melted_count - cleaned.len(),
        "Cleaned melted rows"
    );

    Ok(discretize::categorize(cleaned))
}

/// Splits `table` into the two date ranges and processes each side.
#[tracing::instrument(skip(table), fields(records = table.records.len()))]
pub fn prepare_datasets(
    table: RawTable,
    training: DateRange,
    evaluation: DateRange,
) -> Result<Datasets, PipelineError> {
    let partition = split::split_by_date(table, training, evaluation)?;
    info!(
        training_records = partition.training.records.len(),
        evaluation_records = partition.evaluation.records.len(),
        "Split raw records by date"
    );

    let datasets = Datasets {
        training: process(&partition.training)?,
        evaluation: process(&partition.evaluation)?,
    };
    info!(
        training_rows = datasets.training.len(),
        evaluation_rows = datasets.evaluation.len(),
        "Prepared datasets"
    );

    Ok(datasets)
}
