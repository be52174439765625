//! End-to-end run: split, prepare, fit, evaluate.

use anyhow::Result;
use tracing::info;

use crate::config::PipelineConfig;
use crate::evaluation::{EvaluationReport, evaluate};
use crate::model::TrafficModel;
use crate::parser::load_table;
use crate::pipeline::types::RawTable;
use crate::pipeline::{Datasets, prepare_datasets};

/// Everything produced by a single run.
#[derive(Debug)]
pub struct Run {
    pub datasets: Datasets,
    pub model: TrafficModel,
    pub report: EvaluationReport,
}

/// Prepares both partitions of `table` and fits the model on training rows.
pub fn fit(table: RawTable, config: &PipelineConfig) -> Result<(Datasets, TrafficModel)> {
    config.validate()?;

    let datasets = prepare_datasets(table, config.training, config.evaluation)?;
    let model = TrafficModel::fit(&datasets.training, config.equivalent_sample_size)?;
    info!(
        days = model.days().len(),
        hours = model.hours().len(),
        categories = model.categories().len(),
        equivalent_sample_size = model.equivalent_sample_size(),
        "Fitted traffic model"
    );

    Ok((datasets, model))
}

/// Fits on the training partition and scores the evaluation partition.
pub fn fit_and_evaluate(table: RawTable, config: &PipelineConfig) -> Result<Run> {
    let (datasets, model) = fit(table, config)?;
    let report = evaluate(&model, &datasets.evaluation);

    match report.mean_accuracy {
        Some(mean) => info!(
            mean_accuracy_pct = %format!("{:.2}", mean * 100.0),
            "Evaluation complete"
        ),
        None => info!("Evaluation complete, no day could be scored"),
    }

    Ok(Run {
        datasets,
        model,
        report,
    })
}

/// Loads `path` for the configured segment and runs [`fit_and_evaluate`].
pub fn run_file(path: &str, config: &PipelineConfig) -> Result<Run> {
    let table = load_table(path, &config.interval_labels, &config.segment_id)?;
    fit_and_evaluate(table, config)
}
