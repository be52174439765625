//! Output of fitted CPDs and predicted-vs-actual comparisons.
//!
//! Comparisons go to a [`ComparisonSink`]: a text chart logged through
//! `tracing`, or CSV rows appended to a file.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::evaluation::{DayEvaluation, EvaluationReport};
use crate::model::Cpd;
use csv::WriterBuilder;

/// Receives each scored day of an evaluation.
pub trait ComparisonSink {
    fn render(&mut self, day: &DayEvaluation) -> Result<()>;
}

/// Logs a fixed-width table of actual vs predicted categories per hour.
#[derive(Debug, Default)]
pub struct TextChart;

impl ComparisonSink for TextChart {
    fn render(&mut self, day: &DayEvaluation) -> Result<()> {
        info!("\n{}", render_day(day));
        Ok(())
    }
}

/// Appends one CSV row per compared hour to `path`.
#[derive(Debug)]
pub struct CsvExport {
    pub path: String,
}

impl ComparisonSink for CsvExport {
    fn render(&mut self, day: &DayEvaluation) -> Result<()> {
        for row in comparison_rows(day) {
            append_record(&self.path, &row)?;
        }
        Ok(())
    }
}

/// A single compared hour, as written by [`CsvExport`].
#[derive(Debug, Serialize)]
pub struct ComparisonRow<'a> {
    pub day: &'a str,
    pub hour: u8,
    pub actual_hour: u8,
    pub actual: &'a str,
    pub predicted: &'a str,
    pub day_accuracy: f64,
}

fn comparison_rows(day: &DayEvaluation) -> Vec<ComparisonRow<'_>> {
    day.hours
        .iter()
        .zip(&day.actual_hours)
        .zip(day.actual.iter().zip(&day.predicted))
        .map(|((&hour, &actual_hour), (actual, predicted))| ComparisonRow {
            day: &day.day,
            hour,
            actual_hour,
            actual: actual.as_str(),
            predicted: predicted.map(|p| p.as_str()).unwrap_or(""),
            day_accuracy: day.accuracy,
        })
        .collect()
}

/// Formats one day as `<Day>: Accuracy: NN.NN%` followed by an hour table.
/// Missing predictions print as `-`.
pub fn render_day(day: &DayEvaluation) -> String {
    let mut out = format!("{}: Accuracy: {:.2}%\n", day.day, day.accuracy * 100.0);
    let _ = writeln!(out, "{:>4}  {:<9}  {:<9}", "hour", "actual", "predicted");
    for (i, hour) in day.hours.iter().enumerate() {
        let actual = day.actual.get(i).map(|c| c.as_str()).unwrap_or("-");
        let predicted = day
            .predicted
            .get(i)
            .copied()
            .flatten()
            .map(|c| c.as_str())
            .unwrap_or("-");
        let _ = writeln!(out, "{hour:>4}  {actual:<9}  {predicted:<9}");
    }
    out
}

/// Sends every scored day of `report` to `sink`.
pub fn render_report(report: &EvaluationReport, sink: &mut dyn ComparisonSink) -> Result<()> {
    for day in report.days.iter().filter_map(|d| d.scored()) {
        sink.render(day)?;
    }
    Ok(())
}

/// Logs the learned CPDs, one table per node.
pub fn print_cpds(cpds: &[Cpd]) {
    for cpd in cpds {
        let mut out = if cpd.evidence.is_empty() {
            format!("P({})\n", cpd.variable)
        } else {
            format!("P({} | {})\n", cpd.variable, cpd.evidence.join(", "))
        };
        for column in &cpd.columns {
            if !column.evidence.is_empty() {
                let _ = write!(out, "{:<16}", column.evidence.join(" @ "));
            }
            for (state, p) in cpd.states.iter().zip(&column.probabilities) {
                let _ = write!(out, " {state}={p:.4}");
            }
            out.push('\n');
        }
        info!("\n{}", out);
    }
}

/// Logs the evaluation report using Rust's debug pretty-print format.
pub fn print_pretty(report: &EvaluationReport) {
    debug!("{:#?}", report);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &impl Serialize) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
