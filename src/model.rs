//! Discrete Bayesian network `DayOfWeek -> TrafficVolumeCategory <- Hour`.
//!
//! Parameters are learned with a BDeu prior: every CPD column gets the same
//! pseudo-count mass `ess / (r * q)`, where `ess` is the equivalent sample
//! size, `r` the number of states of the variable and `q` the number of
//! parent configurations.
//!
//! ```text
//! P(x)         = (N(x) + ess / r) / (N + ess)
//! P(c | d, h)  = (N(c, d, h) + ess / (r_C * q)) / (N(d, h) + ess / q),  q = r_D * r_H
//! ```
//!
//! Queries run exact variable elimination. With both parents observed the
//! elimination is a single factor product followed by normalization.

use chrono::Weekday;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{PipelineError, QueryError};
use crate::pipeline::features::day_name;
use crate::pipeline::types::{CategorizedObservation, VolumeCategory};

/// One column of a conditional probability table.
#[derive(Debug, Clone, Serialize)]
pub struct CpdColumn {
    pub evidence: Vec<String>,
    pub probabilities: Vec<f64>,
}

/// Learned conditional probability distribution of one network node.
#[derive(Debug, Clone, Serialize)]
pub struct Cpd {
    pub variable: &'static str,
    pub evidence: Vec<&'static str>,
    pub states: Vec<String>,
    pub columns: Vec<CpdColumn>,
}

/// Anything that can answer a most-likely-category query for a day and hour.
pub trait CategoryPredictor {
    fn predict_most_likely(&self, day: Weekday, hour: u8) -> Result<VolumeCategory, QueryError>;
}

/// A fitted, read-only traffic model.
#[derive(Debug, Clone)]
pub struct TrafficModel {
    days: Vec<Weekday>,
    hours: Vec<u8>,
    categories: Vec<VolumeCategory>,
    equivalent_sample_size: f64,
    day_cpd: Vec<f64>,
    hour_cpd: Vec<f64>,
    // [day][hour][category], flattened
    category_cpd: Vec<f64>,
}

impl TrafficModel {
    /// Learns all three CPDs from the training rows.
    ///
    /// State spaces are the values seen in `rows`; days keep Monday-first
    /// order, hours ascend and categories sort by name (High, Low, Medium,
    /// Undefined).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyTrainingSet`] when `rows` is empty.
    #[tracing::instrument(skip(rows), fields(rows = rows.len()))]
    pub fn fit(
        rows: &[CategorizedObservation],
        equivalent_sample_size: f64,
    ) -> Result<Self, PipelineError> {
        if rows.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }

        let days: Vec<Weekday> = rows
            .iter()
            .map(|r| r.day_of_week.num_days_from_monday())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|n| Weekday::try_from(n as u8).ok())
            .collect();
        let hours: Vec<u8> = rows
            .iter()
            .map(|r| r.hour)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut categories: Vec<VolumeCategory> = rows
            .iter()
            .map(|r| r.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        categories.sort_by_key(|c| c.as_str());

        let (r_d, r_h, r_c) = (days.len(), hours.len(), categories.len());
        let mut day_counts = vec![0usize; r_d];
        let mut hour_counts = vec![0usize; r_h];
        let mut joint = vec![0usize; r_d * r_h * r_c];

        for row in rows {
            // every value was collected into the state lists above
            let (Some(d), Some(h), Some(c)) = (
                days.iter().position(|&x| x == row.day_of_week),
                hours.iter().position(|&x| x == row.hour),
                categories.iter().position(|&x| x == row.category),
            ) else {
                continue;
            };
            day_counts[d] += 1;
            hour_counts[h] += 1;
            joint[(d * r_h + h) * r_c + c] += 1;
        }

        let ess = equivalent_sample_size;
        let total = rows.len() as f64;
        let root_cpd = |counts: &[usize]| -> Vec<f64> {
            let pseudo = ess / counts.len() as f64;
            counts
                .iter()
                .map(|&n| (n as f64 + pseudo) / (total + ess))
                .collect()
        };

        let q = (r_d * r_h) as f64;
        let pseudo = ess / (r_c as f64 * q);
        let mut category_cpd = vec![0.0; joint.len()];
        for (column, counts) in joint.chunks(r_c).enumerate() {
            let parent_total: usize = counts.iter().sum();
            let denominator = parent_total as f64 + ess / q;
            for (c, &n) in counts.iter().enumerate() {
                category_cpd[column * r_c + c] = (n as f64 + pseudo) / denominator;
            }
        }

        Ok(Self {
            day_cpd: root_cpd(&day_counts),
            hour_cpd: root_cpd(&hour_counts),
            days,
            hours,
            categories,
            equivalent_sample_size,
            category_cpd,
        })
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    pub fn hours(&self) -> &[u8] {
        &self.hours
    }

    pub fn categories(&self) -> &[VolumeCategory] {
        &self.categories
    }

    pub fn equivalent_sample_size(&self) -> f64 {
        self.equivalent_sample_size
    }

    /// Posterior `P(TrafficVolumeCategory | DayOfWeek = day, Hour = hour)`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownEvidence`] if `day` or `hour` is not a
    /// state of the fitted network.
    pub fn posterior(
        &self,
        day: Weekday,
        hour: u8,
    ) -> Result<Vec<(VolumeCategory, f64)>, QueryError> {
        let d = self
            .days
            .iter()
            .position(|&x| x == day)
            .ok_or_else(|| QueryError::UnknownEvidence {
                variable: "DayOfWeek",
                value: day_name(day).to_string(),
            })?;
        let h = self
            .hours
            .iter()
            .position(|&x| x == hour)
            .ok_or_else(|| QueryError::UnknownEvidence {
                variable: "Hour",
                value: hour.to_string(),
            })?;

        let r_c = self.categories.len();
        let column = &self.category_cpd[(d * self.hours.len() + h) * r_c..][..r_c];
        let evidence_weight = self.day_cpd[d] * self.hour_cpd[h];

        let factor: Vec<f64> = column.iter().map(|p| p * evidence_weight).collect();
        let z: f64 = factor.iter().sum();
        if !z.is_finite() || z <= 0.0 {
            return Err(QueryError::UndefinedPosterior {
                day: day_name(day).to_string(),
                hour,
            });
        }

        Ok(self
            .categories
            .iter()
            .zip(factor)
            .map(|(&c, p)| (c, p / z))
            .collect())
    }

    /// MAP estimate of the category for the given evidence.
    ///
    /// Ties go to the earliest category in state order, so a uniform
    /// posterior answers `High`.
    pub fn map_query(&self, day: Weekday, hour: u8) -> Result<VolumeCategory, QueryError> {
        let posterior = self.posterior(day, hour)?;
        posterior
            .into_iter()
            .fold(None, |best: Option<(VolumeCategory, f64)>, (c, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((c, p)),
            })
            .map(|(c, _)| c)
            .ok_or_else(|| QueryError::UndefinedPosterior {
                day: day_name(day).to_string(),
                hour,
            })
    }

    /// The learned CPDs, roots first.
    pub fn cpds(&self) -> Vec<Cpd> {
        let day_states: Vec<String> = self.days.iter().map(|d| day_name(*d).to_string()).collect();
        let hour_states: Vec<String> = self.hours.iter().map(u8::to_string).collect();
        let category_states: Vec<String> =
            self.categories.iter().map(|c| c.to_string()).collect();

        let root = |variable: &'static str, states: &[String], probabilities: &[f64]| Cpd {
            variable,
            evidence: Vec::new(),
            states: states.to_vec(),
            columns: vec![CpdColumn {
                evidence: Vec::new(),
                probabilities: probabilities.to_vec(),
            }],
        };

        let r_c = self.categories.len();
        let mut columns = Vec::with_capacity(self.days.len() * self.hours.len());
        for (d, day) in day_states.iter().enumerate() {
            for (h, hour) in hour_states.iter().enumerate() {
                let start = (d * self.hours.len() + h) * r_c;
                columns.push(CpdColumn {
                    evidence: vec![day.clone(), hour.clone()],
                    probabilities: self.category_cpd[start..start + r_c].to_vec(),
                });
            }
        }

        vec![
            root("DayOfWeek", &day_states, &self.day_cpd),
            root("Hour", &hour_states, &self.hour_cpd),
            Cpd {
                variable: "TrafficVolumeCategory",
                evidence: vec!["DayOfWeek", "Hour"],
                states: category_states,
                columns,
            },
        ]
    }
}

impl CategoryPredictor for TrafficModel {
    fn predict_most_likely(&self, day: Weekday, hour: u8) -> Result<VolumeCategory, QueryError> {
        self.map_query(day, hour)
    }
}
