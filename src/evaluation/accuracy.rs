//! Small statistics helpers for comparing actual and predicted categories.

use chrono::Weekday;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::pipeline::types::{CategorizedObservation, VolumeCategory};

/// Most frequent value. Ties go to the value encountered first.
/// Returns `None` for empty input.
pub fn mode<T: Copy + Eq + Hash>(values: &[T]) -> Option<T> {
    let mut counts: HashMap<T, usize> = HashMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for v in values {
        let n = counts[v];
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((*v, n));
        }
    }
    best.map(|(v, _)| v)
}

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Modal category per hour for one day, ascending by hour.
///
/// Hours with no rows for `day` are absent from the result.
pub fn actual_modes(rows: &[CategorizedObservation], day: Weekday) -> Vec<(u8, VolumeCategory)> {
    let mut by_hour: BTreeMap<u8, Vec<VolumeCategory>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.day_of_week == day) {
        by_hour.entry(row.hour).or_default().push(row.category);
    }

    by_hour
        .into_iter()
        .filter_map(|(hour, categories)| Some((hour, mode(&categories)?)))
        .collect()
}

/// Fraction of matching pairs when `actual` and `predicted` are zipped by
/// index. The longer sequence is truncated; a missing prediction never
/// matches. Returns `None` when there is nothing to compare.
pub fn index_accuracy(
    actual: &[VolumeCategory],
    predicted: &[Option<VolumeCategory>],
) -> Option<f64> {
    let overlap = actual.len().min(predicted.len());
    if overlap == 0 {
        return None;
    }

    let hits = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| Some(**a) == **p)
        .count();
    Some(hits as f64 / overlap as f64)
}

/// Like [`index_accuracy`] but pairs each actual value with the prediction
/// for the same hour.
pub fn hour_accuracy(
    actual: &[(u8, VolumeCategory)],
    hours: &[u8],
    predicted: &[Option<VolumeCategory>],
) -> Option<f64> {
    let by_hour: HashMap<u8, Option<VolumeCategory>> =
        hours.iter().copied().zip(predicted.iter().copied()).collect();

    let paired: Vec<bool> = actual
        .iter()
        .filter_map(|(hour, category)| {
            let prediction = by_hour.get(hour)?;
            Some(*prediction == Some(*category))
        })
        .collect();

    if paired.is_empty() {
        return None;
    }
    Some(paired.iter().filter(|hit| **hit).count() as f64 / paired.len() as f64)
}
