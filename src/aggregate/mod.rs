//! Aggregations over a [`FilteredView`], one module per dashboard panel.
//!
//! Every branch names the columns it needs up front and returns a
//! [`Warning`] instead of a result when any of them is absent.

pub mod department;
pub mod kpi;
pub mod rollup;
pub mod term;
pub mod trend;

use std::collections::BTreeMap;

use crate::data::filter::FilteredView;
use crate::error::Warning;

/// Fail with [`Warning::MissingColumns`] listing every absent column.
pub fn require(view: &FilteredView<'_>, columns: &[&str]) -> Result<(), Warning> {
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| !view.has_column(c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Warning::missing(missing))
    }
}

/// Running sum/count for a mean over non-missing values.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    pub(crate) fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    let mut acc = MeanAcc::default();
    values.iter().for_each(|&v| acc.push(v));
    acc.mean()
}

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Mean of `metric` per label of `key`, ascending by label. Rows with a
/// missing key are dropped; groups without any numeric value are omitted.
pub(crate) fn group_means(
    view: &FilteredView<'_>,
    key: &str,
    metric: &str,
) -> BTreeMap<String, f64> {
    let (Some(keys), Some(values)) = (view.cells(key), view.cells(metric)) else {
        return BTreeMap::new();
    };

    let mut groups: BTreeMap<String, MeanAcc> = BTreeMap::new();
    for (k, v) in keys.zip(values) {
        let (Some(label), Some(v)) = (k.label(), v.as_f64()) else {
            continue;
        };
        groups.entry(label).or_default().push(v);
    }

    groups
        .into_iter()
        .filter_map(|(label, acc)| acc.mean().map(|m| (label, m)))
        .collect()
}
