use super::group_means;
use crate::data::columns;
use crate::data::filter::FilteredView;
use crate::error::Warning;

/// One bar of the grouped term comparison chart (long form).
#[derive(Debug, Clone, PartialEq)]
pub struct TermMetric {
    pub term: String,
    pub metric: &'static str,
    pub value: f64,
}

/// Mean of each present volume metric per term, metric-major and then by
/// term label.
pub fn term_comparison(view: &FilteredView<'_>) -> Result<Vec<TermMetric>, Warning> {
    let metrics: Vec<&'static str> = columns::VOLUME_METRICS
        .into_iter()
        .filter(|m| view.has_column(m))
        .collect();

    let mut missing = Vec::new();
    if !view.has_column(columns::TERM) {
        missing.push(columns::TERM.to_string());
    }
    if metrics.is_empty() {
        missing.push(columns::VOLUME_METRICS.join(" / "));
    }
    if !missing.is_empty() {
        return Err(Warning::missing(missing));
    }

    let rows = metrics
        .into_iter()
        .flat_map(|metric| {
            group_means(view, columns::TERM, metric)
                .into_iter()
                .map(move |(term, value)| TermMetric {
                    term,
                    metric,
                    value,
                })
        })
        .collect();
    Ok(rows)
}
