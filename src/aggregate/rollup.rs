use std::collections::BTreeMap;

use super::{round_to, MeanAcc};
use crate::data::columns;
use crate::data::filter::FilteredView;
use crate::data::model::CellValue;
use crate::error::AggregationError;

/// Means for one (Year, Term) group. `means[i]` belongs to
/// `Rollup::metrics[i]`; `None` when the group has no values for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupRow {
    pub year: String,
    pub term: String,
    pub means: Vec<Option<f64>>,
}

/// The year/term aggregate table. Only metrics present in the source table
/// appear in `metrics`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub metrics: Vec<&'static str>,
    pub rows: Vec<RollupRow>,
}

impl Rollup {
    /// Mean of `metric` in `row`, if the metric is part of this rollup.
    pub fn get(&self, row: &RollupRow, metric: &str) -> Option<f64> {
        let idx = self.metrics.iter().position(|m| *m == metric)?;
        row.means.get(idx).copied().flatten()
    }
}

/// Group the view by (Year, Term) and average each present metric, rounded
/// to two decimals. Groups are ordered by year, then term.
///
/// Fails when a grouping column is absent or a metric column holds text.
pub fn year_term_rollup(view: &FilteredView<'_>) -> Result<Rollup, AggregationError> {
    let years = view
        .cells(columns::YEAR)
        .ok_or_else(|| AggregationError::MissingGroupColumn(columns::YEAR.into()))?;
    let terms = view
        .cells(columns::TERM)
        .ok_or_else(|| AggregationError::MissingGroupColumn(columns::TERM.into()))?;

    let metrics: Vec<&'static str> = columns::ROLLUP_METRICS
        .into_iter()
        .filter(|m| view.has_column(m))
        .collect();

    let keys: Vec<Option<(String, String)>> = years
        .zip(terms)
        .map(|(y, t)| Some((y.label()?, t.label()?)))
        .collect();

    let mut groups: BTreeMap<(String, String), Vec<MeanAcc>> = BTreeMap::new();
    for key in keys.iter().flatten() {
        groups
            .entry(key.clone())
            .or_insert_with(|| vec![MeanAcc::default(); metrics.len()]);
    }

    for (m_idx, metric) in metrics.iter().enumerate() {
        let Some(cells) = view.cells(metric) else {
            continue;
        };
        for (key, cell) in keys.iter().zip(cells) {
            let value = match cell {
                CellValue::Text(s) => {
                    return Err(AggregationError::NonNumeric {
                        column: metric.to_string(),
                        value: s.clone(),
                    });
                }
                other => other.as_f64(),
            };
            if let (Some(key), Some(v)) = (key, value) {
                if let Some(accs) = groups.get_mut(key) {
                    accs[m_idx].push(v);
                }
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|((year, term), accs)| RollupRow {
            year,
            term,
            means: accs
                .iter()
                .map(|acc| acc.mean().map(|m| round_to(m, 2)))
                .collect(),
        })
        .collect();

    Ok(Rollup { metrics, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    #[test]
    fn groups_by_year_then_term() {
        let table = load_csv_bytes(
            b"Year,Term,Applications,Retention Rate (%)\n\
              2022,Fall,100,80.111\n\
              2021,Spring,50,70\n\
              2022,Fall,201,81\n\
              2021,Fall,10,\n",
        )
        .unwrap();
        let rollup = year_term_rollup(&FilteredView::all(&table)).unwrap();

        assert_eq!(rollup.metrics, vec!["Applications", "Retention Rate (%)"]);
        let keys: Vec<(&str, &str)> = rollup
            .rows
            .iter()
            .map(|r| (r.year.as_str(), r.term.as_str()))
            .collect();
        assert_eq!(keys, vec![("2021", "Fall"), ("2021", "Spring"), ("2022", "Fall")]);

        let last = &rollup.rows[2];
        assert_eq!(rollup.get(last, "Applications"), Some(150.5));
        assert_eq!(rollup.get(last, "Retention Rate (%)"), Some(80.56));
        assert_eq!(rollup.get(&rollup.rows[0], "Retention Rate (%)"), None);
    }

    #[test]
    fn absent_metrics_are_omitted() {
        let table = load_csv_bytes(b"Year,Term,Enrolled\n2021,Fall,40\n").unwrap();
        let rollup = year_term_rollup(&FilteredView::all(&table)).unwrap();
        assert_eq!(rollup.metrics, vec!["Enrolled"]);
        assert!(!rollup.metrics.contains(&"Student Satisfaction (%)"));
        assert_eq!(rollup.get(&rollup.rows[0], "Student Satisfaction (%)"), None);
    }

    #[test]
    fn missing_group_column_fails() {
        let table = load_csv_bytes(b"Year,Enrolled\n2021,40\n").unwrap();
        assert_eq!(
            year_term_rollup(&FilteredView::all(&table)),
            Err(AggregationError::MissingGroupColumn("Term".into()))
        );
    }

    #[test]
    fn text_in_metric_fails() {
        let table = load_csv_bytes(b"Year,Term,Admitted\n2021,Fall,many\n").unwrap();
        assert_eq!(
            year_term_rollup(&FilteredView::all(&table)),
            Err(AggregationError::NonNumeric {
                column: "Admitted".into(),
                value: "many".into(),
            })
        );
    }
}
