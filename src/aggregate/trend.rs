use std::collections::BTreeMap;

use super::{group_means, require, MeanAcc};
use crate::data::columns;
use crate::data::filter::FilteredView;
use crate::error::Warning;

/// Mean of a metric for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub year: String,
    pub value: f64,
}

/// One line of the retention chart. `term` is `None` when the table has no
/// `Term` column.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub term: Option<String>,
    pub points: Vec<TrendPoint>,
}

/// Mean student satisfaction per year, ascending by year label.
pub fn satisfaction_by_year(view: &FilteredView<'_>) -> Result<Vec<TrendPoint>, Warning> {
    require(view, &[columns::YEAR, columns::SATISFACTION])?;

    Ok(group_means(view, columns::YEAR, columns::SATISFACTION)
        .into_iter()
        .map(|(year, value)| TrendPoint { year, value })
        .collect())
}

/// Mean retention per year, one series per term.
pub fn retention_by_year(view: &FilteredView<'_>) -> Result<Vec<TrendSeries>, Warning> {
    require(view, &[columns::YEAR, columns::RETENTION])?;

    let Some(terms) = view.cells(columns::TERM) else {
        let points = group_means(view, columns::YEAR, columns::RETENTION)
            .into_iter()
            .map(|(year, value)| TrendPoint { year, value })
            .collect::<Vec<_>>();
        let series = if points.is_empty() {
            Vec::new()
        } else {
            vec![TrendSeries { term: None, points }]
        };
        return Ok(series);
    };

    let (Some(years), Some(values)) = (view.cells(columns::YEAR), view.cells(columns::RETENTION))
    else {
        return Ok(Vec::new());
    };

    let mut groups: BTreeMap<String, BTreeMap<String, MeanAcc>> = BTreeMap::new();
    for ((term, year), value) in terms.zip(years).zip(values) {
        let (Some(term), Some(year), Some(v)) = (term.label(), year.label(), value.as_f64())
        else {
            continue;
        };
        groups
            .entry(term)
            .or_default()
            .entry(year)
            .or_default()
            .push(v);
    }

    Ok(groups
        .into_iter()
        .map(|(term, by_year)| TrendSeries {
            term: Some(term),
            points: by_year
                .into_iter()
                .filter_map(|(year, acc)| acc.mean().map(|value| TrendPoint { year, value }))
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    fn point(year: &str, value: f64) -> TrendPoint {
        TrendPoint {
            year: year.to_string(),
            value,
        }
    }

    #[test]
    fn satisfaction_is_ascending_by_year() {
        let table = load_csv_bytes(
            b"Year,Student Satisfaction (%)\n2022,80\n2021,70\n2022,90\n2020,60\n",
        )
        .unwrap();
        let trend = satisfaction_by_year(&FilteredView::all(&table)).unwrap();
        assert_eq!(
            trend,
            vec![point("2020", 60.0), point("2021", 70.0), point("2022", 85.0)]
        );
    }

    #[test]
    fn satisfaction_needs_both_columns() {
        let table = load_csv_bytes(b"Student Satisfaction (%)\n80\n").unwrap();
        assert_eq!(
            satisfaction_by_year(&FilteredView::all(&table)),
            Err(Warning::missing(["Year"]))
        );
    }

    #[test]
    fn retention_splits_by_term() {
        let table = load_csv_bytes(
            b"Year,Term,Retention Rate (%)\n\
              2021,Fall,80\n\
              2021,Spring,70\n\
              2022,Fall,90\n\
              2021,Fall,84\n",
        )
        .unwrap();
        let series = retention_by_year(&FilteredView::all(&table)).unwrap();
        assert_eq!(
            series,
            vec![
                TrendSeries {
                    term: Some("Fall".into()),
                    points: vec![point("2021", 82.0), point("2022", 90.0)],
                },
                TrendSeries {
                    term: Some("Spring".into()),
                    points: vec![point("2021", 70.0)],
                },
            ]
        );
    }

    #[test]
    fn retention_without_term_is_one_series() {
        let table = load_csv_bytes(b"Year,Retention Rate (%)\n2021,80\n2022,90\n").unwrap();
        let series = retention_by_year(&FilteredView::all(&table)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].term, None);
        assert_eq!(series[0].points.len(), 2);
    }

    #[test]
    fn retention_missing_columns() {
        let table = load_csv_bytes(b"Term\nFall\n").unwrap();
        assert_eq!(
            retention_by_year(&FilteredView::all(&table)),
            Err(Warning::missing(["Year", "Retention Rate (%)"]))
        );
    }
}
