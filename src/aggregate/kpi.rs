use std::fmt;

use super::{mean, round_to};
use crate::data::columns;
use crate::data::filter::FilteredView;

/// A single KPI card value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KpiValue {
    /// Mean rounded to the nearest integer, half away from zero.
    Count(i64),
    /// Mean percentage, displayed with one decimal.
    Percent(f64),
    NotApplicable,
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Count(n) => write!(f, "{n}"),
            KpiValue::Percent(p) => write!(f, "{p:.1}%"),
            KpiValue::NotApplicable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub applications: KpiValue,
    pub admitted: KpiValue,
    pub enrolled: KpiValue,
    pub retention: KpiValue,
}

impl Kpis {
    /// Card title and value pairs, in display order.
    pub fn cards(&self) -> [(&'static str, KpiValue); 4] {
        [
            ("Avg. applications", self.applications),
            ("Avg. admitted", self.admitted),
            ("Avg. enrolled", self.enrolled),
            ("Avg. retention", self.retention),
        ]
    }
}

fn column_mean(view: &FilteredView<'_>, column: &str) -> Option<f64> {
    view.numeric(column).and_then(|values| mean(&values))
}

fn count_kpi(view: &FilteredView<'_>, column: &str) -> KpiValue {
    match column_mean(view, column) {
        Some(m) => KpiValue::Count(round_to(m, 0) as i64),
        None => KpiValue::NotApplicable,
    }
}

/// Mean of each headline metric over the view, or N/A when the column is
/// absent or has no values in the view.
pub fn kpis(view: &FilteredView<'_>) -> Kpis {
    Kpis {
        applications: count_kpi(view, columns::APPLICATIONS),
        admitted: count_kpi(view, columns::ADMITTED),
        enrolled: count_kpi(view, columns::ENROLLED),
        retention: column_mean(view, columns::RETENTION)
            .map(KpiValue::Percent)
            .unwrap_or(KpiValue::NotApplicable),
    }
}
