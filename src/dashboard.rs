use crate::aggregate::department::{department_distribution, DepartmentShare};
use crate::aggregate::kpi::{kpis, Kpis};
use crate::aggregate::rollup::{year_term_rollup, Rollup};
use crate::aggregate::term::{term_comparison, TermMetric};
use crate::aggregate::trend::{retention_by_year, satisfaction_by_year, TrendPoint, TrendSeries};
use crate::config::DashboardConfig;
use crate::data::columns;
use crate::data::filter::{apply_filter, Selection};
use crate::data::model::Table;
use crate::error::Warning;

// ---------------------------------------------------------------------------
// DashboardView – everything the panels draw for one interaction
// ---------------------------------------------------------------------------

/// Results of every dashboard panel for the current selection. Each panel is
/// independent: a warning in one never prevents the others.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Indices of the table rows that passed the filter.
    pub visible_rows: Vec<usize>,
    pub kpis: Kpis,
    pub retention_trend: Result<Vec<TrendSeries>, Warning>,
    pub satisfaction_trend: Result<Vec<TrendPoint>, Warning>,
    pub term_comparison: Result<Vec<TermMetric>, Warning>,
    pub department_distribution: Result<Vec<DepartmentShare>, Warning>,
    pub rollup: Result<Rollup, Warning>,
}

/// Columns the department selector offers.
pub fn department_choices(table: &Table) -> Vec<String> {
    columns::department_columns(&table.column_names)
}

impl DashboardView {
    /// Filter `table` and run every aggregation.
    pub fn compute(
        table: &Table,
        selection: &Selection,
        department: Option<&str>,
        config: &DashboardConfig,
    ) -> Self {
        let view = apply_filter(table, selection);
        if view.is_empty() {
            log::info!("No rows match the current selection");
        } else {
            log::debug!("Computing panels over {} of {} rows", view.len(), table.len());
        }

        let rollup = match year_term_rollup(&view) {
            Ok(rollup) => Ok(rollup),
            Err(e) => {
                log::warn!("Rollup failed: {e}");
                Err(Warning::Aggregation(e))
            }
        };

        let dashboard = DashboardView {
            kpis: kpis(&view),
            retention_trend: retention_by_year(&view),
            satisfaction_trend: satisfaction_by_year(&view),
            term_comparison: term_comparison(&view),
            department_distribution: department_distribution(
                &view, selection, department, config,
            ),
            rollup,
            visible_rows: view.indices,
        };
        dashboard.log_warnings();
        dashboard
    }

    fn log_warnings(&self) {
        let panels = [
            ("retention trend", self.retention_trend.as_ref().err()),
            ("satisfaction trend", self.satisfaction_trend.as_ref().err()),
            ("term comparison", self.term_comparison.as_ref().err()),
            ("department distribution", self.department_distribution.as_ref().err()),
        ];
        for (panel, warning) in panels {
            if let Some(w) = warning {
                log::info!("{panel}: {w}");
            }
        }
    }
}
