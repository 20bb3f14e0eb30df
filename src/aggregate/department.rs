use crate::config::DashboardConfig;
use crate::data::columns;
use crate::data::filter::{FilteredView, Selection};
use crate::error::Warning;

/// One slice of the department donut.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentShare {
    pub label: String,
    pub value: f64,
}

/// Keep the `top_n` largest entries and fold the rest into one
/// `other_label` entry. Input order is assumed to be descending.
pub fn bucket(
    mut entries: Vec<DepartmentShare>,
    top_n: usize,
    other_label: &str,
) -> Vec<DepartmentShare> {
    if entries.len() <= top_n {
        return entries;
    }
    let rest = entries.split_off(top_n);
    entries.push(DepartmentShare {
        label: other_label.to_string(),
        value: rest.iter().map(|e| e.value).sum(),
    });
    entries
}

/// Enrollment per department for the most recently selected year.
///
/// Sums every department column over the rows of `selection.last_year()`
/// (the whole view when no year is selected), keeps positive sums in
/// descending order and buckets the tail. `department` is the department
/// column picked by the user; without one there is nothing to show.
pub fn department_distribution(
    view: &FilteredView<'_>,
    selection: &Selection,
    department: Option<&str>,
    config: &DashboardConfig,
) -> Result<Vec<DepartmentShare>, Warning> {
    match department {
        Some(dept) if view.has_column(dept) => {}
        _ => return Err(Warning::NoDepartmentSelected),
    }

    let slice = match selection.last_year() {
        Some(year) if view.has_column(columns::YEAR) => view.restrict(columns::YEAR, year),
        _ => view.clone(),
    };

    let mut shares: Vec<DepartmentShare> = columns::department_columns(&view.table.column_names)
        .iter()
        .filter_map(|col| {
            let label = columns::department_label(col)?;
            let total: f64 = slice.numeric(col)?.iter().sum();
            (total > 0.0 && total.is_finite()).then(|| DepartmentShare {
                label: label.to_string(),
                value: total,
            })
        })
        .collect();

    if shares.is_empty() {
        return Err(Warning::EmptyDistribution);
    }

    shares.sort_by(|a, b| b.value.total_cmp(&a.value));
    Ok(bucket(shares, config.top_departments, &config.other_label))
}
