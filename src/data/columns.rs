//! Names of the columns the dashboard recognises. All of them are optional.

pub const YEAR: &str = "Year";
pub const TERM: &str = "Term";
pub const APPLICATIONS: &str = "Applications";
pub const ADMITTED: &str = "Admitted";
pub const ENROLLED: &str = "Enrolled";
pub const RETENTION: &str = "Retention Rate (%)";
pub const SATISFACTION: &str = "Student Satisfaction (%)";

/// Volume metrics compared across terms, in display order.
pub const VOLUME_METRICS: [&str; 3] = [APPLICATIONS, ADMITTED, ENROLLED];

/// Metrics averaged in the year/term rollup, in display order.
pub const ROLLUP_METRICS: [&str; 5] = [APPLICATIONS, ADMITTED, ENROLLED, RETENTION, SATISFACTION];

const DEPARTMENT_SUFFIX: &str = "enrolled";

/// `<Department> Enrolled` columns: case-insensitive "enrolled" suffix with a
/// non-empty department name in front. The bare `Enrolled` total is excluded.
pub fn is_department_column(name: &str) -> bool {
    department_label(name).is_some()
}

/// Department name of a department column, e.g. "Engineering" for
/// "Engineering Enrolled".
pub fn department_label(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(DEPARTMENT_SUFFIX.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = name.split_at(split);
    if !tail.eq_ignore_ascii_case(DEPARTMENT_SUFFIX) {
        return None;
    }
    let label = head.trim();
    (!label.is_empty()).then_some(label)
}

/// All department columns of a header, in header order.
pub fn department_columns(column_names: &[String]) -> Vec<String> {
    column_names
        .iter()
        .filter(|c| is_department_column(c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_suffix_is_case_insensitive() {
        assert_eq!(department_label("Engineering Enrolled"), Some("Engineering"));
        assert_eq!(department_label("arts ENROLLED"), Some("arts"));
        assert_eq!(department_label("ScienceEnrolled"), Some("Science"));
    }

    #[test]
    fn total_enrolled_is_not_a_department() {
        assert!(!is_department_column("Enrolled"));
        assert!(!is_department_column(" enrolled"));
        assert!(!is_department_column("Admitted"));
        assert!(!is_department_column("rolled"));
    }

    #[test]
    fn department_columns_keep_header_order() {
        let header: Vec<String> = ["Year", "Enrolled", "Business Enrolled", "Arts Enrolled"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            department_columns(&header),
            vec!["Business Enrolled".to_string(), "Arts Enrolled".to_string()]
        );
    }
}
