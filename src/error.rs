//! Error and warning types shared by the data layer and the aggregator.

use thiserror::Error;

/// The uploaded content could not be read as a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No header row at all.
    #[error("the file is empty or has no header row")]
    Empty,

    /// Error from the CSV library (including invalid UTF-8).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Two header names are identical once surrounding whitespace is trimmed.
    #[error("duplicate column '{0}' after trimming header names")]
    DuplicateColumn(String),

    /// A data row is wider than the header.
    #[error("row {row} has {found} fields but the header has {expected}")]
    TooManyFields {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// The year/term rollup could not be computed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregationError {
    /// A grouping key column is absent.
    #[error("group column '{0}' is missing")]
    MissingGroupColumn(String),

    /// A metric column holds a value that is not a number.
    #[error("column '{column}' holds non-numeric value '{value}'")]
    NonNumeric { column: String, value: String },
}

/// A soft, per-panel outcome shown in place of a chart or table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Warning {
    #[error("missing columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("select a department column to see the enrollment distribution")]
    NoDepartmentSelected,

    #[error("no positive department enrollment to show for the current selection")]
    EmptyDistribution,

    #[error("could not compute all aggregate statistics; check CSV columns")]
    Aggregation(#[source] AggregationError),
}

impl Warning {
    pub fn missing<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Warning::MissingColumns {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_names() {
        let w = Warning::missing(["Year", "Retention Rate (%)"]);
        assert_eq!(w.to_string(), "missing columns: Year, Retention Rate (%)");
    }

    #[test]
    fn aggregation_warning_hides_details() {
        let w = Warning::Aggregation(AggregationError::MissingGroupColumn("Term".into()));
        assert_eq!(
            w.to_string(),
            "could not compute all aggregate statistics; check CSV columns"
        );
    }
}
