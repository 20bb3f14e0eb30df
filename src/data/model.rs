use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Category offered for blank Year/Term cells so they stay selectable.
pub const MISSING_LABEL: &str = "(missing)";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, inferred per value at load time.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Text and missing cells have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Categorical label used by the Year/Term selections; `None` when missing.
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Filter category of the cell: its label, or [`MISSING_LABEL`].
    pub fn category(&self) -> String {
        self.label().unwrap_or_else(|| MISSING_LABEL.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed table with pre-computed per-column unique values.
///
/// Rows are stored positionally; `column_names[i]` names the i-th cell of every
/// row. Column names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Trimmed header names in file order.
    pub column_names: Vec<String>,
    /// Data rows, each exactly `column_names.len()` cells wide.
    pub rows: Vec<Vec<CellValue>>,
    /// For each column the sorted set of unique non-missing values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Table {
    /// Build column indices from the loaded rows.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = column_names
            .iter()
            .map(|name| (name.clone(), BTreeSet::new()))
            .collect();

        for row in &rows {
            for (name, val) in column_names.iter().zip(row) {
                if val.is_null() {
                    continue;
                }
                if let Some(set) = unique_values.get_mut(name) {
                    set.insert(val.clone());
                }
            }
        }

        Table {
            column_names,
            rows,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Accessor for a named column, or `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        self.column_index(name).map(|index| Column { table: self, index })
    }

    /// Sorted distinct categories of a column (empty if absent). Blank cells
    /// contribute [`MISSING_LABEL`].
    pub fn categories(&self, name: &str) -> Vec<String> {
        let mut labels: BTreeSet<String> = self
            .unique_values
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(CellValue::label)
            .collect();
        if let Some(column) = self.column(name) {
            if (0..self.len()).any(|row| column.get(row).is_null()) {
                labels.insert(MISSING_LABEL.to_string());
            }
        }
        labels.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Column – presence-checked access to one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Column<'a> {
    /// Cell of this column in row `row`.
    pub fn get(&self, row: usize) -> &'a CellValue {
        &self.table.rows[row][self.index]
    }
}
