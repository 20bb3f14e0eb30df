use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::columns;
use super::model::{CellValue, Table};
use crate::error::LoadError;

/// Cell texts read as missing values.
const NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
];

// ---------------------------------------------------------------------------
// Upload – raw bytes of a user-selected file
// ---------------------------------------------------------------------------

/// The raw content of a user-selected file, before parsing.
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name shown to the user.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Read a file from disk into an [`Upload`].
pub fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Upload { name, bytes })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
///
/// Header names are trimmed. `Year` and `Term` are kept as text so they form
/// categories exactly as written; every other cell is typed as integer, float
/// or text, and the usual NA spellings become missing. Short rows are padded with missing
/// cells; long rows are rejected.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(LoadError::Empty);
    }

    let mut seen = BTreeSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(LoadError::DuplicateColumn(h.clone()));
        }
    }

    let text_columns: Vec<usize> = [columns::YEAR, columns::TERM]
        .into_iter()
        .filter_map(|name| headers.iter().position(|h| h == name))
        .collect();
    let width = headers.len();
    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(LoadError::TooManyFields {
                row: row_no + 1,
                expected: width,
                found: record.len(),
            });
        }

        let mut row: Vec<CellValue> = record
            .iter()
            .enumerate()
            .map(|(col_idx, value)| {
                if text_columns.contains(&col_idx) {
                    as_text(value)
                } else {
                    guess_cell_type(value)
                }
            })
            .collect();
        row.resize(width, CellValue::Null);
        rows.push(row);
    }

    log::debug!("parsed {} rows x {} columns", rows.len(), width);
    Ok(Table::from_rows(headers, rows))
}

fn is_na(s: &str) -> bool {
    NA_VALUES.contains(&s.trim())
}

fn as_text(s: &str) -> CellValue {
    if is_na(s) {
        return CellValue::Null;
    }
    CellValue::Text(s.trim().to_string())
}

fn guess_cell_type(s: &str) -> CellValue {
    if is_na(s) {
        return CellValue::Null;
    }
    let t = s.trim();
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(t.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::MISSING_LABEL;

    #[test]
    fn headers_are_trimmed_and_year_is_text() {
        let table = load_csv_bytes(b" Year , Term,Applications \n2021,Fall,100\n").unwrap();
        assert_eq!(table.column_names, vec!["Year", "Term", "Applications"]);
        assert_eq!(table.rows[0][0], CellValue::Text("2021".into()));
        assert_eq!(table.rows[0][2], CellValue::Integer(100));
    }

    #[test]
    fn cells_are_typed_by_inference() {
        let table = load_csv_bytes(b"a,b,c,d\n1,2.5,x,NA\n").unwrap();
        assert_eq!(
            table.rows[0],
            vec![
                CellValue::Integer(1),
                CellValue::Float(2.5),
                CellValue::Text("x".into()),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let table = load_csv_bytes(b"Year,Term,Enrolled\n2022,Fall\n").unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert!(table.rows[0][2].is_null());
    }

    #[test]
    fn missing_year_stays_missing() {
        let table = load_csv_bytes(b"Year,Term\n,Fall\n2021,Spring\n").unwrap();
        assert!(table.rows[0][0].is_null());
        assert_eq!(table.categories("Year"), vec![MISSING_LABEL, "2021"]);
    }

    #[test]
    fn term_is_kept_as_written() {
        let table = load_csv_bytes(b"Year,Term,Note\n2021, 01 ,  late \n2021,1.50,x\n").unwrap();
        assert_eq!(table.rows[0][1], CellValue::Text("01".into()));
        assert_eq!(table.rows[0][2], CellValue::Text("late".into()));
        assert_eq!(table.categories("Term"), vec!["01", "1.50"]);
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(load_csv_bytes(b""), Err(LoadError::Empty)));
    }

    #[test]
    fn long_rows_are_malformed() {
        let err = load_csv_bytes(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooManyFields {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn colliding_headers_are_malformed() {
        let err = load_csv_bytes(b"Year, Year\n1,2\n").unwrap_err();
        assert!(matches!(err, LoadError::DuplicateColumn(ref c) if c == "Year"));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = load_csv_bytes(b"a,b\n\xff\xfe,1\n").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn read_upload_keeps_file_name() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(b"Year\n2021\n").unwrap();

        let upload = read_upload(file.path()).unwrap();
        assert!(upload.name.ends_with(".csv"));
        assert_eq!(upload.bytes, b"Year\n2021\n");
    }

    #[test]
    fn read_upload_reports_missing_file() {
        let err = read_upload(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("reading /definitely/not/here.csv"));
    }
}
