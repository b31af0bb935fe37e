//! Tabular file parsing
//!
//! Turns a delimited-text or Excel file into `{columns, rows}` where the
//! first row supplies field names and every cell is kept as a string. No
//! type coercion happens at this stage; that is the commit step's concern.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use clinio_core::models::Row;
use serde_json::Value as JsonValue;

use crate::error::{ImportError, ImportResult};

/// A fully parsed tabular file.
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    /// Field names from the first row, in source order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> ImportError {
    ImportError::Parse {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn record_to_row(columns: &[String], record: &csv::StringRecord) -> Row {
    let mut row = Row::new();
    for (index, column) in columns.iter().enumerate() {
        // Ragged rows: missing cells become empty strings
        let value = record.get(index).unwrap_or_default();
        row.insert(column.clone(), JsonValue::String(value.to_string()));
    }
    row
}

/// Parse a CSV file. The first record supplies the column names; ragged data
/// rows are tolerated.
pub fn parse_csv(path: &Path) -> ImportResult<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| parse_error(path, e))?;

    let mut columns: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    // Excel-produced CSVs often lead with a UTF-8 BOM
    if let Some(first) = columns.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse_error(path, e))?;
        rows.push(record_to_row(&columns, &record));
    }

    Ok(ParsedTable { columns, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers render without a trailing ".0"
            if f.fract() == 0.0 && f.abs() < 9e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Parse the first worksheet of an Excel workbook (`.xlsx` or `.xls`).
pub fn parse_excel(path: &Path) -> ImportResult<ParsedTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(path, e))?;

    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(ParsedTable::default());
    };
    let range = range.map_err(|e| parse_error(path, e))?;

    let mut row_iter = range.rows();
    let columns: Vec<String> = match row_iter.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Ok(ParsedTable::default()),
    };

    let mut rows = Vec::new();
    for record in row_iter {
        let mut row = Row::new();
        for (index, column) in columns.iter().enumerate() {
            let value = record.get(index).map(cell_to_string).unwrap_or_default();
            row.insert(column.clone(), JsonValue::String(value));
        }
        rows.push(row);
    }

    Ok(ParsedTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_parse_csv_headers_and_rows() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "patients.csv",
            b"firstName,lastName,dob\nJane,Doe,1980-01-01\nJohn,Smith,1990-05-12\n",
        );

        let table = parse_csv(&path).unwrap();
        assert_eq!(table.columns, vec!["firstName", "lastName", "dob"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["firstName"], "Jane");
        assert_eq!(table.rows[1]["dob"], "1990-05-12");
        // Column order survives into the row map
        let keys: Vec<&String> = table.rows[0].keys().collect();
        assert_eq!(keys, vec!["firstName", "lastName", "dob"]);
    }

    #[test]
    fn test_parse_csv_ragged_rows_tolerated() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "ragged.csv", b"a,b,c\n1,2\n3,4,5,6\n");

        let table = parse_csv(&path).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["c"], "");
        assert_eq!(table.rows[1]["c"], "5");
        // Cells beyond the header width are dropped
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_parse_csv_strips_bom_from_first_header() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "bom.csv", b"\xef\xbb\xbfname,age\nJane,40\n");

        let table = parse_csv(&path).unwrap();
        assert_eq!(table.columns[0], "name");
        assert_eq!(table.rows[0]["name"], "Jane");
    }

    #[test]
    fn test_parse_csv_invalid_utf8_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "broken.csv", b"name\nJa\xff\xfene\n");

        let err = parse_csv(&path).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn test_parse_csv_missing_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let err = parse_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("x".to_string())), "x");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }
}
