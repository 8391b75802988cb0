//! In-memory record table and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a table loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Tabular metadata records.
///
/// Cells are kept as strings; a cell counts as missing when
/// [`DataTable::is_null_value`] says so. Every row has exactly
/// `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table from string slices. Handy for tests and small fixtures.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// A table with the same headers and no rows.
    pub fn empty_like(&self) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: Vec::new(),
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Get a cell by column name, `None` if the column or row is absent.
    pub fn get_by_name(&self, row: usize, name: &str) -> Option<&str> {
        self.get(row, self.column_index(name)?)
    }

    /// A column is numeric when it holds at least one value and every
    /// non-missing value parses as a float.
    pub fn is_numeric_column(&self, index: usize) -> bool {
        let mut seen = false;
        for value in self.column_values(index) {
            if Self::is_null_value(value) {
                continue;
            }
            if value.trim().parse::<f64>().is_err() {
                return false;
            }
            seen = true;
        }
        seen
    }

    /// Names of all numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<String> {
        (0..self.column_count())
            .filter(|&i| self.is_numeric_column(i))
            .map(|i| self.headers[i].clone())
            .collect()
    }

    /// Add a column, or overwrite it in place if a column of that name exists.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pads_ragged_rows() {
        let table = DataTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into()]],
        );
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["1", "2"]);
    }

    #[test]
    fn test_numeric_columns() {
        let table = DataTable::from_strs(
            &["id", "n", "mixed", "blank"],
            &[&["GSE1", "12", "3", ""], &["GSE2", "NA", "x", ""]],
        );
        assert_eq!(table.numeric_columns(), vec!["n"]);
    }

    #[test]
    fn test_set_column_adds_then_overwrites() {
        let mut table = DataTable::from_strs(&["id"], &[&["a"], &["b"]]);
        table.set_column("label", vec!["x".into(), "y".into()]);
        assert_eq!(table.headers, vec!["id", "label"]);
        table.set_column("label", vec!["p".into(), "q".into()]);
        assert_eq!(table.column_by_name("label").unwrap(), vec!["p", "q"]);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("NaN"));
        assert!(DataTable::is_null_value("."));
        assert!(!DataTable::is_null_value("0"));
        assert!(!DataTable::is_null_value("GSE1"));
    }
}
