//! CSV signal import and export.
//!
//! Format: comma-separated cells, whitespace trimmed per cell. Blank
//! lines and lines starting with `#` are skipped. The first remaining row
//! is a header iff any of its cells is non-numeric; otherwise columns are
//! named `Col1…ColN`. Every data row must have the same cell count.

use std::fmt::Write as _;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Named columns of equal length, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvData {
    /// `(column name, samples)` pairs in the order they appear in the file.
    pub columns: Vec<(String, Vec<f64>)>,
}

impl CsvData {
    /// No columns at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Samples of a named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, samples)| samples.as_slice())
    }

    /// Number of data rows: the longest column (0 with no columns).
    /// Shorter columns are written as 0.0 past their end.
    pub fn rows(&self) -> usize {
        self.columns.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// True when there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Errors raised while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Path of the unwritable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data row has a different cell count than the first row.
    #[error("line {line}: expected {expected} values, found {found}")]
    RowArity {
        /// 1-based line number in the file.
        line: usize,
        /// Cell count established by the first row.
        expected: usize,
        /// Cell count found on this line.
        found: usize,
    },

    /// A data cell did not parse as a number.
    #[error("line {line}: '{value}' is not a number")]
    InvalidNumber {
        /// 1-based line number in the file.
        line: usize,
        /// Offending cell content.
        value: String,
    },
}

/// Loads a CSV file into named columns.
///
/// Fails at the first offending line; see the module docs for the format.
pub fn load_csv(path: impl AsRef<Path>) -> Result<CsvData, CsvError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CsvError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut names: Option<Vec<String>> = None;
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();

        if names.is_none() {
            let parsed: Vec<Option<f64>> =
                cells.iter().map(|c| c.parse::<f64>().ok()).collect();

            if parsed.iter().any(Option::is_none) {
                // Header row.
                names = Some(cells.iter().map(|c| c.to_string()).collect());
                columns = vec![Vec::new(); cells.len()];
            } else {
                // Numeric first row: default column names, row is data.
                names = Some((1..=cells.len()).map(|i| format!("Col{i}")).collect());
                columns = parsed.into_iter().map(|v| vec![v.unwrap_or(0.0)]).collect();
            }
            continue;
        }

        let expected = columns.len();
        if cells.len() != expected {
            return Err(CsvError::RowArity {
                line: line_number,
                expected,
                found: cells.len(),
            });
        }

        for (cell, column) in cells.iter().zip(columns.iter_mut()) {
            let value = cell.parse::<f64>().map_err(|_| CsvError::InvalidNumber {
                line: line_number,
                value: cell.to_string(),
            })?;
            column.push(value);
        }
    }

    let names = names.unwrap_or_default();
    Ok(CsvData {
        columns: names.into_iter().zip(columns).collect(),
    })
}

/// Saves columns as CSV: a header row, then fixed-precision data rows.
pub fn save_csv(
    path: impl AsRef<Path>,
    data: &CsvData,
    precision: usize,
) -> Result<(), CsvError> {
    let path = path.as_ref();
    let write_err = |source| CsvError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", data.column_names().join(",")).map_err(write_err)?;

    let mut line = String::new();
    for row in 0..data.rows() {
        line.clear();
        for (i, (_, samples)) in data.columns.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            let value = samples.get(row).copied().unwrap_or(0.0);
            let _ = write!(line, "{value:.precision$}");
        }
        writeln!(writer, "{line}").map_err(write_err)?;
    }

    writer.flush().map_err(write_err)?;
    Ok(())
}
