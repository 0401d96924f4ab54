// Raw tabular input: the CSV loader's output and the normalizer's input.
//
// Exporter files carry stray non-ASCII bytes (degree signs, BOMs, smart
// quotes). They are stripped before parsing so header names match the
// expected column names exactly.

use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::normalize::SchemaError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ---------------------------------------------------------------------------
// RawTable
// ---------------------------------------------------------------------------

/// Rows of untyped text cells under a header of named columns.
///
/// Every row has exactly `headers().len()` cells; short rows are padded with
/// blanks and long rows truncated when the table is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        RawTable { headers, rows }
    }

    /// Parse CSV text with a header row.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => {
                    warn!("skipping malformed CSV record {}: {}", index + 1, e);
                }
            }
        }
        Ok(RawTable::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with exactly this (trimmed) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Write the table back out as CSV.
    pub fn write_csv<W: std::io::Write>(&self, wtr: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(wtr);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

/// Drop every non-ASCII character.
pub fn strip_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Load a CSV export from disk.
///
/// Invalid UTF-8 is decoded lossily and then stripped along with the rest of
/// the non-ASCII text.
pub fn load_table(path: &Path) -> Result<RawTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let clean = strip_non_ascii(&text);
    if clean.len() != text.len() {
        debug!(
            "stripped {} bytes of non-ASCII text from {}",
            text.len() - clean.len(),
            path.display()
        );
    }
    let table = RawTable::from_reader(clean.as_bytes()).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!("loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_header_and_rows() {
        let csv_data = "\
Player Name,ExitVelocity,LaunchAngle
Jane Doe,88.5,12
John Roe,91.2,-3";

        let table = RawTable::from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.headers(), ["Player Name", "ExitVelocity", "LaunchAngle"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some("Jane Doe"));
        assert_eq!(table.cell(1, 2), Some("-3"));
        assert_eq!(table.cell(2, 0), None);
    }

    #[test]
    fn header_names_trimmed() {
        let csv_data = " Player Name , Velocity \nA,90";
        let table = RawTable::from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.column_index("Player Name"), Some(0));
        assert_eq!(table.column_index("Velocity"), Some(1));
    }

    #[test]
    fn short_rows_padded_long_rows_truncated() {
        let csv_data = "\
a,b,c
1
1,2,3,4";

        let table = RawTable::from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 2), Some(""));
        assert_eq!(table.cell(1, 2), Some("3"));
        assert_eq!(table.cell(1, 3), None);
    }

    #[test]
    fn header_only_csv_is_empty() {
        let table = RawTable::from_reader("a,b,c".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers().len(), 3);
    }

    #[test]
    fn strip_non_ascii_removes_symbols() {
        assert_eq!(strip_non_ascii("Launch\u{00B0}Angle"), "LaunchAngle");
        assert_eq!(strip_non_ascii("\u{FEFF}Player Name"), "Player Name");
        assert_eq!(strip_non_ascii("plain"), "plain");
    }

    #[test]
    fn load_table_strips_bom_and_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFPlayer Name,Velocity\nJos\xE9 Ruiz,88\n")
            .unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.column_index("Player Name"), Some(0));
        assert_eq!(table.cell(0, 0), Some("Jos Ruiz"));
        assert_eq!(table.cell(0, 1), Some("88"));
    }

    #[test]
    fn load_table_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn write_csv_round_trips_cells() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["x, y".into(), "1".into()]],
        );
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let reread = RawTable::from_reader(buf.as_slice()).unwrap();
        assert_eq!(reread, table);
    }
}
