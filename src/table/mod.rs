//! Run table loading and column access.
//!
//! A run table is a CSV file whose rows are solver runs on benchmark
//! instances. Cells stay as text until a numeric column is requested.

pub mod schema;

pub use schema::{Schema, ValidatedSchema};

use crate::error::{StatsError, StatsResult};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// An in-memory run table: a header plus rows aligned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RunTable {
    /// Build a table from a header and rows.
    ///
    /// Rows shorter than the header are padded with empty cells so that
    /// every column lookup stays in bounds.
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

    /// Load a table from a CSV file on disk.
    pub fn from_path(path: &Path) -> StatsResult<Self> {
        debug!("Reading run table: {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a table from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> StatsResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!("Loaded {} rows x {} columns", rows.len(), headers.len());
        Ok(Self::new(headers, rows))
    }

    /// Column names in header order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Positions of every `<prefix>_<suffix>` column with a non-empty suffix.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                h.strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .is_some_and(|suffix| !suffix.is_empty())
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Borrow one column as text.
    pub fn text_column(&self, name: &str) -> StatsResult<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parse one column as finite, non-negative numbers.
    ///
    /// Row numbers in errors are 1-based data rows (the header is not counted).
    pub fn numeric_column(&self, name: &str) -> StatsResult<Vec<f64>> {
        self.text_column(name)?
            .into_iter()
            .enumerate()
            .map(|(i, cell)| match cell.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
                _ => Err(StatsError::MalformedValue {
                    column: name.to_string(),
                    row: i + 1,
                    value: cell.to_string(),
                }),
            })
            .collect()
    }

    /// A new table holding only the rows for which `keep` returns true.
    ///
    /// The predicate receives the row's cells in header order.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        Self {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|row| keep(row.as_slice())).cloned().collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Three instances, methods A and B, all solved.
    pub(crate) const SMALL_TABLE: &str = "\
instance_name,termination_string_A,iteration_count_A,solve_time_sec_A,termination_string_B,iteration_count_B,solve_time_sec_B
afiro,OPTIMAL,5,0.5,OPTIMAL,5,0.4
blend,OPTIMAL,10,1.0,OPTIMAL,8,0.9
sc50a,OPTIMAL,15,2.0,OPTIMAL,20,2.5
";

    pub(crate) fn small_table() -> RunTable {
        RunTable::from_reader(SMALL_TABLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader_reads_header_and_rows() {
        let table = small_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers().len(), 7);
        assert_eq!(table.column_index("iteration_count_B"), Some(5));
        assert!(!table.has_column("iteration_count_C"));
    }

    #[test]
    fn test_columns_with_prefix() {
        let csv = "instance_name,termination_string_A,termination_string_,iteration_count_A,termination_stringX,termination_string_B\n";
        let table = RunTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.columns_with_prefix("termination_string"), vec![1, 5]);
        assert!(table.columns_with_prefix("solve_time_sec").is_empty());
    }

    #[test]
    fn test_numeric_column() {
        let table = small_table();
        assert_eq!(
            table.numeric_column("iteration_count_A").unwrap(),
            vec![5.0, 10.0, 15.0]
        );
        assert_eq!(
            table.numeric_column("solve_time_sec_B").unwrap(),
            vec![0.4, 0.9, 2.5]
        );
    }

    #[test]
    fn test_numeric_column_rejects_malformed_cell() {
        let csv = "instance_name,iteration_count_A\nafiro,12\nblend,n/a\n";
        let table = RunTable::from_reader(csv.as_bytes()).unwrap();

        match table.numeric_column("iteration_count_A") {
            Err(StatsError::MalformedValue { column, row, value }) => {
                assert_eq!(column, "iteration_count_A");
                assert_eq!(row, 2);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected malformed value error, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_column_rejects_negative() {
        let csv = "instance_name,solve_time_sec_A\nafiro,-1.0\n";
        let table = RunTable::from_reader(csv.as_bytes()).unwrap();
        assert!(table.numeric_column("solve_time_sec_A").is_err());
    }

    #[test]
    fn test_unknown_column() {
        let table = small_table();
        assert!(matches!(
            table.text_column("missing"),
            Err(StatsError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_filter_rows_keeps_header() {
        let table = small_table();
        let idx = table.column_index("iteration_count_B").unwrap();
        let filtered = table.filter_rows(|row| row[idx] != "8");

        assert_eq!(filtered.headers(), table.headers());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let csv = "a,b\n1,2\n3\n";
        assert!(matches!(
            RunTable::from_reader(csv.as_bytes()),
            Err(StatsError::Csv(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("runs.csv");
        std::fs::write(&path, SMALL_TABLE).unwrap();

        let table = RunTable::from_path(&path).unwrap();
        assert_eq!(table, small_table());
    }
}
