//! Error types for table loading and aggregation.
//!
//! Application-level flow uses `anyhow`; the aggregation layer reports
//! typed errors so callers (and tests) can tell a schema problem from a
//! domain problem.

use thiserror::Error;

/// Errors raised while validating, filtering, or aggregating a run table.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A required column (or column pattern) is absent from the table header.
    #[error("schema mismatch: missing column(s) {missing:?} for method '{method}'")]
    SchemaMismatch { method: String, missing: Vec<String> },

    /// The table carries no termination-status column for any known method.
    #[error("schema mismatch: no '{prefix}_<method>' columns found in table")]
    NoTerminationColumns { prefix: String },

    /// No usable method columns remained after schema validation.
    #[error("schema mismatch: no method has a complete set of columns")]
    NoMethods,

    /// The requested baseline is not part of the validated schema.
    #[error("baseline method '{0}' is not present in the table schema")]
    UnknownBaseline(String),

    /// A named column does not exist in the table.
    #[error("column '{0}' not found in table")]
    UnknownColumn(String),

    /// A cell in a numeric column could not be parsed.
    #[error("malformed value '{value}' in column '{column}' at row {row}")]
    MalformedValue {
        column: String,
        row: usize,
        value: String,
    },

    /// A shifted value is not strictly positive, so its logarithm is undefined.
    #[error("domain error: value {value} with shift {shift} is not strictly positive")]
    NonPositiveShifted { value: f64, shift: f64 },

    /// A mean was requested over zero values.
    #[error("cannot compute {statistic} over an empty input")]
    EmptyInput { statistic: &'static str },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for aggregation results.
pub type StatsResult<T> = std::result::Result<T, StatsError>;
