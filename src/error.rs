//! Errors raised while loading grids or configuring solvers.

use thiserror::Error;

/// Shorthand for results carrying a [`SolveError`].
pub type Result<T> = std::result::Result<T, SolveError>;

/// Reasons loading a grid or configuring a solver may fail.
///
/// Running out of candidates is never an error; it is how greedy solving terminates.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The input file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the input.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A field was not a non-negative integer.
    #[error("invalid value at line {line}, field {field}: {value:?}")]
    Parse {
        /// 1-based input line.
        line: u64,
        /// 1-based field within that line.
        field: usize,
        /// The offending text.
        value: String,
        /// Why the integer parse failed.
        #[source]
        source: std::num::ParseIntError,
    },

    /// The input held the wrong number of values for the configured dimensions.
    #[error("expected {expected} values for a {rows}x{cols} grid, got {got}")]
    Shape {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        cols: usize,
        /// `rows * cols`.
        expected: usize,
        /// Values actually present.
        got: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
