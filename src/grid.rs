use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use itertools::Itertools;
use ndarray::{Array2, Zip};

use crate::error::{Result, SolveError};

/// A single cell value. Cells are never negative.
pub type Value = u32;

/// The integer matrix being solved.
///
/// Cells which have already been claimed by a solved block are zero; zero cells are never claimed again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    pub(crate) cells: Array2<Value>,
}

impl Grid {
    /// Wrap an existing array, indexed `(row, col)`.
    pub fn new(cells: Array2<Value>) -> Self {
        Self { cells }
    }

    /// Build a grid from a flat row-major list of values.
    ///
    /// Fails with [`SolveError::Shape`] unless exactly `rows * cols` values are given.
    pub fn from_values(rows: usize, cols: usize, values: Vec<Value>) -> Result<Self> {
        let got = values.len();
        Array2::from_shape_vec((rows, cols), values)
            .map(Self::new)
            .map_err(|_| SolveError::Shape { rows, cols, expected: rows * cols, got })
    }

    /// Read a comma-separated matrix of `rows * cols` non-negative integers.
    ///
    /// Values are taken in reading order regardless of how they are split across lines, the same way a flat
    /// list is reshaped; blank lines and whitespace around values are ignored.
    pub fn read_csv<R: Read>(reader: R, rows: usize, cols: usize) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut values = Vec::with_capacity(rows * cols);
        for record in csv_reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let line = record.position().map_or(0, |p| p.line());
            for (field, text) in record.iter().enumerate() {
                let value = text.parse::<Value>().map_err(|source| SolveError::Parse {
                    line,
                    field: field + 1,
                    value: text.to_string(),
                    source,
                })?;
                values.push(value);
            }
        }

        Self::from_values(rows, cols, values)
    }

    /// Open `path` and read it with [`Self::read_csv`].
    pub fn from_path(path: impl AsRef<Path>, rows: usize, cols: usize) -> Result<Self> {
        Self::read_csv(File::open(path)?, rows, cols)
    }

    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// The value at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Value> {
        self.cells.get((row, col)).copied()
    }

    /// Total of the cells selected by `mask`.
    pub fn sum_over(&self, mask: &Array2<bool>) -> u64 {
        Zip::from(&self.cells)
            .and(mask)
            .fold(0, |acc, &value, &hit| if hit { acc + u64::from(value) } else { acc })
    }

    /// Number of cells not yet cleared.
    pub fn nonzero_count(&self) -> usize {
        self.cells.iter().filter(|v| **v != 0).count()
    }

    /// Number of cleared cells; reported as the score of a step.
    pub fn zero_count(&self) -> usize {
        self.cells.len() - self.nonzero_count()
    }

    /// Zero every cell selected by `mask`.
    pub fn clear(&mut self, mask: &Array2<bool>) {
        Zip::from(&mut self.cells)
            .and(mask)
            .for_each(|value, &hit| if hit { *value = 0 });
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            writeln!(f, "{}", row.iter().join(","))?;
        }

        Ok(())
    }
}
