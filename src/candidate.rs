//! Finding every block of cells that sums to the target.

use std::collections::HashSet;

use itertools::Itertools;
use log::trace;
use ndarray::{s, Array2, Axis, Zip};

use crate::grid::Grid;
use crate::rect::Rect;

/// A block whose cells sum to the target, as found on one grid snapshot.
///
/// Candidates are identified by [`occupancy`](Self::occupancy) alone; the rectangle is only the first one
/// found to produce that set of cells.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub(crate) rect: Rect,
    pub(crate) occupancy: Array2<bool>,
    pub(crate) display: Array2<bool>,
}

impl Candidate {
    /// The rectangle that first produced this candidate.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The non-zero cells this candidate claims.
    pub fn occupancy(&self) -> &Array2<bool> {
        &self.occupancy
    }

    /// The rectangle trimmed to the bounding box of [`Self::occupancy`]; used for labelling only.
    pub fn display(&self) -> &Array2<bool> {
        &self.display
    }

    /// Number of cells claimed.
    pub fn cell_count(&self) -> usize {
        self.occupancy.iter().filter(|c| **c).count()
    }

    /// Whether the two candidates claim at least one common cell.
    pub fn overlaps(&self, other: &Candidate) -> bool {
        self.occupancy.iter()
            .zip(other.occupancy.iter())
            .any(|(a, b)| *a && *b)
    }
}

/// Inclusive-exclusive 2D prefix sums so each rectangle total is four lookups.
struct SummedArea {
    table: Array2<u64>,
}

impl SummedArea {
    fn new(grid: &Grid) -> Self {
        let (rows, cols) = grid.dims();
        let mut table = Array2::zeros((rows + 1, cols + 1));
        for ((row, col), value) in grid.cells.indexed_iter() {
            table[(row + 1, col + 1)] = u64::from(*value)
                + table[(row, col + 1)]
                + table[(row + 1, col)]
                - table[(row, col)];
        }

        Self { table }
    }

    fn sum(&self, rect: Rect) -> u64 {
        let (top, left, bottom, right) = (rect.row_start, rect.col_start, rect.row_end(), rect.col_end());
        self.table[(bottom, right)] + self.table[(top, left)] - self.table[(top, right)] - self.table[(bottom, left)]
    }
}

/// Find every distinct set of cells some rectangle of `grid` covers with a total of exactly `target`.
///
/// Rectangles are visited by top row, left column, height, then width, and zero cells inside a rectangle
/// are not claimed. Later rectangles claiming the same cells as an earlier one are dropped, as are
/// rectangles claiming nothing at all.
pub fn enumerate(grid: &Grid, target: u64) -> Vec<Candidate> {
    let dims = grid.dims();
    let sums = SummedArea::new(grid);
    let nonzero = grid.cells.map(|v| *v != 0);

    let mut seen: HashSet<Array2<bool>> = HashSet::new();
    let mut candidates = Vec::new();

    for rect in Rect::all_within(dims).filter(|rect| sums.sum(*rect) == target) {
        let raw = rect.to_mask(dims);
        let occupancy = Zip::from(&raw).and(&nonzero).map_collect(|a, b| *a && *b);
        if !occupancy.iter().any(|c| *c) || !seen.insert(occupancy.clone()) {
            continue;
        }

        trace!("candidate {} from {}", candidates.len(), rect);
        let display = trim_to_occupied(&raw, &occupancy);
        candidates.push(Candidate { rect, occupancy, display });
    }

    candidates
}

/// Cut `mask` down to the tightest block of rows and columns containing a `true` cell of `occupied`.
///
/// Leading and trailing rows and columns with nothing occupied are cleared. If nothing at all is occupied
/// the result is entirely `false`.
pub(crate) fn trim_to_occupied(mask: &Array2<bool>, occupied: &Array2<bool>) -> Array2<bool> {
    let used_rows = occupied.axis_iter(Axis(0)).positions(|row| row.iter().any(|c| *c)).collect_vec();
    let used_cols = occupied.axis_iter(Axis(1)).positions(|col| col.iter().any(|c| *c)).collect_vec();

    let mut trimmed = Array2::from_elem(mask.raw_dim(), false);
    let (Some(&top), Some(&bottom), Some(&left), Some(&right)) =
        (used_rows.first(), used_rows.last(), used_cols.first(), used_cols.last())
    else {
        return trimmed;
    };

    trimmed.slice_mut(s![top..=bottom, left..=right])
        .assign(&mask.slice(s![top..=bottom, left..=right]));
    trimmed
}
