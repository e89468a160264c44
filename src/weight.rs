use ndarray::{Array2, Zip};

/// How much each covered cell is worth when choosing between overlapping blocks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WeightScheme {
    /// Every cell is worth 1.
    #[default]
    Uniform,
    /// Cells within `thickness` cells of any grid edge are worth `weight`; all others are worth 1.
    ///
    /// Clearing the rim first tends to leave a compact residual in the middle of the grid.
    Border {
        /// Width of the weighted rim, in cells.
        thickness: usize,
        /// Weight of a rim cell.
        weight: u32,
    },
}

impl WeightScheme {
    /// Materialize the per-cell weights for a grid of `dims`.
    pub fn weights(&self, dims: (usize, usize)) -> Array2<u32> {
        match *self {
            Self::Uniform => Array2::ones(dims),
            Self::Border { thickness, weight } => {
                let (rows, cols) = dims;
                Array2::from_shape_fn(dims, |(row, col)| {
                    let depth = row.min(rows - 1 - row).min(col).min(cols - 1 - col);
                    if depth < thickness { weight } else { 1 }
                })
            }
        }
    }
}

/// Weighted number of cells selected by `mask`.
pub(crate) fn coverage(weights: &Array2<u32>, mask: &Array2<bool>) -> u64 {
    Zip::from(weights)
        .and(mask)
        .fold(0, |acc, &weight, &hit| if hit { acc + u64::from(weight) } else { acc })
}
