//! Solver options and their reference defaults.

use strum::{Display, EnumString, VariantArray};

use crate::error::{Result, SolveError};
use crate::select::MAX_SEARCHABLE;
use crate::weight::WeightScheme;

/// Rows in the reference puzzle.
pub const DEFAULT_HEIGHT: usize = 16;
/// Columns in the reference puzzle.
pub const DEFAULT_WIDTH: usize = 10;
/// Sum every block must reach.
pub const DEFAULT_TARGET_SUM: u64 = 10;
/// Largest overlap group searched exhaustively.
pub const DEFAULT_MAX_SIZE: usize = 15;
/// Seed for sampling oversized overlap groups.
pub const DEFAULT_SEED: u64 = 0;

/// How the driver loop chooses blocks.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, VariantArray)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Solve whole rounds at a time, clearing every selected block, until nothing is left.
    #[default]
    Greedy,
    /// Clear one block at a time, picking the one with the best score some tiers ahead.
    Lookahead,
}

/// Every recognized solver option. [`Default`] gives the reference puzzle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// Grid rows.
    pub height: usize,
    /// Grid columns.
    pub width: usize,
    /// Sum every block must reach; must be positive.
    pub target_sum: u64,
    /// Largest overlap group searched exhaustively, between 1 and [`MAX_SEARCHABLE`].
    pub max_size: usize,
    /// Cell weights used to compare selections.
    pub weights: WeightScheme,
    /// Greedy or lookahead driving.
    pub mode: Mode,
    /// Tiers of lookahead; 0 scores each move by greedy-solving what it leaves.
    pub tiers: usize,
    /// Cache lookahead scores by residual grid.
    pub memoize: bool,
    /// Seed for sampling oversized overlap groups.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            target_sum: DEFAULT_TARGET_SUM,
            max_size: DEFAULT_MAX_SIZE,
            weights: WeightScheme::default(),
            mode: Mode::default(),
            tiers: 0,
            memoize: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl SolverConfig {
    /// Same as [`Default::default`] but with other dimensions.
    pub fn with_dims(height: usize, width: usize) -> Self {
        Self { height, width, ..Self::default() }
    }

    /// `(height, width)`
    pub fn dims(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Check every option is in range.
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(SolveError::InvalidConfig(format!(
                "grid must have at least one row and column, got {}x{}",
                self.height, self.width
            )));
        }

        if self.target_sum == 0 {
            return Err(SolveError::InvalidConfig("target sum must be positive".to_string()));
        }

        if !(1..=MAX_SEARCHABLE).contains(&self.max_size) {
            return Err(SolveError::InvalidConfig(format!(
                "max group size must be between 1 and {MAX_SEARCHABLE}, got {}",
                self.max_size
            )));
        }

        if let WeightScheme::Border { weight: 0, .. } = self.weights {
            return Err(SolveError::InvalidConfig("border weight must be positive".to_string()));
        }

        Ok(())
    }
}
