use std::collections::HashMap;

use log::debug;
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::candidate::{enumerate, Candidate};
use crate::config::{Mode, SolverConfig};
use crate::conflict::{group, Grouping};
use crate::error::{Result, SolveError};
use crate::grid::Grid;
use crate::select::GroupSelector;
use crate::summary::{Label, Summary};
use crate::weight::coverage;

/// Everything one greedy round found and decided.
#[derive(Clone, Debug)]
pub struct Round {
    /// 1-based round number.
    pub step: usize,
    /// Every distinct block summing to the target.
    pub candidates: Vec<Candidate>,
    /// How the candidates compete for cells.
    pub grouping: Grouping,
    /// Chosen candidate indices in label order: conflict-free ones, then each group's picks.
    pub selected: Vec<usize>,
    /// Labels of the chosen blocks.
    pub summary: Summary,
    /// The grid with every labelled cell cleared.
    pub residual: Grid,
    /// Weighted number of cells cleared.
    pub coverage: u64,
}

impl Round {
    /// Cleared cells after this round.
    pub fn score(&self) -> usize {
        self.residual.zero_count()
    }
}

/// One block removed by lookahead search.
#[derive(Clone, Debug)]
pub struct Move {
    /// The block removed.
    pub candidate: Candidate,
    /// Weighted cells it cleared by itself.
    pub coverage: u64,
    /// Its coverage plus the best achievable afterwards within the tier budget.
    pub score: u64,
}

/// The outcome of lookahead solving: every move in order, labelled together.
#[derive(Clone, Debug)]
pub struct LookaheadSolution {
    /// Moves in the order they were made; move `k` carries label `k + 1`.
    pub moves: Vec<Move>,
    /// Labels of every move.
    pub summary: Summary,
    /// What was left.
    pub residual: Grid,
}

impl LookaheadSolution {
    /// Weighted cells cleared over all moves.
    pub fn coverage(&self) -> u64 {
        self.moves.iter().map(|m| m.coverage).sum()
    }
}

/// The result of [`Solver::solve`], shaped by the configured [`Mode`].
#[derive(Clone, Debug)]
pub enum Solution {
    /// Every greedy round in order; the last one labels nothing.
    Greedy(Vec<Round>),
    /// The moves of lookahead search.
    Lookahead(LookaheadSolution),
}

impl Solution {
    /// Weighted cells cleared in total.
    pub fn coverage(&self) -> u64 {
        match self {
            Self::Greedy(rounds) => rounds.iter().map(|round| round.coverage).sum(),
            Self::Lookahead(solution) => solution.coverage(),
        }
    }

    /// What was left once solving stopped.
    pub fn residual(&self) -> Option<&Grid> {
        match self {
            Self::Greedy(rounds) => rounds.last().map(|round| &round.residual),
            Self::Lookahead(solution) => Some(&solution.residual),
        }
    }
}

/// Drives candidate enumeration, grouping, selection and labelling over a grid.
///
/// A solver holds its own seeded random source for sampling oversized groups, so two solvers with the same
/// configuration produce the same results on the same grids.
pub struct Solver {
    config: SolverConfig,
    weights: Array2<u32>,
    rng: ChaCha8Rng,
    memo: HashMap<(Grid, usize), u64>,
}

impl Solver {
    /// Validate `config` and set up a solver for it.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            weights: config.weights.weights(config.dims()),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            memo: HashMap::new(),
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn check_dims(&self, grid: &Grid) -> Result<()> {
        let (rows, cols) = self.config.dims();
        if grid.dims() != (rows, cols) {
            return Err(SolveError::Shape { rows, cols, expected: rows * cols, got: grid.cells.len() });
        }

        Ok(())
    }

    /// Run a single round on `grid`, which is left untouched.
    pub fn round(&mut self, grid: &Grid) -> Result<Round> {
        self.check_dims(grid)?;
        Ok(self.round_numbered(grid, 1))
    }

    fn round_numbered(&mut self, grid: &Grid, step: usize) -> Round {
        let candidates = enumerate(grid, self.config.target_sum);
        let grouping = group(&candidates);
        let selector = GroupSelector::new(&candidates, &self.weights, self.config.max_size);

        let mut selected = grouping.conflict_free.clone();
        for members in &grouping.groups {
            selected.extend(selector.select(members, &mut self.rng));
        }
        let covered: u64 = selected.iter().map(|index| selector.yield_of(*index)).sum();

        let summary = Summary::assemble(grid.dims(), &candidates, &selected);
        let mut residual = grid.clone();
        residual.clear(&summary.labelled());

        debug!(
            "round {}: {} candidates, {} conflict-free, {} groups, {} selected",
            step,
            candidates.len(),
            grouping.conflict_free.len(),
            grouping.groups.len(),
            selected.len(),
        );

        Round { step, candidates, grouping, selected, summary, residual, coverage: covered }
    }

    /// Solve `grid` to completion the way [`SolverConfig::mode`] asks.
    pub fn solve(&mut self, grid: Grid) -> Result<Solution> {
        match self.config.mode {
            Mode::Greedy => Ok(Solution::Greedy(self.greedy(grid)?.collect())),
            Mode::Lookahead => self.lookahead(grid).map(Solution::Lookahead),
        }
    }

    /// Solve `grid` round by round, yielding each round as it completes.
    ///
    /// The last round yielded is the first one labelling nothing; its residual is the final grid.
    pub fn greedy(&mut self, grid: Grid) -> Result<GreedyRounds<'_>> {
        self.check_dims(&grid)?;
        Ok(GreedyRounds { solver: self, grid: Some(grid), step: 0 })
    }

    fn greedy_coverage(&mut self, grid: Grid) -> u64 {
        GreedyRounds { solver: self, grid: Some(grid), step: 0 }
            .map(|round| round.coverage)
            .sum()
    }

    /// Best weighted coverage reachable from `grid` within `tiers` more single-block removals, finishing greedily.
    fn best(&mut self, grid: &Grid, tiers: usize) -> u64 {
        if self.config.memoize {
            if let Some(score) = self.memo.get(&(grid.clone(), tiers)) {
                return *score;
            }
        }

        let score = if tiers == 0 {
            self.greedy_coverage(grid.clone())
        } else {
            enumerate(grid, self.config.target_sum)
                .iter()
                .map(|candidate| self.move_score(grid, candidate, tiers - 1))
                .max()
                .unwrap_or(0)
        };

        if self.config.memoize {
            self.memo.insert((grid.clone(), tiers), score);
        }
        score
    }

    fn move_score(&mut self, grid: &Grid, candidate: &Candidate, tiers: usize) -> u64 {
        let mut residual = grid.clone();
        residual.clear(&candidate.occupancy);
        coverage(&self.weights, &candidate.occupancy) + self.best(&residual, tiers)
    }

    /// Score every move `tiers` deep, returning the best candidate index and its score.
    ///
    /// Ties go to the earliest candidate; `None` when there are no candidates.
    pub(crate) fn best_move(&mut self, grid: &Grid, candidates: &[Candidate], tiers: usize) -> Option<(usize, u64)> {
        let mut best: Option<(usize, u64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = self.move_score(grid, candidate, tiers);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        best
    }

    /// Solve `grid` one block at a time, each time removing the block with the best lookahead score.
    ///
    /// Search is exhaustive over candidates at every tier, so the cost grows exponentially with
    /// [`SolverConfig::tiers`]; memoization only removes repeated residuals, and its cache lasts for one call.
    pub fn lookahead(&mut self, grid: Grid) -> Result<LookaheadSolution> {
        self.check_dims(&grid)?;
        self.memo.clear();
        let tiers = self.config.tiers;

        let mut summary = Summary::unset(grid.dims());
        let mut residual = grid;
        let mut moves: Vec<Move> = Vec::new();

        loop {
            let mut candidates = enumerate(&residual, self.config.target_sum);
            let Some((index, score)) = self.best_move(&residual, &candidates, tiers) else {
                break;
            };

            let candidate = candidates.swap_remove(index);
            let label = Label::MIN.saturating_add(moves.len());
            debug!("move {}: clearing {} for a score of {}", label, candidate.rect, score);

            summary.mark(&candidate.display, label);
            residual.clear(&candidate.occupancy);
            moves.push(Move {
                coverage: coverage(&self.weights, &candidate.occupancy),
                candidate,
                score,
            });
        }

        Ok(LookaheadSolution { moves, summary, residual })
    }
}

/// Iterator over greedy rounds, created by [`Solver::greedy`].
pub struct GreedyRounds<'a> {
    solver: &'a mut Solver,
    grid: Option<Grid>,
    step: usize,
}

impl Iterator for GreedyRounds<'_> {
    type Item = Round;

    fn next(&mut self) -> Option<Self::Item> {
        let grid = self.grid.take()?;
        self.step += 1;

        let round = self.solver.round_numbered(&grid, self.step);
        if !round.summary.is_unset() {
            self.grid = Some(round.residual.clone());
        }

        Some(round)
    }
}
