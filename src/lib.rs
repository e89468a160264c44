#![warn(missing_docs)]

//! # `sumblock`
//!
//! A solver for target-sum rectangle puzzles: given a grid of non-negative integers, repeatedly clear
//! axis-aligned blocks whose cells add up to a fixed target until no such block is left.
//! Load a [`Grid`], build a [`Solver`] from a [`SolverConfig`], then drive it with
//! [`Solver::greedy`] or [`Solver::lookahead`].
//!
//! # Internals
//! Each greedy round runs four stages over one snapshot of the grid:
//!
//! 1. Every rectangle is checked against the target with a summed-area table. A hit claims the non-zero
//!    cells inside it; rectangles claiming the same cells as an earlier hit are dropped, so candidates are
//!    unique by the cells they take, not by their position or shape.
//! 2. Candidates sharing a cell are linked in an undirected conflict graph. Those with no links are taken
//!    outright; the rest are unioned into connected components, the overlap groups.
//! 3. Within each group every subset is tried as a bitmask, keeping the heaviest one whose members are
//!    pairwise disjoint. This is maximum-weight independent set on the group's conflict graph, so it is
//!    exponential; groups over [`SolverConfig::max_size`] are sampled down at random with a seeded source,
//!    and a warning is logged since the result may no longer be optimal.
//! 4. Chosen candidates are labelled 1, 2, 3, ... into a [`Summary`] and their cells cleared.
//!
//! Lookahead solving instead removes one block at a time, scoring each choice by what can still be
//! cleared some tiers deeper, and finishing each line of play with greedy rounds.

pub use config::{Mode, SolverConfig};
pub use candidate::Candidate;
pub use conflict::Grouping;
pub use error::{Result, SolveError};
pub use grid::{Grid, Value};
pub use rect::Rect;
pub use render::render;
pub use solver::{GreedyRounds, LookaheadSolution, Move, Round, Solution, Solver};
pub use summary::{Label, Summary};
pub use weight::WeightScheme;

pub mod candidate;
pub mod config;
pub mod conflict;
pub mod error;
pub(crate) mod grid;
pub(crate) mod rect;
pub(crate) mod render;
pub mod select;
pub(crate) mod solver;
pub(crate) mod summary;
mod tests;
pub(crate) mod weight;
