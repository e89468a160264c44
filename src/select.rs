//! Choosing disjoint candidates within an overlap group.

use itertools::Itertools;
use log::{debug, warn};
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::candidate::Candidate;
use crate::weight::coverage;

/// Largest group the bitmask search can represent.
pub const MAX_SEARCHABLE: usize = u64::BITS as usize - 1;

/// Picks, within one overlap group, the heaviest set of candidates that share no cell.
///
/// The search is exhaustive over every subset, so it is exponential in the group size; groups larger than
/// `max_size` are randomly sampled down first, which can miss the true optimum.
pub struct GroupSelector<'a> {
    candidates: &'a [Candidate],
    weights: &'a Array2<u32>,
    max_size: usize,
}

impl<'a> GroupSelector<'a> {
    /// `max_size` is clamped to [`MAX_SEARCHABLE`].
    pub fn new(candidates: &'a [Candidate], weights: &'a Array2<u32>, max_size: usize) -> Self {
        Self { candidates, weights, max_size: max_size.min(MAX_SEARCHABLE) }
    }

    /// Weighted number of cells claimed by candidate `index`.
    pub fn yield_of(&self, index: usize) -> u64 {
        coverage(self.weights, &self.candidates[index].occupancy)
    }

    /// Select from `group`, returning the chosen candidate indices.
    ///
    /// Bit `k` of a subset refers to the `k`-th member of the (possibly sampled) group, and subsets are
    /// tried in ascending order; among equally heavy subsets the first one tried wins.
    /// An empty result means no subset beats zero.
    pub fn select<R: Rng>(&self, group: &[usize], rng: &mut R) -> Vec<usize> {
        let mut members = group.to_vec();
        if members.len() > self.max_size {
            warn!(
                "overlap group of {} candidates exceeds the cap of {}; searching a random sample, the result may not be optimal",
                members.len(),
                self.max_size,
            );
            members.shuffle(rng);
            members.truncate(self.max_size);
        }

        let yields = members.iter().map(|index| self.yield_of(*index)).collect_vec();
        // clashes[k] has bit j set when members k and j share a cell
        let clashes = members.iter()
            .map(|a| members.iter()
                .enumerate()
                .filter(|(_, b)| *b != a && self.candidates[*a].overlaps(&self.candidates[**b]))
                .fold(0u64, |bits, (j, _)| bits | 1 << j))
            .collect_vec();

        let (mut best_subset, mut best_yield) = (0u64, 0u64);
        for subset in 1..(1u64 << members.len()) {
            if bits_of(subset).any(|k| clashes[k] & subset != 0) {
                continue;
            }

            let total: u64 = bits_of(subset).map(|k| yields[k]).sum();
            if total > best_yield {
                (best_subset, best_yield) = (subset, total);
            }
        }

        debug!("group of {} settled on {} candidates worth {}", members.len(), best_subset.count_ones(), best_yield);
        bits_of(best_subset).map(|k| members[k]).collect()
    }
}

/// Positions of the set bits of `bits`, lowest first.
fn bits_of(bits: u64) -> impl Iterator<Item = usize> {
    (0..u64::BITS as usize).filter(move |k| bits >> k & 1 == 1)
}
