//! Splitting candidates into overlap groups.

use std::collections::BTreeMap;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use petgraph::unionfind::UnionFind;

use crate::candidate::Candidate;

/// Candidates linked by shared cells. Nodes are candidate indices; an edge means the two claim a common cell.
pub(crate) type ConflictGraph = UnGraphMap<usize, ()>;

/// The candidates of one round split into those competing for cells and those that are not.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Grouping {
    /// Candidates overlapping nothing, in index order.
    pub conflict_free: Vec<usize>,
    /// Connected components of the overlap relation, ordered by smallest member, members ascending.
    pub groups: Vec<Vec<usize>>,
}

impl Grouping {
    /// Total number of candidate indices held, counting every group member once.
    pub fn len(&self) -> usize {
        self.conflict_free.len() + self.groups.iter().map(Vec::len).sum::<usize>()
    }

    /// Whether no candidates were grouped at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn conflict_graph(candidates: &[Candidate]) -> ConflictGraph {
    let mut graph = UnGraphMap::with_capacity(candidates.len(), candidates.len());
    for index in 0..candidates.len() {
        graph.add_node(index);
    }

    for ((i, a), (j, b)) in candidates.iter().enumerate().tuple_combinations() {
        if a.overlaps(b) {
            graph.add_edge(i, j, ());
        }
    }

    graph
}

/// Split `candidates` into conflict-free ones and groups of transitively overlapping ones.
///
/// Every candidate together with its overlap partners forms a raw group; raw groups sharing a member are
/// unioned until none do, so each group is a full connected component no matter the visiting order.
pub fn group(candidates: &[Candidate]) -> Grouping {
    let graph = conflict_graph(candidates);

    let mut grouping = Grouping::default();
    let mut components = UnionFind::<usize>::new(candidates.len());

    for index in 0..candidates.len() {
        let mut partners = graph.neighbors(index).peekable();
        if partners.peek().is_none() {
            grouping.conflict_free.push(index);
            continue;
        }

        for partner in partners {
            components.union(index, partner);
        }
    }

    // BTreeMap keyed by representative, then reordered by smallest member
    let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for index in (0..candidates.len()).filter(|i| graph.neighbors(*i).next().is_some()) {
        by_root.entry(components.find(index)).or_default().push(index);
    }

    grouping.groups = by_root.into_values()
        .sorted_by_key(|members| members[0])
        .collect_vec();

    grouping
}
