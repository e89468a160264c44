use std::fmt::{Display, Formatter};
use std::num::NonZero;

use itertools::Itertools;
use ndarray::{Array2, Zip};

use crate::candidate::Candidate;

/// A 1-based step label. Unlabelled cells hold no label at all, so no valid label can be mistaken for one.
pub type Label = NonZero<usize>;

/// Which solved block, if any, each cell belongs to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    pub(crate) labels: Array2<Option<Label>>,
}

impl Summary {
    /// A summary with every cell unlabelled.
    pub fn unset(dims: (usize, usize)) -> Self {
        Self { labels: Array2::from_elem(dims, None) }
    }

    /// Label the display cells of each of `selected`, in order, with 1, 2, 3, and so on.
    ///
    /// Where display cells of two blocks meet on a zero cell, the later label is kept.
    pub fn assemble(dims: (usize, usize), candidates: &[Candidate], selected: &[usize]) -> Self {
        let mut summary = Self::unset(dims);
        for (step, index) in selected.iter().enumerate() {
            summary.mark(&candidates[*index].display, Label::MIN.saturating_add(step));
        }

        summary
    }

    pub(crate) fn mark(&mut self, mask: &Array2<bool>, label: Label) {
        Zip::from(&mut self.labels)
            .and(mask)
            .for_each(|cell, &hit| if hit { *cell = Some(label) });
    }

    /// The label at `(row, col)`; `None` when out of bounds or unlabelled.
    pub fn get(&self, row: usize, col: usize) -> Option<Label> {
        self.labels.get((row, col)).copied().flatten()
    }

    /// The underlying array of labels.
    pub fn labels(&self) -> &Array2<Option<Label>> {
        &self.labels
    }

    /// Mask of every labelled cell.
    pub fn labelled(&self) -> Array2<bool> {
        self.labels.map(Option::is_some)
    }

    /// Whether nothing was labelled, which ends greedy solving.
    pub fn is_unset(&self) -> bool {
        self.labels.iter().all(Option::is_none)
    }

    /// Highest label present.
    pub fn max_label(&self) -> Option<Label> {
        self.labels.iter().flatten().copied().max()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.labels.rows() {
            writeln!(f, "{}", row.iter()
                .map(|cell| cell.map_or_else(|| ".".to_string(), |label| label.to_string()))
                .join(","))?;
        }

        Ok(())
    }
}
