use itertools::Itertools;

use crate::grid::Grid;
use crate::summary::Summary;

/// Lay out `grid` as text under `title`, with the labels of `summary` beside each row.
///
/// Cleared cells print as `.`, as do unlabelled cells. A summary shaped differently from `grid` cannot be
/// lined up with it and is left out.
pub fn render(grid: &Grid, summary: Option<&Summary>, title: &str) -> String {
    let summary = summary.filter(|summary| summary.labels.dim() == grid.dims());

    let value_width = grid.cells.iter().map(|v| v.to_string().len()).max().unwrap_or(1);
    let label_width = summary
        .and_then(Summary::max_label)
        .map_or(1, |label| label.to_string().len());

    let rows = grid.cells.rows().into_iter().enumerate().map(|(row, values)| {
        let shown = values.iter()
            .map(|v| if *v == 0 { format!("{:>value_width$}", ".") } else { format!("{v:>value_width$}") })
            .join(" ");

        match summary {
            Some(summary) => {
                let labels = summary.labels.row(row).iter()
                    .map(|cell| match cell {
                        Some(label) => format!("{label:>label_width$}"),
                        None => format!("{:>label_width$}", "."),
                    })
                    .join(" ");
                format!("{shown} | {labels}\n")
            }
            None => format!("{shown}\n"),
        }
    });

    format!("{title}\n{}", rows.collect::<String>())
}
