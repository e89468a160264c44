#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::str::FromStr;

    use itertools::Itertools;
    use ndarray::{array, Array2};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::candidate::{enumerate, trim_to_occupied};
    use crate::conflict::group;
    use crate::select::GroupSelector;
    use crate::{render, Grid, Mode, Rect, Solution, SolveError, Solver, SolverConfig, Summary, WeightScheme};

    fn grid(cells: Array2<u32>) -> Grid {
        Grid::new(cells)
    }

    fn solver_for(grid: &Grid) -> Solver {
        let (rows, cols) = grid.dims();
        Solver::new(SolverConfig::with_dims(rows, cols)).unwrap()
    }

    fn random_grid(seed: u64) -> Grid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        grid(Array2::from_shape_simple_fn((16, 10), || rng.gen_range(1..=9)))
    }

    fn labels(summary: &Summary) -> Array2<usize> {
        summary.labels().map(|cell| cell.map_or(0, |label| label.get()))
    }

    #[test]
    fn single_row_block() {
        let board = grid(array![[5, 5], [0, 0]]);

        let candidates = enumerate(&board, 10);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rect(), Rect::new(0, 1, 0, 2));
        assert_eq!(candidates[0].occupancy(), &array![[true, true], [false, false]]);

        let mut solver = solver_for(&board);
        let rounds = solver.greedy(board).unwrap().collect_vec();
        assert_eq!(rounds.len(), 2);

        assert_eq!(format!("{}", rounds[0].summary), "1,1
.,.
");
        assert_eq!(rounds[0].residual, grid(array![[0, 0], [0, 0]]));
        assert_eq!(rounds[0].score(), 4);

        assert!(rounds[1].candidates.is_empty());
        assert!(rounds[1].summary.is_unset());
    }

    #[test]
    fn disjoint_tens_labelled_in_order() {
        let board = grid(array![[10, 0, 0], [0, 0, 0], [0, 0, 10]]);
        let mut solver = solver_for(&board);
        let round = solver.round(&board).unwrap();

        assert_eq!(round.candidates.len(), 2);
        assert_eq!(round.grouping.conflict_free, vec![0, 1]);
        assert!(round.grouping.groups.is_empty());
        // the first rectangle claiming only the lower ten is wide, but its label is trimmed to the ten itself
        assert_eq!(round.candidates[1].rect(), Rect::new(0, 3, 1, 2));
        assert_eq!(labels(&round.summary), array![[1, 0, 0], [0, 0, 0], [0, 0, 2]]);
        assert_eq!(round.residual.nonzero_count(), 0);
    }

    #[test]
    fn larger_overlapping_block_wins() {
        let board = grid(array![[1, 1, 8, 2]]);
        let mut solver = solver_for(&board);
        let round = solver.round(&board).unwrap();

        assert_eq!(round.candidates.len(), 2);
        assert!(round.grouping.conflict_free.is_empty());
        assert_eq!(round.grouping.groups, vec![vec![0, 1]]);
        assert_eq!(round.selected, vec![0]);
        assert_eq!(round.coverage, 3);
        assert_eq!(labels(&round.summary), array![[1, 1, 1, 0]]);
        assert_eq!(round.residual, grid(array![[0, 0, 0, 2]]));
    }

    #[test]
    fn conflict_free_labelled_before_groups() {
        let board = grid(array![[1, 1, 8, 2, 0, 10]]);
        let mut solver = solver_for(&board);
        let round = solver.round(&board).unwrap();

        assert_eq!(round.candidates.len(), 3);
        assert_eq!(round.grouping.conflict_free, vec![2]);
        assert_eq!(round.grouping.groups, vec![vec![0, 1]]);
        assert_eq!(round.selected, vec![2, 0]);
        assert_eq!(round.summary.get(0, 5).map(|label| label.get()), Some(1));
        assert_eq!(round.summary.get(0, 4), None);
        assert_eq!(format!("{}", round.summary), "2,2,2,.,.,1\n");
    }

    #[test]
    fn border_weight_changes_winner() {
        let board = grid(array![
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [2, 8, 1, 1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);

        let candidates = enumerate(&board, 10);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].cell_count(), 2);
        assert_eq!(candidates[1].cell_count(), 3);

        let mut uniform = solver_for(&board);
        assert_eq!(uniform.round(&board).unwrap().selected, vec![1]);

        let mut bordered = Solver::new(SolverConfig {
            weights: WeightScheme::Border { thickness: 1, weight: 5 },
            ..SolverConfig::with_dims(5, 5)
        }).unwrap();
        let round = bordered.round(&board).unwrap();
        assert_eq!(round.selected, vec![0]);
        assert_eq!(round.coverage, 6);
    }

    #[test]
    fn border_weights_cover_rim() {
        let weights = WeightScheme::Border { thickness: 1, weight: 3 }.weights((4, 4));
        assert_eq!(weights, array![[3, 3, 3, 3], [3, 1, 1, 3], [3, 1, 1, 3], [3, 3, 3, 3]]);
        assert_eq!(WeightScheme::Uniform.weights((2, 3)), Array2::<u32>::ones((2, 3)));
    }

    #[test]
    fn no_block_terminates_immediately() {
        let board = grid(array![[1, 1], [1, 1]]);
        let mut solver = solver_for(&board);
        let rounds = solver.greedy(board.clone()).unwrap().collect_vec();

        assert_eq!(rounds.len(), 1);
        assert!(rounds[0].grouping.is_empty());
        assert!(rounds[0].summary.is_unset());
        assert_eq!(rounds[0].residual, board);
    }

    #[test]
    fn candidates_unique_and_on_target() {
        for seed in 0..4 {
            let board = random_grid(seed);
            let candidates = enumerate(&board, 10);
            assert!(!candidates.is_empty());

            for (a, b) in candidates.iter().tuple_combinations() {
                assert_ne!(a.occupancy(), b.occupancy());
            }

            for candidate in &candidates {
                assert_eq!(board.sum_over(candidate.occupancy()), 10);
                // the label never drops a claimed cell
                assert!(candidate.occupancy().iter().zip(candidate.display().iter()).all(|(o, d)| !*o || *d));
            }
        }
    }

    #[test]
    fn groups_partition_candidates() {
        let board = random_grid(7);
        let candidates = enumerate(&board, 10);
        let grouping = group(&candidates);

        let mut seen = grouping.conflict_free.iter()
            .chain(grouping.groups.iter().flatten())
            .copied()
            .collect_vec();
        assert_eq!(seen.len(), candidates.len());
        assert_eq!(grouping.len(), candidates.len());
        seen.sort_unstable();
        assert_eq!(seen, (0..candidates.len()).collect_vec());

        for index in &grouping.conflict_free {
            assert!(candidates.iter().enumerate().all(|(other, c)| other == *index || !c.overlaps(&candidates[*index])));
        }

        // nothing in one group overlaps anything in another
        for (a, b) in grouping.groups.iter().tuple_combinations() {
            for (i, j) in a.iter().cartesian_product(b.iter()) {
                assert!(!candidates[*i].overlaps(&candidates[*j]));
            }
        }
    }

    #[test]
    fn transitive_overlaps_form_one_group() {
        // pairs (0,1), (1,2), (2,3), (3,4) chain together through shared cells
        let board = grid(array![[5, 5, 5, 5, 5]]);
        let candidates = enumerate(&board, 10);
        assert_eq!(candidates.len(), 4);

        let grouping = group(&candidates);
        assert!(grouping.conflict_free.is_empty());
        assert_eq!(grouping.groups, vec![vec![0, 1, 2, 3]]);

        let weights = WeightScheme::Uniform.weights(board.dims());
        let selector = GroupSelector::new(&candidates, &weights, 15);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // {0, 2} and {0, 3} and {1, 3} all cover four cells; ascending bitmask order reaches {0, 2} first
        assert_eq!(selector.select(&grouping.groups[0], &mut rng), vec![0, 2]);
    }

    #[test]
    fn oversized_group_sampling_is_seeded() {
        let board = grid(array![[5, 5, 5, 5, 5, 5, 5, 5]]);
        let config = SolverConfig { max_size: 3, seed: 42, ..SolverConfig::with_dims(1, 8) };

        let first = Solver::new(config.clone()).unwrap().round(&board).unwrap();
        let second = Solver::new(config).unwrap().round(&board).unwrap();

        assert_eq!(first.grouping.groups.len(), 1);
        assert_eq!(first.grouping.groups[0].len(), 7);
        assert_eq!(first.selected, second.selected);
        assert_eq!(first.summary, second.summary);
        assert!(!first.selected.is_empty());
        assert!(first.selected.len() <= 3);
        for (a, b) in first.selected.iter().tuple_combinations() {
            assert!(!first.candidates[*a].overlaps(&first.candidates[*b]));
        }
    }

    #[test]
    fn greedy_rounds_shrink_residual() {
        let board = random_grid(3);
        let mut solver = Solver::new(SolverConfig::default()).unwrap();
        let mut remaining = board.nonzero_count();

        let rounds = solver.greedy(board).unwrap().collect_vec();
        assert!(rounds.len() >= 2);
        assert!(rounds.last().unwrap().summary.is_unset());

        for round in &rounds {
            // selected blocks never share a cell
            let mut claims = Array2::<u32>::zeros((16, 10));
            for index in &round.selected {
                claims = claims + round.candidates[*index].occupancy().map(|c| u32::from(*c));
            }
            assert!(claims.iter().all(|c| *c <= 1));

            let now = round.residual.nonzero_count();
            if round.summary.is_unset() {
                assert_eq!(now, remaining);
            } else {
                assert!(now < remaining);
            }
            remaining = now;
        }
    }

    #[test]
    fn display_mask_trims_empty_edges() {
        let board = grid(array![[0, 0, 0], [0, 4, 6], [0, 0, 0]]);
        let candidates = enumerate(&board, 10);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rect(), Rect::new(0, 2, 0, 3));
        assert_eq!(candidates[0].display(), &array![[false, false, false], [false, true, true], [false, false, false]]);

        let interior_zero = grid(array![[4, 0, 6]]);
        let candidates = enumerate(&interior_zero, 10);
        assert_eq!(candidates[0].occupancy(), &array![[true, false, true]]);
        assert_eq!(candidates[0].display(), &array![[true, true, true]]);

        let nothing = Array2::from_elem((2, 2), false);
        assert_eq!(trim_to_occupied(&Array2::from_elem((2, 2), true), &nothing), nothing);
    }

    #[test]
    fn lookahead_takes_heavier_move() {
        let board = grid(array![[1, 1, 8, 2]]);
        let mut solver = Solver::new(SolverConfig { tiers: 1, ..SolverConfig::with_dims(1, 4) }).unwrap();

        let solution = solver.lookahead(board).unwrap();
        assert_eq!(solution.moves.len(), 1);
        assert_eq!(solution.moves[0].score, 3);
        assert_eq!(solution.coverage(), 3);
        assert_eq!(labels(&solution.summary), array![[1, 1, 1, 0]]);
        assert_eq!(solution.residual, grid(array![[0, 0, 0, 2]]));
    }

    #[test]
    fn lookahead_follows_up_on_cleared_cells() {
        // clearing the middle joins the two fives into a new block
        let board = grid(array![[5, 3, 7, 5]]);
        for memoize in [true, false] {
            let mut solver = Solver::new(SolverConfig { memoize, ..SolverConfig::with_dims(1, 4) }).unwrap();
            let solution = solver.lookahead(board.clone()).unwrap();

            assert_eq!(solution.moves.len(), 2);
            assert_eq!(solution.moves[0].score, 4);
            assert_eq!(solution.coverage(), 4);
            // the second block's label spans the cleared middle and overwrites the first
            assert_eq!(labels(&solution.summary), array![[2, 2, 2, 2]]);
            assert_eq!(solution.residual.nonzero_count(), 0);
        }
    }

    #[test]
    fn shallow_lookahead_matches_greedy_coverage() {
        let board = grid(array![[1, 1, 8, 2, 0, 10]]);

        let greedy: u64 = solver_for(&board).greedy(board.clone()).unwrap().map(|round| round.coverage).sum();
        let solution = solver_for(&board).lookahead(board.clone()).unwrap();

        assert_eq!(greedy, 4);
        assert_eq!(solution.coverage(), greedy);
        assert_eq!(solution.residual, grid(array![[0, 0, 0, 2, 0, 0]]));
    }

    #[test]
    fn solve_follows_configured_mode() {
        let board = grid(array![[5, 3, 7, 5]]);

        let mut greedy = solver_for(&board);
        let Solution::Greedy(rounds) = greedy.solve(board.clone()).unwrap() else {
            panic!("greedy mode produced lookahead moves");
        };
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds.iter().map(|round| round.coverage).sum::<u64>(), 4);

        let mut lookahead = Solver::new(SolverConfig { mode: Mode::Lookahead, ..SolverConfig::with_dims(1, 4) }).unwrap();
        assert_eq!(lookahead.config().mode, Mode::Lookahead);
        let solution = lookahead.solve(board).unwrap();
        let Solution::Lookahead(ref moves) = solution else {
            panic!("lookahead mode produced greedy rounds");
        };
        assert_eq!(moves.moves.len(), 2);
        assert_eq!(solution.coverage(), 4);
        assert_eq!(solution.residual().map(Grid::nonzero_count), Some(0));
    }

    #[test]
    fn repeated_lookahead_starts_fresh() {
        let mut solver = Solver::new(SolverConfig::with_dims(1, 4)).unwrap();
        let first = solver.lookahead(grid(array![[5, 3, 7, 5]])).unwrap();
        let second = solver.lookahead(grid(array![[1, 1, 8, 2]])).unwrap();
        let again = solver.lookahead(grid(array![[5, 3, 7, 5]])).unwrap();

        assert_eq!(second.coverage(), 3);
        assert_eq!(first.summary, again.summary);
        assert_eq!(first.coverage(), again.coverage());
    }

    #[test]
    fn lookahead_without_blocks_is_empty() {
        let board = grid(array![[1, 2], [3, 1]]);
        let mut solver = Solver::new(SolverConfig { tiers: 2, ..SolverConfig::with_dims(2, 2) }).unwrap();
        let solution = solver.lookahead(board.clone()).unwrap();

        assert!(solution.moves.is_empty());
        assert!(solution.summary.is_unset());
        assert_eq!(solution.residual, board);
    }

    #[test]
    fn reads_csv_in_any_layout() {
        let square = Grid::read_csv("5, 5\n0,0\n".as_bytes(), 2, 2).unwrap();
        let flat = Grid::read_csv("5,5,0,0\n\n".as_bytes(), 2, 2).unwrap();
        assert_eq!(square, flat);
        assert_eq!(square.get(0, 1), Some(5));
        assert_eq!(format!("{}", square), "5,5\n0,0\n");
    }

    #[test]
    fn rejects_malformed_csv() {
        assert!(matches!(
            Grid::read_csv("1,2,3\n".as_bytes(), 2, 2),
            Err(SolveError::Shape { expected: 4, got: 3, .. })
        ));
        assert!(matches!(
            Grid::read_csv("1,2\n3,x\n".as_bytes(), 2, 2),
            Err(SolveError::Parse { line: 2, field: 2, .. })
        ));
        assert!(matches!(Grid::read_csv("1,-2\n3,4\n".as_bytes(), 2, 2), Err(SolveError::Parse { .. })));
    }

    #[test]
    fn reads_grid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "3,7,0").unwrap();
        writeln!(file, "0,0,10").unwrap();

        let board = Grid::from_path(file.path(), 2, 3).unwrap();
        assert_eq!(board, grid(array![[3, 7, 0], [0, 0, 10]]));
        assert!(matches!(Grid::from_path(file.path().with_extension("missing"), 2, 3), Err(SolveError::Io(_))));
    }

    #[test]
    fn rejects_mismatched_grid() {
        let mut solver = Solver::new(SolverConfig::with_dims(3, 3)).unwrap();
        assert!(matches!(solver.round(&grid(array![[5, 5]])), Err(SolveError::Shape { rows: 3, cols: 3, .. })));
    }

    #[test]
    fn validates_config() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(matches!(
            SolverConfig { target_sum: 0, ..Default::default() }.validate(),
            Err(SolveError::InvalidConfig(_))
        ));
        assert!(SolverConfig { max_size: 64, ..Default::default() }.validate().is_err());
        assert!(SolverConfig { max_size: 0, ..Default::default() }.validate().is_err());
        assert!(SolverConfig::with_dims(0, 10).validate().is_err());
        assert!(SolverConfig {
            weights: WeightScheme::Border { thickness: 2, weight: 0 },
            ..Default::default()
        }.validate().is_err());
    }

    #[test]
    fn parses_mode() {
        assert_eq!(Mode::from_str("greedy").unwrap(), Mode::Greedy);
        assert_eq!(Mode::from_str("LookAhead").unwrap(), Mode::Lookahead);
        assert!(Mode::from_str("annealing").is_err());
        assert_eq!(Mode::Lookahead.to_string(), "lookahead");
    }

    #[test]
    fn renders_values_beside_labels() {
        let board = grid(array![[5, 5], [0, 0]]);
        let mut solver = solver_for(&board);
        let round = solver.round(&board).unwrap();

        assert_eq!(render(&board, Some(&round.summary), "Step, 1, Score, 4"), "Step, 1, Score, 4
5 5 | 1 1
. . | . .
");
        assert_eq!(render(&round.residual, None, "done"), "done\n. .\n. .\n");
    }

    #[test]
    fn render_skips_misshapen_summary() {
        let board = grid(array![[5, 5], [0, 0]]);
        let narrow = Summary::unset((1, 2));

        assert_eq!(render(&board, Some(&narrow), "t"), "t\n5 5\n. .\n");
    }
}
