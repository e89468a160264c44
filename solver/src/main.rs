use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use strum::VariantArray;
use sumblock::config::{DEFAULT_HEIGHT, DEFAULT_MAX_SIZE, DEFAULT_SEED, DEFAULT_TARGET_SUM, DEFAULT_WIDTH};
use sumblock::{render, Grid, Mode, Solution, Solver, SolverConfig, WeightScheme};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Comma-separated grid of non-negative integers
    #[arg(default_value = "demo.txt")]
    input: PathBuf,

    /// Grid rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Grid columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Sum every cleared block must reach
    #[arg(long, default_value_t = DEFAULT_TARGET_SUM)]
    target: u64,

    /// Largest overlap group searched exhaustively; larger groups are sampled
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Weight cells within this many cells of the edge more heavily
    #[arg(long)]
    border_thickness: Option<usize>,

    /// Weight of edge cells when --border-thickness is given
    #[arg(long, default_value_t = 2)]
    border_weight: u32,

    /// greedy | lookahead
    #[arg(long, default_value = "greedy")]
    mode: String,

    /// Lookahead tiers
    #[arg(long, default_value_t = 0)]
    tiers: usize,

    /// Disable caching of lookahead scores
    #[arg(long)]
    no_memo: bool,

    /// Seed for sampling oversized overlap groups
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    // defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();

    let Ok(mode) = Mode::from_str(&args.mode) else {
        let known = Mode::VARIANTS.iter().map(ToString::to_string).collect::<Vec<_>>();
        warn!("unknown mode {:?}, expected one of {}; nothing solved", args.mode, known.join(", "));
        return Ok(());
    };

    let config = SolverConfig {
        height: args.height,
        width: args.width,
        target_sum: args.target,
        max_size: args.max_size,
        weights: match args.border_thickness {
            Some(thickness) => WeightScheme::Border { thickness, weight: args.border_weight },
            None => WeightScheme::Uniform,
        },
        mode,
        tiers: args.tiers,
        memoize: !args.no_memo,
        seed: args.seed,
    };
    let mut solver = Solver::new(config).context("invalid solver options")?;

    info!("loading {}", args.input.display());
    let grid = Grid::from_path(&args.input, args.height, args.width)
        .with_context(|| format!("failed to load grid from {}", args.input.display()))?;

    info!("solving in {} mode", solver.config().mode);
    match solver.solve(grid.clone())? {
        Solution::Greedy(rounds) => {
            let mut current = grid;
            for round in rounds.into_iter().take_while(|round| !round.summary.is_unset()) {
                let title = format!("Step, {}, Score, {}", round.step, round.score());
                println!("{}", render(&current, Some(&round.summary), &title));
                current = round.residual;
            }
        }
        Solution::Lookahead(solution) => {
            let title = format!(
                "Lookahead, {} tiers, {} moves, Score, {}",
                solver.config().tiers,
                solution.moves.len(),
                solution.residual.zero_count(),
            );
            println!("{}", render(&grid, Some(&solution.summary), &title));
        }
    }

    info!("cannot think of more solutions");
    Ok(())
}
