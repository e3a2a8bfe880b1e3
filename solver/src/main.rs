use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use strum::VariantArray;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hashi::{Board, SolveReport, SolverConfig, StrategyKind};

/// Solve a Bridges puzzle read from a text file, one row per line.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Board file; cells separated by commas or spaces, 0 for water.
    board: PathBuf,

    /// TOML solver configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured strategy.
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<StrategyKind>,

    /// Run every strategy in turn and compare.
    #[arg(long, conflicts_with = "strategy")]
    all: bool,
}

fn parse_strategy(name: &str) -> Result<StrategyKind, String> {
    StrategyKind::VARIANTS.iter()
        .find(|kind| kind.to_string() == name)
        .copied()
        .ok_or_else(|| format!("unknown strategy {name:?}"))
}

fn print_report(board: &Board, report: &SolveReport) {
    println!("strategy:  {}", report.strategy);
    println!("success:   {}", report.success());
    println!("elapsed:   {:.3}s", report.elapsed.as_secs_f64());
    println!("timed out: {}", report.timed_out());
    println!("connected: {}", report.connected());
    match report.nodes_expanded() {
        Some(nodes) => println!("nodes:     {nodes}"),
        None => println!("nodes:     n/a ({} oracle calls, {} refinements)", report.stats.oracle_calls, report.stats.refinements),
    }

    match &report.outcome {
        Ok(solution) => print!("{}", board.clone().with_solution(solution.clone())),
        Err(err) => println!("{err}"),
    }
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let board: Board = std::fs::read_to_string(&args.board)?.parse()?;
    let config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::new(),
    };

    info!(event = "board_loaded", path = %args.board.display(), strategy = %config.strategy, time_limit_ms = ?config.time_limit_ms);

    print!("{board}");
    println!();

    let strategies = match (args.all, args.strategy) {
        (true, _) => StrategyKind::VARIANTS.to_vec(),
        (false, Some(strategy)) => vec![strategy],
        (false, None) => vec![config.strategy],
    };

    for strategy in strategies {
        // each strategy gets its own budget unless the config pins one
        let time_limit = config.time_limit().unwrap_or(strategy.default_time_limit());
        let config = config.clone().with_strategy(strategy).with_time_limit(time_limit);
        print_report(&board, &board.report(&config));
    }

    Ok(())
}
