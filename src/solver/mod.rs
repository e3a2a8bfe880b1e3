//! Search strategies and the common solve contract.
//!
//! Every strategy takes a [`ConstraintModel`] and either returns an [`Assignment`] that is degree-exact,
//! crossing-free and connected, or fails with a [`SolveError`]. They differ only in exploration order and pruning:
//!
//! | strategy | module | explores |
//! |---|---|---|
//! | [`Backtracking`] | [`backtrack`] | depth-first over edges, tightest islands first, capacity look-ahead |
//! | [`BruteForce`] | [`backtrack`] | depth-first over edges in generation order, overflow and crossing checks only |
//! | [`BestFirst`] | [`best_first`] | a priority queue ordered by decided edges plus missing bridges |
//! | [`SatRefinement`] | [`sat`] | a SAT oracle, re-queried with an extra clause after each disconnected model |
//!
//! [`run`] wraps any of them with the capacity pre-check, timing, final verification and logging.

use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, VariantArray};
use tracing::info;

use crate::assignment::Assignment;
use crate::config::SolverConfig;
use crate::constraint::ConstraintModel;
use crate::error::SolveError;
use crate::model::EdgeId;
use crate::solution::Solution;

pub use backtrack::{Backtracking, BruteForce};
pub use best_first::BestFirst;
pub use deadline::Deadline;
pub use sat::{Refinement, SatOracle, SatRefinement, VarisatOracle};

/// Depth-first strategies.
pub mod backtrack;
/// Priority-queue strategy.
pub mod best_first;
mod deadline;
/// SAT oracle strategy and its refinement loop.
pub mod sat;

/// Counters a strategy fills in while it works.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Search nodes expanded by a tree or best-first search.
    pub nodes_expanded: u64,
    /// Times the SAT oracle was asked for a model.
    pub oracle_calls: u64,
    /// Disconnected models excluded by an added clause.
    pub refinements: u64,
}

/// A way of searching the constrained space for a solution.
pub trait Strategy {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// How often [`Deadline::check`] reads the clock; see [`Deadline::with_clock_check_mask`].
    fn clock_check_mask(&self) -> u64 {
        Deadline::DEFAULT_CLOCK_CHECK_MASK
    }

    /// Search for a valid connected assignment, checking `deadline` before expanding each node.
    fn solve(&self, model: &ConstraintModel, deadline: &mut Deadline, stats: &mut SearchStats) -> Result<Assignment, SolveError>;
}

/// The interchangeable strategies, by name.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq, Hash, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// [`Backtracking`].
    #[default]
    Backtracking,
    /// [`BestFirst`].
    BestFirst,
    /// [`BruteForce`].
    BruteForce,
    /// [`SatRefinement`].
    Sat,
}

impl StrategyKind {
    /// Budget used when nothing else is configured.
    pub fn default_time_limit(&self) -> Duration {
        match self {
            StrategyKind::Backtracking => Duration::from_secs(10),
            StrategyKind::BestFirst => Duration::from_secs(30),
            StrategyKind::BruteForce => Duration::from_secs(10),
            StrategyKind::Sat => Duration::from_secs(60),
        }
    }

    /// Whether this strategy reports [`SearchStats::nodes_expanded`].
    pub fn counts_nodes(&self) -> bool {
        !matches!(self, StrategyKind::Sat)
    }

    /// Construct the strategy, configured by `config`.
    pub fn build(&self, config: &SolverConfig) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Backtracking => Box::new(Backtracking::new(config.edge_order)),
            StrategyKind::BestFirst => Box::new(BestFirst::new(config.edge_order)),
            StrategyKind::BruteForce => Box::new(BruteForce),
            StrategyKind::Sat => Box::new(SatRefinement::new(config.refinement)),
        }
    }
}

/// The order in which tree searches decide candidate edges.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq, Hash, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EdgeOrder {
    /// Ascending by the summed requirement of both endpoints, so small islands fail fast; ties keep generation order.
    #[default]
    TightestFirst,
    /// Generation order.
    Natural,
}

impl EdgeOrder {
    /// The edges of `model` in the order they should be decided.
    pub fn arrange(&self, model: &ConstraintModel) -> Vec<EdgeId> {
        match self {
            EdgeOrder::Natural => (0..model.edge_count()).collect_vec(),
            // sorted_by_key is stable
            EdgeOrder::TightestFirst => model.edges().iter()
                .sorted_by_key(|edge| {
                    let (a, b) = edge.endpoints;
                    model.island(a).required as u16 + model.island(b).required as u16
                })
                .map(|edge| edge.id)
                .collect_vec(),
        }
    }
}

/// Everything known about one solve attempt.
#[derive(Debug)]
pub struct SolveReport {
    /// Which strategy ran.
    pub strategy: StrategyKind,
    /// The verified solution, or why there is none.
    pub outcome: Result<Solution, SolveError>,
    /// Wall-clock time spent, capacity check included.
    pub elapsed: Duration,
    /// Counters filled in by the strategy.
    pub stats: SearchStats,
}

impl SolveReport {
    /// Whether a solution was found.
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Whether the attempt ran out of time.
    pub fn timed_out(&self) -> bool {
        self.outcome.as_ref().is_err_and(SolveError::is_timeout)
    }

    /// Only verified solutions are ever reported, and those are connected.
    pub fn connected(&self) -> bool {
        self.success()
    }

    /// Nodes expanded, for the strategies that count them.
    pub fn nodes_expanded(&self) -> Option<u64> {
        self.strategy.counts_nodes().then_some(self.stats.nodes_expanded)
    }

    /// The solution, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        self.outcome.as_ref().ok()
    }

    /// Why no solution was found, if none was.
    pub fn error(&self) -> Option<&SolveError> {
        self.outcome.as_ref().err()
    }
}

/// Run `strategy` on `model` under `time_limit`.
///
/// Structural infeasibility is reported without entering search. Whatever the strategy returns is verified
/// against all three rules before it is turned into a [`Solution`].
///
/// # Panics
/// If a strategy returns an assignment that breaks a rule; that is a bug in the strategy, not a property of the board.
pub fn run(model: &ConstraintModel, strategy: &dyn Strategy, time_limit: Option<Duration>) -> SolveReport {
    let kind = strategy.kind();
    info!(
        event = "solve_start",
        strategy = %kind,
        islands = model.island_count(),
        edges = model.edge_count(),
        crossings = model.crossing_pairs().len(),
    );

    let mut deadline = Deadline::with_clock_check_mask(time_limit, strategy.clock_check_mask());
    let mut stats = SearchStats::default();

    let outcome = model.check_capacity()
        .and_then(|()| strategy.solve(model, &mut deadline, &mut stats))
        .map(|assignment| {
            if let Err(violation) = model.verify(&assignment) {
                panic!("{kind} accepted an invalid assignment: {violation}");
            }
            Solution::assemble(model, &assignment)
        });

    let report = SolveReport {
        strategy: kind,
        outcome,
        elapsed: deadline.elapsed(),
        stats,
    };

    info!(
        event = "solve_end",
        strategy = %kind,
        success = report.success(),
        timed_out = report.timed_out(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        nodes = report.stats.nodes_expanded,
        oracle_calls = report.stats.oracle_calls,
    );

    report
}

/// Build the configured strategy and [`run`] it with the configured time limit.
pub fn solve(model: &ConstraintModel, config: &SolverConfig) -> SolveReport {
    let strategy = config.strategy.build(config);
    run(model, strategy.as_ref(), config.time_limit())
}
