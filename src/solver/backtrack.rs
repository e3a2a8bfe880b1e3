//! Depth-first search over candidate edges with mutate-then-undo state.
//!
//! Each level decides one edge, trying 0, 1 and 2 bridges in turn. A count is rejected outright if it pushes
//! either endpoint over its requirement or activates an edge crossing an already active one. Reaching the
//! end of the edge order accepts only an exact, connected assignment; otherwise the last count is retracted
//! and the next sibling tried. Retreating past the first edge means the space is exhausted.

use tracing::debug;

use crate::assignment::{Assignment, MAX_BRIDGES};
use crate::constraint::ConstraintModel;
use crate::error::SolveError;
use crate::model::{EdgeId, IslandId};
use crate::solver::{Deadline, EdgeOrder, SearchStats, Strategy, StrategyKind};

/// Exhaustive backtracking, ordered by [`EdgeOrder`] and pruned by remaining capacity.
///
/// Besides the overflow and crossing checks, a branch is cut as soon as an island needs more bridges than its
/// undecided edges can still carry.
#[derive(Copy, Clone, Debug, Default)]
pub struct Backtracking {
    order: EdgeOrder,
}

impl Backtracking {
    /// Decide edges in `order`.
    pub fn new(order: EdgeOrder) -> Self {
        Self { order }
    }
}

impl Strategy for Backtracking {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Backtracking
    }

    fn solve(&self, model: &ConstraintModel, deadline: &mut Deadline, stats: &mut SearchStats) -> Result<Assignment, SolveError> {
        TreeSearch::new(model, self.order.arrange(model), true, deadline, stats).run()
    }
}

/// The same tree as [`Backtracking`], walked in generation order with only the overflow and crossing checks.
///
/// A baseline for correctness and timing comparisons; hopeless beyond small boards.
#[derive(Copy, Clone, Debug, Default)]
pub struct BruteForce;

impl Strategy for BruteForce {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BruteForce
    }

    fn solve(&self, model: &ConstraintModel, deadline: &mut Deadline, stats: &mut SearchStats) -> Result<Assignment, SolveError> {
        TreeSearch::new(model, EdgeOrder::Natural.arrange(model), false, deadline, stats).run()
    }
}

struct TreeSearch<'a> {
    model: &'a ConstraintModel,
    order: Vec<EdgeId>,
    look_ahead: bool,
    assignment: Assignment,
    degrees: Vec<u8>,
    // incident edges not yet decided, per island
    undecided: Vec<u8>,
    deadline: &'a mut Deadline,
    stats: &'a mut SearchStats,
}

impl<'a> TreeSearch<'a> {
    fn new(
        model: &'a ConstraintModel,
        order: Vec<EdgeId>,
        look_ahead: bool,
        deadline: &'a mut Deadline,
        stats: &'a mut SearchStats,
    ) -> Self {
        Self {
            model,
            order,
            look_ahead,
            assignment: Assignment::empty(model.edge_count()),
            degrees: vec![0; model.island_count()],
            undecided: model.islands().iter().map(|island| model.incident(island.id).len() as u8).collect(),
            deadline,
            stats,
        }
    }

    fn run(mut self) -> Result<Assignment, SolveError> {
        if self.descend(0)? {
            Ok(self.assignment)
        } else {
            debug!(event = "exhausted", nodes = self.stats.nodes_expanded);
            Err(SolveError::SearchExhausted)
        }
    }

    fn descend(&mut self, depth: usize) -> Result<bool, SolveError> {
        self.deadline.check()?;
        self.stats.nodes_expanded += 1;

        let Some(&edge) = self.order.get(depth) else {
            return Ok(self.accepts());
        };
        let (a, b) = self.model.edge(edge).endpoints;

        for count in 0..=MAX_BRIDGES {
            if !self.admits(edge, count) {
                continue;
            }

            self.apply(edge, count);
            let feasible = !self.look_ahead || (self.can_still_finish(a) && self.can_still_finish(b));
            if feasible && self.descend(depth + 1)? {
                return Ok(true);
            }
            self.retract(edge, count);
        }

        Ok(false)
    }

    fn admits(&self, edge: EdgeId, count: u8) -> bool {
        let (a, b) = self.model.edge(edge).endpoints;
        if self.degrees[a] + count > self.model.island(a).required
            || self.degrees[b] + count > self.model.island(b).required {
            return false;
        }

        // undecided edges read as 0, so only earlier decisions can block this one
        count == 0 || self.model.crossings_of(edge).iter().all(|other| !self.assignment.is_active(*other))
    }

    fn apply(&mut self, edge: EdgeId, count: u8) {
        let (a, b) = self.model.edge(edge).endpoints;
        self.assignment.set(edge, count);
        self.degrees[a] += count;
        self.degrees[b] += count;
        self.undecided[a] -= 1;
        self.undecided[b] -= 1;
    }

    fn retract(&mut self, edge: EdgeId, count: u8) {
        let (a, b) = self.model.edge(edge).endpoints;
        self.assignment.set(edge, 0);
        self.degrees[a] -= count;
        self.degrees[b] -= count;
        self.undecided[a] += 1;
        self.undecided[b] += 1;
    }

    fn can_still_finish(&self, island: IslandId) -> bool {
        let missing = self.model.island(island).required - self.degrees[island];
        missing <= self.undecided[island] * MAX_BRIDGES
    }

    fn accepts(&self) -> bool {
        // degrees can still fall short without look-ahead
        self.model.islands().iter().all(|island| self.degrees[island.id] == island.required)
            && self.model.is_connected(&self.assignment)
    }
}
