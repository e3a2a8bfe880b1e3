use serde::{Deserialize, Serialize};
use strum::{Display, VariantArray};
use tracing::{debug, trace};
use varisat::{CnfFormula, ExtendFormula, Lit, Solver};

use crate::assignment::Assignment;
use crate::constraint::ConstraintModel;
use crate::error::{OracleError, SolveError};
use crate::solver::{Deadline, SearchStats, Strategy, StrategyKind};

/// A propositional satisfiability decision procedure that accepts clauses incrementally.
///
/// Models are returned as one literal per variable, in variable index order, as [`varisat`] does.
pub trait SatOracle {
    /// Add every clause of `formula`.
    fn add_formula(&mut self, formula: &CnfFormula);
    /// Add one more clause, kept for all later calls.
    fn add_clause(&mut self, clause: &[Lit]);
    /// `Ok(None)` means the clauses added so far are unsatisfiable.
    fn solve(&mut self) -> Result<Option<Vec<Lit>>, OracleError>;
}

/// [`SatOracle`] backed by the CDCL solver in [`varisat`].
pub struct VarisatOracle {
    solver: Solver<'static>,
}

impl VarisatOracle {
    /// A fresh solver with no clauses.
    pub fn new() -> Self {
        Self { solver: Solver::new() }
    }
}

impl Default for VarisatOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl SatOracle for VarisatOracle {
    fn add_formula(&mut self, formula: &CnfFormula) {
        self.solver.add_formula(formula);
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        self.solver.add_clause(clause);
    }

    fn solve(&mut self) -> Result<Option<Vec<Lit>>, OracleError> {
        match self.solver.solve() {
            Ok(false) => Ok(None),
            Ok(true) => self.solver.model().map(Some).ok_or(OracleError::MissingModel),
            Err(err) => Err(OracleError::Backend(err.to_string())),
        }
    }
}

/// What to add after the oracle returns a disconnected model.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq, Hash, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Refinement {
    /// Forbid exactly that combination of indicator values.
    #[default]
    BlockModel,
    /// Demand a bridge leaving the component of island 0, ruling out every model with the same cut at once.
    CutComponent,
}

type OracleFactory = Box<dyn Fn() -> Box<dyn SatOracle>>;

/// Encode the structural rules as CNF, then repeatedly ask an oracle for a model until one is connected.
///
/// UNSAT on the first call means the structural rules alone are contradictory; UNSAT later means every structurally
/// valid assignment was disconnected. Both are [`SolveError::SearchExhausted`].
pub struct SatRefinement {
    refinement: Refinement,
    oracle: OracleFactory,
}

impl SatRefinement {
    /// Use [`VarisatOracle`].
    pub fn new(refinement: Refinement) -> Self {
        Self::with_oracle(refinement, || Box::new(VarisatOracle::new()))
    }

    /// Use oracles produced by `oracle`; a fresh one is made for every solve.
    pub fn with_oracle<F>(refinement: Refinement, oracle: F) -> Self
    where
        F: Fn() -> Box<dyn SatOracle> + 'static,
    {
        Self { refinement, oracle: Box::new(oracle) }
    }
}

impl Strategy for SatRefinement {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sat
    }

    // every oracle call is expensive enough to be worth a clock read
    fn clock_check_mask(&self) -> u64 {
        0
    }

    fn solve(&self, model: &ConstraintModel, deadline: &mut Deadline, stats: &mut SearchStats) -> Result<Assignment, SolveError> {
        let mut oracle = (self.oracle)();
        refine(model, oracle.as_mut(), self.refinement, deadline, stats)
    }
}

/// The refinement loop itself, over any oracle.
pub fn refine<O>(
    model: &ConstraintModel,
    oracle: &mut O,
    refinement: Refinement,
    deadline: &mut Deadline,
    stats: &mut SearchStats,
) -> Result<Assignment, SolveError>
where
    O: SatOracle + ?Sized,
{
    let encoding = model.encode();
    oracle.add_formula(encoding.formula());

    loop {
        deadline.check()?;

        stats.oracle_calls += 1;
        let Some(found) = oracle.solve()? else {
            debug!(event = "exhausted", oracle_calls = stats.oracle_calls, refinements = stats.refinements);
            return Err(SolveError::SearchExhausted);
        };

        let assignment = encoding.decode(&found)?;
        model.verify_structure(&assignment).map_err(OracleError::from)?;

        if model.is_connected(&assignment) {
            return Ok(assignment);
        }

        stats.refinements += 1;
        let clause = match refinement {
            Refinement::BlockModel => encoding.blocking_clause(&assignment),
            Refinement::CutComponent => encoding.cut_clause(model, &assignment),
        };
        trace!(event = "disconnected_model", bridges = assignment.active().count());
        debug!(event = "refinement", round = stats.refinements, refinement = %refinement, clause_len = clause.len());
        oracle.add_clause(&clause);
    }
}
