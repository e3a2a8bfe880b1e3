//! The puzzle rules over candidate edges, and their CNF encoding.

use std::collections::HashSet;

use itertools::Itertools;
use tracing::debug;
use unordered_pair::UnorderedPair;
use varisat::{CnfFormula, ExtendFormula, Lit, Var};

use crate::assignment::{Assignment, MAX_BRIDGES};
use crate::connectivity::{component_labels, is_connected};
use crate::error::{OracleError, SolveError, Violation};
use crate::logic::{exactly_k, implies};
use crate::model::{CandidateEdge, EdgeId, Island, IslandId, IslandMap};
use crate::shape::Orientation;

/// The structural rules of a board, in a form every search strategy can consume.
///
/// Holds the [`IslandMap`] together with per-island incidence and the set of crossing edge pairs.
/// Read-only once built, so one model can back any number of solves of the same board.
#[derive(Clone, Debug)]
pub struct ConstraintModel {
    map: IslandMap,
    incident: Vec<Vec<EdgeId>>,
    crossings: Vec<Vec<EdgeId>>,
    crossing_pairs: HashSet<UnorderedPair<EdgeId>>,
}

impl From<IslandMap> for ConstraintModel {
    fn from(map: IslandMap) -> Self {
        let incident = map.islands().iter()
            .map(|island| map.incident(island.id).collect_vec())
            .collect_vec();

        let (horizontal, vertical): (Vec<&CandidateEdge>, Vec<&CandidateEdge>) = map.edges().iter()
            .partition(|edge| edge.orientation == Orientation::Horizontal);

        let mut crossings = vec![Vec::new(); map.edges().len()];
        let mut crossing_pairs = HashSet::new();
        for (h, v) in horizontal.iter().cartesian_product(vertical.iter()) {
            if h.crosses(v) {
                crossings[h.id].push(v.id);
                crossings[v.id].push(h.id);
                crossing_pairs.insert(UnorderedPair(h.id, v.id));
            }
        }
        for partners in crossings.iter_mut() {
            partners.sort_unstable();
        }

        Self { map, incident, crossings, crossing_pairs }
    }
}

impl ConstraintModel {
    /// The underlying islands and candidate edges.
    pub fn map(&self) -> &IslandMap {
        &self.map
    }

    /// Islands, by [`IslandId`].
    pub fn islands(&self) -> &[Island] {
        self.map.islands()
    }

    /// Candidate edges, by [`EdgeId`].
    pub fn edges(&self) -> &[CandidateEdge] {
        self.map.edges()
    }

    /// The island numbered `id`.
    pub fn island(&self, id: IslandId) -> &Island {
        self.map.island(id)
    }

    /// The candidate edge numbered `id`.
    pub fn edge(&self, id: EdgeId) -> &CandidateEdge {
        self.map.edge(id)
    }

    /// Number of islands.
    pub fn island_count(&self) -> usize {
        self.map.islands().len()
    }

    /// Number of candidate edges.
    pub fn edge_count(&self) -> usize {
        self.map.edges().len()
    }

    /// Candidate edges touching `island`, ascending.
    pub fn incident(&self, island: IslandId) -> &[EdgeId] {
        &self.incident[island]
    }

    /// Edges that may not be active together with `edge`, ascending.
    pub fn crossings_of(&self, edge: EdgeId) -> &[EdgeId] {
        &self.crossings[edge]
    }

    /// Every pair of candidate edges whose bridges would intersect.
    pub fn crossing_pairs(&self) -> &HashSet<UnorderedPair<EdgeId>> {
        &self.crossing_pairs
    }

    /// Whether edges `a` and `b` may not both be active.
    pub fn crosses(&self, a: EdgeId, b: EdgeId) -> bool {
        self.crossing_pairs.contains(&UnorderedPair(a, b))
    }

    /// The most bridges `island` could ever receive: two along each candidate edge.
    pub fn capacity(&self, island: IslandId) -> u8 {
        // at most four candidate edges per island, so this never exceeds 8
        self.incident[island].len() as u8 * MAX_BRIDGES
    }

    /// Reject boards where some island can never reach its required bridge count, before any search.
    pub fn check_capacity(&self) -> Result<(), SolveError> {
        match self.islands().iter().find(|island| self.capacity(island.id) < island.required) {
            None => Ok(()),
            Some(island) => {
                debug!(
                    event = "structurally_infeasible",
                    island = island.id,
                    required = island.required,
                    capacity = self.capacity(island.id),
                );
                Err(SolveError::StructurallyInfeasible {
                    island: island.id,
                    location: island.location,
                    required: island.required,
                    capacity: self.capacity(island.id),
                })
            }
        }
    }

    /// Per-island sum of bridge counts under `assignment`.
    pub fn degrees(&self, assignment: &Assignment) -> Vec<u8> {
        let mut degrees = vec![0; self.island_count()];
        for (edge, count) in assignment.active() {
            let (a, b) = self.edge(edge).endpoints;
            degrees[a] += count;
            degrees[b] += count;
        }
        degrees
    }

    /// Island pairs joined by at least one bridge under `assignment`.
    pub fn links<'a>(&'a self, assignment: &'a Assignment) -> impl Iterator<Item = (IslandId, IslandId)> + 'a {
        assignment.active().map(|(edge, _)| self.edge(edge).endpoints)
    }

    /// Whether the active edges of `assignment` join every island.
    pub fn is_connected(&self, assignment: &Assignment) -> bool {
        is_connected(self.island_count(), self.links(assignment))
    }

    /// Canonical component label of every island under `assignment`.
    pub fn components(&self, assignment: &Assignment) -> Vec<usize> {
        component_labels(self.island_count(), self.links(assignment))
    }

    /// Check the degree and crossing rules, but not connectivity.
    pub fn verify_structure(&self, assignment: &Assignment) -> Result<(), Violation> {
        if assignment.len() != self.edge_count() {
            return Err(Violation::WrongLength { expected: self.edge_count(), found: assignment.len() });
        }

        if let Some((edge, count)) = assignment.active().find(|(_, count)| *count > MAX_BRIDGES) {
            return Err(Violation::CountOutOfRange { edge, count });
        }

        let degrees = self.degrees(assignment);
        if let Some(island) = self.islands().iter().find(|island| degrees[island.id] != island.required) {
            return Err(Violation::DegreeMismatch {
                island: island.id,
                degree: degrees[island.id],
                required: island.required,
            });
        }

        for (edge, _) in assignment.active() {
            if let Some(other) = self.crossings_of(edge).iter().find(|other| **other > edge && assignment.is_active(**other)) {
                return Err(Violation::Crossing(edge, *other));
            }
        }

        Ok(())
    }

    /// Check every rule a solution must satisfy: exact degrees, no crossings, one connected component.
    pub fn verify(&self, assignment: &Assignment) -> Result<(), Violation> {
        self.verify_structure(assignment)?;
        if !self.is_connected(assignment) {
            return Err(Violation::Disconnected);
        }
        Ok(())
    }

    /// Express the structural rules as CNF over two indicators per edge.
    ///
    /// # Logical setup
    /// Every candidate edge E gets two variables: `A(E)`, "at least one bridge", and `D(E)`, "two bridges".
    /// The count on E is then `A(E) + D(E)`, provided `D(E) => A(E)`, which we assert for every edge.
    ///
    /// For an island I with requirement k, exactly k of the `A` and `D` variables of its incident edges are true.
    ///
    /// For crossing edges E and F, `!A(E) + !A(F)`; since a second bridge implies a first, forbidding the first suffices.
    ///
    /// Connectivity is not expressible here without auxiliary structure and is left to the refinement loop.
    pub fn encode(&self) -> Encoding {
        let vars = (0..self.edge_count())
            .map(|edge| EdgeVars {
                at_least_one: Var::from_index(2 * edge),
                double: Var::from_index(2 * edge + 1),
            })
            .collect_vec();

        let mut formula = CnfFormula::new();

        for edge_vars in &vars {
            formula.add_clause(&implies(edge_vars.double.positive(), edge_vars.at_least_one.positive()));
        }

        for island in self.islands() {
            let lits = self.incident(island.id).iter()
                .flat_map(|edge| [vars[*edge].at_least_one.positive(), vars[*edge].double.positive()])
                .collect_vec();
            for clause in exactly_k(&lits, island.required as usize) {
                formula.add_clause(&clause);
            }
        }

        for (edge, partners) in self.crossings.iter().enumerate() {
            for other in partners.iter().filter(|other| **other > edge) {
                formula.add_clause(&[vars[edge].at_least_one.negative(), vars[*other].at_least_one.negative()]);
            }
        }

        Encoding { vars, formula }
    }
}

/// The pair of boolean indicators standing for one candidate edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EdgeVars {
    /// True iff the edge carries at least one bridge.
    pub at_least_one: Var,
    /// True iff the edge carries two bridges.
    pub double: Var,
}

/// A [`ConstraintModel`] as CNF, plus the mapping needed to read models back.
///
/// Edge `e` owns variables `2e` and `2e + 1`, i.e. DIMACS numbers `2e + 1` and `2e + 2`.
#[derive(Debug)]
pub struct Encoding {
    vars: Vec<EdgeVars>,
    formula: CnfFormula,
}

impl Encoding {
    /// The indicators of `edge`.
    pub fn vars(&self, edge: EdgeId) -> EdgeVars {
        self.vars[edge]
    }

    /// The clauses, ready to hand to a solver.
    pub fn formula(&self) -> &CnfFormula {
        &self.formula
    }

    /// Number of indicator variables; the formula introduces no others.
    pub fn var_count(&self) -> usize {
        2 * self.vars.len()
    }

    /// Read bridge counts back out of a model, which must give a value to every indicator variable.
    pub fn decode(&self, model: &[Lit]) -> Result<Assignment, OracleError> {
        let mut values = vec![None; self.var_count()];
        for lit in model {
            if let Some(value) = values.get_mut(lit.var().index()) {
                *value = Some(lit.is_positive());
            }
        }

        let value_of = |var: Var| {
            values[var.index()]
                .ok_or_else(|| OracleError::MalformedModel(format!("no value for variable {}", var.to_dimacs())))
        };

        let mut counts = Vec::with_capacity(self.vars.len());
        for (edge, edge_vars) in self.vars.iter().enumerate() {
            let at_least_one = value_of(edge_vars.at_least_one)?;
            let double = value_of(edge_vars.double)?;
            if double && !at_least_one {
                return Err(OracleError::MalformedModel(format!("edge {edge} has a second bridge without a first")));
            }
            counts.push(at_least_one as u8 + double as u8);
        }
        Ok(Assignment::from_counts(counts))
    }

    /// A clause ruling out exactly this combination of indicator values.
    pub fn blocking_clause(&self, assignment: &Assignment) -> Vec<Lit> {
        self.vars.iter()
            .enumerate()
            .flat_map(|(edge, edge_vars)| {
                let count = assignment.count(edge);
                // each literal is the negation of the value the model gave
                [edge_vars.at_least_one.lit(count < 1), edge_vars.double.lit(count < 2)]
            })
            .collect_vec()
    }

    /// A clause requiring some bridge to leave the component containing island 0.
    ///
    /// Any connected solution crosses every cut, so this never excludes one. An empty clause means no candidate edge leaves the component.
    pub fn cut_clause(&self, model: &ConstraintModel, assignment: &Assignment) -> Vec<Lit> {
        let labels = model.components(assignment);
        let Some(&home) = labels.first() else {
            return Vec::new();
        };

        model.edges().iter()
            .filter(|edge| (labels[edge.endpoints.0] == home) != (labels[edge.endpoints.1] == home))
            .map(|edge| self.vars[edge.id].at_least_one.positive())
            .collect_vec()
    }
}
