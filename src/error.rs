//! Errors of board construction, solving, and the SAT oracle.

use std::time::Duration;

use thiserror::Error;

use crate::builder::BuilderInvalidReason;
use crate::location::Location;
use crate::model::{EdgeId, IslandId};

/// Reasons a solve attempt may fail.
#[derive(Debug, Error)]
pub enum SolveError {
    /// An island needs more bridges than its candidate edges could ever carry; no search was attempted.
    #[error("island {island} at {location} needs {required} bridges but can reach at most {capacity}")]
    StructurallyInfeasible {
        /// The first such island.
        island: IslandId,
        /// Where it sits.
        location: Location,
        /// Bridges it needs.
        required: u8,
        /// Bridges its candidate edges can carry at most.
        capacity: u8,
    },
    /// Every branch was explored, or the satisfiability oracle proved there is nothing left to find.
    #[error("search space exhausted without a valid connected solution")]
    SearchExhausted,
    /// The time budget ran out before the search could reach a verdict.
    #[error("time limit reached after {elapsed:?}")]
    TimedOut {
        /// Time spent when the budget was noticed to be gone.
        elapsed: Duration,
    },
    /// The satisfiability oracle misbehaved.
    #[error("satisfiability oracle failed: {0}")]
    Oracle(#[from] OracleError),
}

impl SolveError {
    /// Whether this failure came from running out of time rather than from a proof.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SolveError::TimedOut { .. })
    }

    /// Whether this failure proves the board has no solution.
    pub fn is_definitive(&self) -> bool {
        matches!(self, SolveError::StructurallyInfeasible { .. } | SolveError::SearchExhausted)
    }
}

/// Ways the satisfiability oracle can fail, as opposed to answering UNSAT.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The solver itself failed, with its message.
    #[error("backend error: {0}")]
    Backend(String),
    /// The oracle answered SAT without a model.
    #[error("oracle reported SAT but produced no model")]
    MissingModel,
    /// The model leaves an indicator unset or sets "two bridges" without "at least one".
    #[error("model is malformed: {0}")]
    MalformedModel(String),
    /// The model decodes, but breaks a degree or crossing rule.
    #[error("model breaks a puzzle rule: {0}")]
    InvalidModel(#[from] Violation),
}

/// Why an assignment is not an acceptable solution.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Violation {
    /// The assignment is for a different number of candidate edges.
    #[error("assignment covers {found} edges, expected {expected}")]
    WrongLength {
        /// Candidate edges in the model.
        expected: usize,
        /// Counts in the assignment.
        found: usize,
    },
    /// More than two bridges between one pair.
    #[error("edge {edge} carries {count} bridges")]
    CountOutOfRange {
        /// The offending edge.
        edge: EdgeId,
        /// Its count.
        count: u8,
    },
    /// An island with the wrong number of bridges; the lowest such island is reported.
    #[error("island {island} has {degree} bridges, needs {required}")]
    DegreeMismatch {
        /// The offending island.
        island: IslandId,
        /// Bridges it has.
        degree: u8,
        /// Bridges it needs.
        required: u8,
    },
    /// Two active edges whose bridges would intersect, lower id first.
    #[error("edges {0} and {1} are both active and cross")]
    Crossing(EdgeId, EdgeId),
    /// Some island cannot be reached from island 0.
    #[error("active bridges do not connect every island")]
    Disconnected,
}

/// Problems turning input into a [`Board`](crate::Board).
#[derive(Debug, Error)]
pub enum BoardError {
    /// No rows, or an empty first row.
    #[error("board has no cells")]
    Empty,
    /// A row differs in length from the first; rows count from 0, blank lines skipped.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// The offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this one.
        found: usize,
    },
    /// A token that is not a number from 0 to 255.
    #[error("row {row}: cannot read {token:?} as a cell value")]
    BadToken {
        /// The row it appears in.
        row: usize,
        /// The token itself.
        token: String,
    },
    /// The builder rejected the board.
    #[error("invalid board: {0:?}")]
    Invalid(Vec<BuilderInvalidReason>),
}
