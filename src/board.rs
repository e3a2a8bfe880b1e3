use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;

use crate::builder::{Builder, SquareBoardBuilder};
use crate::cell::{Cell, FrozenCell};
use crate::config::SolverConfig;
use crate::constraint::ConstraintModel;
use crate::error::{BoardError, SolveError};
use crate::location::{Dimension, Location};
use crate::model::IslandMap;
use crate::shape::SquareStep;
use crate::solution::Solution;
use crate::solver::{self, SolveReport};

/// A rectangular Bridges puzzle: islands with required bridge counts, on open water.
///
/// [`Board`]s should be built using a [`Builder`] such as [`SquareBoardBuilder`], or parsed from text with [`str::parse`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    // width, height
    pub(crate) dims: (Dimension, Dimension),
}

impl Board {
    /// Build a board from rows of cell values, where `0` is water and `1..=8` an island.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let (Some(width), Some(height)) = (NonZero::new(width), NonZero::new(rows.len())) else {
            return Err(BoardError::Empty);
        };

        if let Some((row, found)) = rows.iter()
            .map(|row| row.as_ref().len())
            .find_position(|found| *found != width.get()) {
            return Err(BoardError::Ragged { row, expected: width.get(), found });
        }

        let mut builder = SquareBoardBuilder::with_dims((width, height));
        for (y, row) in rows.iter().enumerate() {
            for (x, value) in row.as_ref().iter().enumerate() {
                if *value > 0 {
                    builder.add_island(Location(x, y), *value);
                }
            }
        }

        builder.build().map_err(|reasons| BoardError::Invalid(reasons.clone()))
    }

    /// Width and height.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// The islands of this board and the candidate edges between them.
    pub fn island_map(&self) -> IslandMap {
        IslandMap::from(self)
    }

    /// The [`ConstraintModel`] every strategy searches.
    pub fn constraint_model(&self) -> ConstraintModel {
        ConstraintModel::from(self.island_map())
    }

    /// Run the configured strategy and report on the attempt, successful or not.
    pub fn report(&self, config: &SolverConfig) -> SolveReport {
        solver::solve(&self.constraint_model(), config)
    }

    /// Solve this board with the configured strategy, consuming it and yielding the solved version.
    pub fn solve(self, config: &SolverConfig) -> Result<SolvedBoard, SolveError> {
        let solution = self.report(config).outcome?;
        Ok(self.with_solution(solution))
    }

    /// Pair this board with a solution found for it, e.g. from a [`SolveReport`], for printing.
    pub fn with_solution(self, solution: Solution) -> SolvedBoard {
        SolvedBoard { board: self, solution }
    }

    fn frozen(&self) -> Array2<FrozenCell> {
        self.cells.map(|cell| FrozenCell::from(*cell))
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// One row per non-blank line; values separated by commas, whitespace, or both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(|token| token.parse::<u8>().map_err(|_| BoardError::BadToken { row, token: token.to_string() }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(&rows)
    }
}

/// Dump `grid` row by row, one character per cell.
fn print(grid: Array2<char>) -> String {
    let mut out = String::with_capacity(grid.nrows() * (grid.ncols() + 1));

    for row in grid.rows() {
        for col in row {
            out.push(*col);
        }
        out.push('\n');
    }

    out
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(self.frozen().map(FrozenCell::display)))
    }
}

/// A [`Board`] together with a [`Solution`] for it.
#[derive(Clone, Debug)]
pub struct SolvedBoard {
    board: Board,
    solution: Solution,
}

impl SolvedBoard {
    /// The unsolved board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The bridges laid on it.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    fn frozen(&self) -> Array2<FrozenCell> {
        let mut grid = self.board.frozen();

        for bridge in &self.solution {
            let (start, end) = bridge.ends;
            let Some(step) = SquareStep::direction_to(start, end) else {
                continue;
            };

            let mut cursor = step.attempt_from(start);
            while cursor != end {
                grid[cursor.as_index()] = FrozenCell::Bridge { orientation: bridge.orientation, count: bridge.count };
                cursor = step.attempt_from(cursor);
            }
        }

        grid
    }
}

impl Display for SolvedBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(self.frozen().map(FrozenCell::display)))
    }
}
