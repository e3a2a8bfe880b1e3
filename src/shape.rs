//! Walking the square grid.

use serde::{Deserialize, Serialize};
use strum::{Display, VariantArray};

use crate::location::Location;

/// A step between orthogonally adjacent cells of a rectangular board.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl SquareStep {
    /// Forward directions are those which, upon stepping from one location to another, cause the destination to come later in row-major order.
    ///
    /// Candidate bridges are only ever discovered by walking in these directions, so every island pair is found exactly once.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// Stepping off the top or left edge wraps around to a huge coordinate, which any bounds check rejects.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    /// The orientation of any bridge running along this step.
    pub fn orientation(&self) -> Orientation {
        match self {
            Self::Up | Self::Down => Orientation::Vertical,
            Self::Left | Self::Right => Orientation::Horizontal,
        }
    }

    /// Determine the direction from `a` to `b` if the two share a row or a column and differ.
    ///
    /// Unlike [`Self::attempt_from`], `a` and `b` need not be adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        match (a.row() == b.row(), a.col() == b.col()) {
            (true, false) => Some(if a.col() < b.col() { Self::Right } else { Self::Left }),
            (false, true) => Some(if a.row() < b.row() { Self::Down } else { Self::Up }),
            _ => None,
        }
    }
}

/// Which way a bridge runs.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, Serialize, Deserialize)]
pub enum Orientation {
    /// Along a row.
    #[strum(serialize = "H")]
    Horizontal,
    /// Along a column.
    #[strum(serialize = "V")]
    Vertical,
}

impl Orientation {
    /// The glyph drawn on water cells covered by `count` bridges of this orientation.
    pub fn glyph(&self, count: u8) -> char {
        match (self, count) {
            (Self::Horizontal, 1) => '-',
            (Self::Horizontal, _) => '=',
            (Self::Vertical, 1) => '|',
            (Self::Vertical, _) => '║',
        }
    }
}
