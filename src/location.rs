use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;

/// One grid coordinate, a row or a column.
pub type Coord = usize;
/// Width or height of a board; boards are never empty in either direction.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(x, y)` on a board. The top left corner is `Location(0, 0)`.
///
/// `x` is the column and `y` is the row.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The row (`y`) of this location.
    #[inline]
    pub fn row(&self) -> Coord {
        self.1
    }

    /// The column (`x`) of this location.
    #[inline]
    pub fn col(&self) -> Coord {
        self.0
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // row, col reads more naturally for grid puzzles
        write!(f, "({}, {})", self.row(), self.col())
    }
}
