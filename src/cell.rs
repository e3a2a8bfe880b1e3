use crate::shape::Orientation;

/// Largest bridge count an island can require: two bridges in each of four directions.
pub const MAX_REQUIRED: u8 = 8;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Cell {
    Island { required: u8 },
    #[default]
    Empty,
}

/// Cells, frozen for output or printing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum FrozenCell {
    Island { required: u8 },
    Bridge { orientation: Orientation, count: u8 },
    #[default]
    Water,
}

impl FrozenCell {
    pub(crate) fn display(&self) -> char {
        match self {
            // required never exceeds MAX_REQUIRED, so this is a single digit
            FrozenCell::Island { required } => char::from(b'0' + required),
            FrozenCell::Bridge { orientation, count } => orientation.glyph(*count),
            FrozenCell::Water => '.',
        }
    }
}

impl From<Cell> for FrozenCell {
    fn from(value: Cell) -> Self {
        match value {
            Cell::Island { required } => FrozenCell::Island { required },
            Cell::Empty => FrozenCell::Water,
        }
    }
}
