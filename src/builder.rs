//! Builders which validate boards as they are put together.

use std::ops::IndexMut;

use ndarray::{Array2, AssignElem};

use crate::board::Board;
use crate::cell::{Cell, MAX_REQUIRED};
use crate::location::{Dimension, Location};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A feature like an island was inserted outside the bounds specified by `dims` on a builder.
    FeatureOutOfBounds,
    /// An island was asked to carry more bridges than four directions of double bridges allow.
    IslandValueOutOfRange,
}

/// Functionality all builders must implement.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
pub trait Builder: Clone {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(x, y)` order.
    fn with_dims(dims: (Dimension, Dimension)) -> Self;
    /// Place an island requiring `required` bridges at `location`, replacing whatever was there.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds,
    /// or an [`IslandValueOutOfRange`](BuilderInvalidReason::IslandValueOutOfRange) invalid state if `required` exceeds 8.
    /// If the builder is already in an invalid state, this function does nothing.
    fn add_island(&mut self, location: Location, required: u8) -> &mut Self;
    /// Remove the most recently added island.
    ///
    /// If the builder is in an invalid state or no islands are present, this function does nothing.
    fn pop_island(&mut self) -> &mut Self;
    /// Turn `location` back into open water.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    fn drop_location(&mut self, location: Location) -> &mut Self;
    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>>;
    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    fn build(&self) -> Result<Board, &Vec<BuilderInvalidReason>>;
}

/// A builder for rectangular Bridges boards.
#[derive(Clone)]
pub struct SquareBoardBuilder {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<Cell>,
    // most recent last, for pop_island
    placed: Vec<Location>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Builder for SquareBoardBuilder {
    fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_simple_fn((dims.1.get(), dims.0.get()), Cell::default),
            placed: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    fn add_island(&mut self, location: Location, required: u8) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        if required > MAX_REQUIRED {
            self.invalid_reasons.push(BuilderInvalidReason::IslandValueOutOfRange);
            return self;
        }

        self.cells.index_mut(location.as_index()).assign_elem(Cell::Island { required });
        self.placed.retain(|placed| *placed != location);
        self.placed.push(location);

        self
    }

    fn pop_island(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if let Some(location) = self.placed.pop() {
            self.cells.index_mut(location.as_index()).assign_elem(Cell::Empty);
        }

        self
    }

    fn drop_location(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        self.cells.index_mut(location.as_index()).assign_elem(Cell::Empty);
        self.placed.retain(|placed| *placed != location);

        self
    }

    fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    fn build(&self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(Board {
            cells: self.cells.clone(),
            dims: self.dims,
        })
    }
}

impl SquareBoardBuilder {
    #[inline]
    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.dims.0.get() && location.1 < self.dims.1.get()
    }
}
