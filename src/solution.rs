//! Solutions as lists of laid bridges.
//!
//! A [`Solution`] is assembled only from an assignment that has already been verified.

use itertools::Itertools;

use crate::assignment::Assignment;
use crate::constraint::ConstraintModel;
use crate::location::Location;
use crate::model::{EdgeId, IslandId};
use crate::shape::Orientation;

/// One or two bridges laid between two islands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Bridge {
    /// The candidate edge this bridge runs along.
    pub edge: EdgeId,
    /// Lower island id.
    pub from: IslandId,
    /// Higher island id.
    pub to: IslandId,
    /// 1 or 2.
    pub count: u8,
    /// Which way the bridge runs.
    pub orientation: Orientation,
    /// Locations of `from` and `to`.
    pub ends: (Location, Location),
}

/// The bridges of a verified assignment, in ascending edge order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Solution {
    bridges: Vec<Bridge>,
}

impl Solution {
    /// Keep only the active edges of `assignment`, resolved against `model`.
    pub fn assemble(model: &ConstraintModel, assignment: &Assignment) -> Self {
        let bridges = assignment.active()
            .map(|(edge, count)| {
                let candidate = model.edge(edge);
                let (from, to) = candidate.endpoints;
                Bridge {
                    edge,
                    from,
                    to,
                    count,
                    orientation: candidate.orientation,
                    ends: (model.island(from).location, model.island(to).location),
                }
            })
            .collect_vec();

        Self { bridges }
    }

    /// Bridges in ascending edge order.
    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    /// Number of island pairs joined.
    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    /// Whether no bridge was laid at all.
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    /// Bridges counted individually, so a double bridge counts twice.
    pub fn total_bridges(&self) -> u32 {
        self.bridges.iter().map(|bridge| bridge.count as u32).sum()
    }

    /// Bridges touching `island`.
    pub fn degree(&self, island: IslandId) -> u8 {
        self.bridges.iter()
            .filter(|bridge| bridge.from == island || bridge.to == island)
            .map(|bridge| bridge.count)
            .sum()
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Bridge;
    type IntoIter = std::slice::Iter<'a, Bridge>;

    fn into_iter(self) -> Self::IntoIter {
        self.bridges.iter()
    }
}
