//! Bridge counts per candidate edge, complete or partial.

use crate::model::EdgeId;

/// Most bridges allowed between one pair of islands.
pub const MAX_BRIDGES: u8 = 2;

/// Bridge counts chosen per candidate edge, indexed by [`EdgeId`].
///
/// Undecided edges read as 0, so a partially built assignment is still a valid value.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Assignment(Vec<u8>);

impl Assignment {
    /// No bridges anywhere.
    pub fn empty(edge_count: usize) -> Self {
        Self(vec![0; edge_count])
    }

    /// Wrap per-edge counts, indexed by [`EdgeId`].
    pub fn from_counts(counts: Vec<u8>) -> Self {
        Self(counts)
    }

    /// Bridges on `edge`; 0 while undecided.
    #[inline]
    pub fn count(&self, edge: EdgeId) -> u8 {
        self.0[edge]
    }

    #[inline]
    pub(crate) fn set(&mut self, edge: EdgeId, count: u8) {
        self.0[edge] = count;
    }

    /// Whether `edge` carries any bridge.
    #[inline]
    pub fn is_active(&self, edge: EdgeId) -> bool {
        self.0[edge] > 0
    }

    /// All counts, indexed by [`EdgeId`].
    pub fn counts(&self) -> &[u8] {
        &self.0
    }

    /// Number of edges covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this covers no edges at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Edges carrying at least one bridge, with their counts.
    pub fn active(&self) -> impl Iterator<Item = (EdgeId, u8)> + '_ {
        self.0.iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(edge, count)| (edge, *count))
    }
}
