//! Islands and the candidate edges between them.

use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;

use crate::board::Board;
use crate::cell::Cell;
use crate::location::{Coord, Location};
use crate::shape::{Orientation, SquareStep};

/// Stable index of an island; islands are numbered in row-major scan order starting at 0.
pub type IslandId = usize;
/// Index of a candidate edge in [`IslandMap::edges`].
pub type EdgeId = usize;

/// A numbered cell which must end up with exactly `required` incident bridges.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Island {
    /// Position in row-major scan order.
    pub id: IslandId,
    /// Where the island sits.
    pub location: Location,
    /// Bridges this island must end up with.
    pub required: u8,
}

/// The grid cells a straight bridge would occupy, endpoints included.
///
/// `line` is the row of a horizontal span or the column of a vertical one; `from < to` run along the other axis.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Span {
    /// Row of a horizontal span, column of a vertical one.
    pub line: Coord,
    /// Lower end along the other axis.
    pub from: Coord,
    /// Upper end along the other axis.
    pub to: Coord,
}

impl Span {
    /// Whether `coord` lies between the endpoints, exclusive.
    #[inline]
    pub fn strictly_contains(&self, coord: Coord) -> bool {
        self.from < coord && coord < self.to
    }
}

/// A geometrically legal bridge position between two islands, before any bridge count is chosen.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CandidateEdge {
    /// Position in [`IslandMap::edges`].
    pub id: EdgeId,
    /// Lower id first.
    pub endpoints: (IslandId, IslandId),
    /// Which way a bridge here would run.
    pub orientation: Orientation,
    /// Cells covered, endpoints included.
    pub span: Span,
}

impl CandidateEdge {
    /// Whether bridges along `self` and `other` would intersect between their endpoints.
    ///
    /// Only a horizontal and a vertical edge can cross; parallel edges never share a span because no island lies strictly inside a candidate.
    pub fn crosses(&self, other: &CandidateEdge) -> bool {
        match (self.orientation, other.orientation) {
            (Orientation::Horizontal, Orientation::Vertical) => {
                other.span.strictly_contains(self.span.line) && self.span.strictly_contains(other.span.line)
            }
            (Orientation::Vertical, Orientation::Horizontal) => other.crosses(self),
            _ => false,
        }
    }
}

/// The islands of a board and every candidate edge between them.
///
/// Two islands are linked by a candidate edge iff they share a row or column and only water lies between them.
#[derive(Clone, Debug)]
pub struct IslandMap {
    islands: Vec<Island>,
    edges: Vec<CandidateEdge>,
    graph: UnGraphMap<IslandId, EdgeId>,
}

impl From<&Board> for IslandMap {
    fn from(board: &Board) -> Self {
        Self::from_cells(&board.cells)
    }
}

impl IslandMap {
    pub(crate) fn from_cells(cells: &Array2<Cell>) -> Self {
        // indexed_iter visits a standard-layout array in row-major order, which fixes the id order
        let islands = cells.indexed_iter()
            .filter_map(|(index, cell)| match cell {
                Cell::Island { required } => Some((Location::from(index), *required)),
                Cell::Empty => None,
            })
            .enumerate()
            .map(|(id, (location, required))| Island { id, location, required })
            .collect::<Vec<_>>();

        let mut ids: Array2<Option<IslandId>> = Array2::from_elem(cells.raw_dim(), None);
        for island in &islands {
            ids[island.location.as_index()] = Some(island.id);
        }

        let mut graph = UnGraphMap::with_capacity(islands.len(), 2 * islands.len());
        let mut edges = Vec::with_capacity(2 * islands.len());

        for island in &islands {
            graph.add_node(island.id);
        }

        for island in &islands {
            // walking forward only, each neighbouring pair is discovered from its earlier island
            for step in SquareStep::FORWARD_VARIANTS {
                let mut cursor = step.attempt_from(island.location);
                // a wrapped or overlong cursor falls outside the array and ends the walk
                while let Some(found) = ids.get(cursor.as_index()) {
                    if let Some(other) = *found {
                        let id = edges.len();
                        edges.push(CandidateEdge {
                            id,
                            endpoints: (island.id, other),
                            orientation: step.orientation(),
                            span: Self::span_between(step.orientation(), island.location, cursor),
                        });
                        graph.add_edge(island.id, other, id);
                        break;
                    }
                    cursor = step.attempt_from(cursor);
                }
            }
        }

        Self { islands, edges, graph }
    }

    fn span_between(orientation: Orientation, a: Location, b: Location) -> Span {
        match orientation {
            Orientation::Horizontal => Span { line: a.row(), from: a.col().min(b.col()), to: a.col().max(b.col()) },
            Orientation::Vertical => Span { line: a.col(), from: a.row().min(b.row()), to: a.row().max(b.row()) },
        }
    }

    /// Islands in id order.
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Candidate edges in id order.
    pub fn edges(&self) -> &[CandidateEdge] {
        &self.edges
    }

    /// The island numbered `id`.
    pub fn island(&self, id: IslandId) -> &Island {
        &self.islands[id]
    }

    /// The candidate edge numbered `id`.
    pub fn edge(&self, id: EdgeId) -> &CandidateEdge {
        &self.edges[id]
    }

    /// Candidate edges touching `island`, in ascending id order.
    pub fn incident(&self, island: IslandId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.edges(island).map(|(_, _, edge)| *edge)
    }

    /// The candidate edge between `a` and `b`, if there is one.
    pub fn edge_between(&self, a: IslandId, b: IslandId) -> Option<EdgeId> {
        self.graph.edge_weight(a, b).copied()
    }

    /// The island-level graph; nodes are [`IslandId`]s and edge weights are [`EdgeId`]s.
    pub fn graph(&self) -> &UnGraphMap<IslandId, EdgeId> {
        &self.graph
    }
}
