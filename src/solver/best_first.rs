use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::{debug, trace};

use crate::assignment::{Assignment, MAX_BRIDGES};
use crate::constraint::ConstraintModel;
use crate::error::SolveError;
use crate::model::{EdgeId, IslandId};
use crate::solver::{Deadline, EdgeOrder, SearchStats, Strategy, StrategyKind};

/// Best-first search over partial assignments.
///
/// A state decides the edges of the [`EdgeOrder`] one at a time. Its priority is `g + h`, where `g` counts the
/// decided edges and `h` is the total number of bridges islands are still missing. A child whose island overflows,
/// or needs more bridges than its undecided edges can carry, is discarded rather than queued.
///
/// Goals are fully decided states with `h = 0`; they are accepted only if connected, otherwise the search goes on.
#[derive(Copy, Clone, Debug, Default)]
pub struct BestFirst {
    order: EdgeOrder,
}

impl BestFirst {
    /// Decide edges in `order`.
    pub fn new(order: EdgeOrder) -> Self {
        Self { order }
    }
}

#[derive(Clone)]
struct Node {
    // index into the edge order of the next edge to decide
    next: usize,
    assignment: Assignment,
    degrees: Vec<u8>,
    missing: u32,
}

impl Node {
    fn priority(&self) -> u32 {
        self.next as u32 + self.missing
    }
}

/// Two nodes with the same key have the same set of completions, so only the first one popped is expanded.
///
/// Degrees alone do not pin that down: the undecided edges already blocked by a crossing, and the partition
/// of islands into components, also decide which completions are valid and connected.
#[derive(Eq, PartialEq, Hash)]
struct NodeKey {
    next: usize,
    degrees: Vec<u8>,
    blocked: Vec<EdgeId>,
    components: Vec<usize>,
}

struct Queued {
    priority: u32,
    seq: u64,
    node: Node,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest priority first, then deepest, then oldest
        other.priority.cmp(&self.priority)
            .then_with(|| self.node.next.cmp(&other.node.next))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

struct Frontier<'a> {
    model: &'a ConstraintModel,
    order: Vec<EdgeId>,
    // per island, ascending positions in `order` of its incident edges
    positions: Vec<Vec<usize>>,
    heap: BinaryHeap<Queued>,
    seq: u64,
}

impl<'a> Frontier<'a> {
    fn new(model: &'a ConstraintModel, order: Vec<EdgeId>) -> Self {
        let mut positions = vec![Vec::new(); model.island_count()];
        for (position, edge) in order.iter().enumerate() {
            let (a, b) = model.edge(*edge).endpoints;
            positions[a].push(position);
            positions[b].push(position);
        }

        Self { model, order, positions, heap: BinaryHeap::new(), seq: 0 }
    }

    fn push(&mut self, node: Node) {
        self.heap.push(Queued { priority: node.priority(), seq: self.seq, node });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<Node> {
        self.heap.pop().map(|queued| queued.node)
    }

    /// Undecided incident edges of `island` once the first `decided` edges of the order are fixed.
    fn undecided(&self, island: IslandId, decided: usize) -> u8 {
        let positions = &self.positions[island];
        (positions.len() - positions.partition_point(|position| *position < decided)) as u8
    }

    fn key(&self, node: &Node) -> NodeKey {
        let blocked = self.order[node.next..].iter()
            .copied()
            .filter(|edge| self.model.crossings_of(*edge).iter().any(|other| node.assignment.is_active(*other)))
            .collect();

        NodeKey {
            next: node.next,
            degrees: node.degrees.clone(),
            blocked,
            components: self.model.components(&node.assignment),
        }
    }

    fn root(&self) -> Option<Node> {
        let node = Node {
            next: 0,
            assignment: Assignment::empty(self.model.edge_count()),
            degrees: vec![0; self.model.island_count()],
            missing: self.model.islands().iter().map(|island| island.required as u32).sum(),
        };

        // an island nobody can reach leaves the root itself dead
        self.model.islands().iter()
            .all(|island| island.required <= self.undecided(island.id, 0) * MAX_BRIDGES)
            .then_some(node)
    }

    fn child(&self, parent: &Node, count: u8) -> Option<Node> {
        let edge = self.order[parent.next];
        let (a, b) = self.model.edge(edge).endpoints;

        if parent.degrees[a] + count > self.model.island(a).required
            || parent.degrees[b] + count > self.model.island(b).required {
            return None;
        }
        if count > 0 && self.model.crossings_of(edge).iter().any(|other| parent.assignment.is_active(*other)) {
            return None;
        }

        let mut node = parent.clone();
        node.next += 1;
        node.assignment.set(edge, count);
        node.degrees[a] += count;
        node.degrees[b] += count;
        node.missing -= 2 * count as u32;

        // only the two endpoints lost an undecided edge, so only they can have become unreachable
        for island in [a, b] {
            let missing = self.model.island(island).required - node.degrees[island];
            if missing > self.undecided(island, node.next) * MAX_BRIDGES {
                return None;
            }
        }

        Some(node)
    }
}

impl Strategy for BestFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BestFirst
    }

    fn solve(&self, model: &ConstraintModel, deadline: &mut Deadline, stats: &mut SearchStats) -> Result<Assignment, SolveError> {
        let mut frontier = Frontier::new(model, self.order.arrange(model));
        let mut visited: HashSet<NodeKey> = HashSet::new();

        if let Some(root) = frontier.root() {
            frontier.push(root);
        }

        while let Some(node) = frontier.pop() {
            deadline.check()?;

            if !visited.insert(frontier.key(&node)) {
                continue;
            }
            stats.nodes_expanded += 1;

            if node.next == frontier.order.len() {
                if node.missing == 0 && model.is_connected(&node.assignment) {
                    return Ok(node.assignment);
                }
                trace!(event = "goal_rejected", missing = node.missing, nodes = stats.nodes_expanded);
                continue;
            }

            for count in 0..=MAX_BRIDGES {
                if let Some(child) = frontier.child(&node, count) {
                    frontier.push(child);
                }
            }
        }

        debug!(event = "exhausted", nodes = stats.nodes_expanded);
        Err(SolveError::SearchExhausted)
    }
}
