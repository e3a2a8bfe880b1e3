//! Whether a set of bridges joins every island.

use petgraph::graphmap::UnGraphMap;
use petgraph::unionfind::UnionFind;
use petgraph::visit::Bfs;

use crate::model::IslandId;

/// Whether `links` join all `island_count` islands into a single component.
///
/// Traversal starts from island 0. Zero or one island is trivially connected.
pub fn is_connected<I>(island_count: usize, links: I) -> bool
where
    I: IntoIterator<Item = (IslandId, IslandId)>,
{
    if island_count <= 1 {
        return true;
    }

    let mut graph: UnGraphMap<IslandId, ()> = UnGraphMap::with_capacity(island_count, island_count);
    for island in 0..island_count {
        graph.add_node(island);
    }
    for (a, b) in links {
        graph.add_edge(a, b, ());
    }

    let mut bfs = Bfs::new(&graph, 0);
    let mut reached = 0;
    while bfs.next(&graph).is_some() {
        reached += 1;
    }

    reached == island_count
}

/// Label every island with its component under `links`.
///
/// Labels are canonical: components are numbered 0, 1, ... by their lowest island, so equal partitions give equal labelings.
pub fn component_labels<I>(island_count: usize, links: I) -> Vec<usize>
where
    I: IntoIterator<Item = (IslandId, IslandId)>,
{
    let mut sets: UnionFind<IslandId> = UnionFind::new(island_count);
    for (a, b) in links {
        sets.union(a, b);
    }

    let representatives = sets.into_labeling();
    let mut canonical = vec![usize::MAX; island_count];
    let mut labels = Vec::with_capacity(island_count);
    let mut next = 0;
    for representative in representatives {
        if canonical[representative] == usize::MAX {
            canonical[representative] = next;
            next += 1;
        }
        labels.push(canonical[representative]);
    }

    labels
}
