//! Single-source shortest paths (Dijkstra) with a lazy-deletion frontier.
//!
//! The frontier holds `(tentative distance, node)` entries. Improving a node's
//! distance pushes a new entry instead of updating the old one, so several
//! entries for one node may coexist. An entry whose distance no longer matches
//! the table when it is popped is stale and skipped.
//!
//! Cost is O((V + E) log E): the queue can hold one entry per relaxation. An
//! indexed heap with decrease-key would bound it by V instead.

use tracing::{debug, trace};

use crate::graph::{Graph, NodeId, Result};
use crate::queue::MinQueue;

/// Distances (and predecessor links) from one source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths {
    source: NodeId,
    distances: Vec<Option<u64>>,
    predecessors: Vec<Option<NodeId>>,
    settled: usize,
}

impl ShortestPaths {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest distance to `node`, or `None` if it is unreachable (or not a
    /// node of the graph).
    pub fn distance(&self, node: NodeId) -> Option<u64> {
        self.distances.get(node).copied().flatten()
    }

    /// Distance table indexed by node; `None` marks unreachable nodes.
    pub fn distances(&self) -> &[Option<u64>] {
        &self.distances
    }

    pub fn into_distances(self) -> Vec<Option<u64>> {
        self.distances
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// Number of nodes whose distance was finalized.
    pub fn settled(&self) -> usize {
        self.settled
    }

    /// Nodes on a shortest path from the source to `target`, both included.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        self.distance(target)?;

        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = self.predecessors[current]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Compute shortest distances from `source` to every node of `graph`.
///
/// ```rust
/// use priority_path::{shortest_paths, Graph};
///
/// let g = Graph::from_edges(4, [(0, 1, 1), (1, 2, 2), (0, 2, 5)]).unwrap();
/// let paths = shortest_paths(&g, 0).unwrap();
/// assert_eq!(paths.distance(2), Some(3));
/// assert_eq!(paths.distance(3), None);
/// assert_eq!(paths.path_to(2), Some(vec![0, 1, 2]));
/// ```
pub fn shortest_paths(graph: &Graph, source: NodeId) -> Result<ShortestPaths> {
    graph.check(source)?;

    let n = graph.node_count();
    let mut distances: Vec<Option<u64>> = vec![None; n];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; n];
    let mut frontier = MinQueue::with_capacity(n);
    let mut settled = 0usize;
    let mut stale = 0usize;

    distances[source] = Some(0);
    frontier.push(0u64, source);

    while let Some((distance, node)) = frontier.pop() {
        if distances[node] != Some(distance) {
            stale += 1;
            continue;
        }
        settled += 1;

        for edge in graph.edges_of(node) {
            let Some(candidate) = distance.checked_add(edge.weight) else {
                trace!(from = node, to = edge.to, "relaxation overflows u64; skipped");
                continue;
            };
            if distances[edge.to].map_or(true, |best| candidate < best) {
                distances[edge.to] = Some(candidate);
                predecessors[edge.to] = Some(node);
                frontier.push(candidate, edge.to);
            }
        }
    }

    debug!(source, settled, stale, nodes = n, "shortest paths computed");
    Ok(ShortestPaths {
        source,
        distances,
        predecessors,
        settled,
    })
}
