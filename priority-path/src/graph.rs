//! Directed, non-negatively weighted graph over dense node ids.
//!
//! Nodes are `0..node_count`. Each node owns the ordered list of its outgoing
//! edges. Weights are `u64`, so the non-negative precondition of shortest-path
//! search holds by construction.

use thiserror::Error;

use crate::dijkstra::{self, ShortestPaths};

/// Dense node identifier, `0..node_count`.
pub type NodeId = usize;

/// An outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub to: NodeId,
    pub weight: u64,
}

/// Error type for graph construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {node} is out of range for a graph of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Adjacency-list graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// A graph of `node_count` isolated nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    /// Build a graph from `(from, to, weight)` triples, keeping their order
    /// within each source node.
    ///
    /// ```rust
    /// use priority_path::Graph;
    ///
    /// let g = Graph::from_edges(3, [(0, 1, 4), (1, 2, 1), (0, 2, 7)]).unwrap();
    /// assert_eq!(g.edge_count(), 3);
    /// assert!(Graph::from_edges(2, [(0, 2, 1)]).is_err());
    /// ```
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, u64)>,
    {
        let mut graph = Self::new(node_count);
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Append the edge `from -> to`. Parallel edges and self-loops are allowed.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: u64) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        self.adjacency[from].push(Edge { to, weight });
        self.edge_count += 1;
        Ok(())
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Outgoing edges of `node`, in insertion order.
    pub fn neighbors(&self, node: NodeId) -> Result<&[Edge]> {
        self.check(node)?;
        Ok(&self.adjacency[node])
    }

    /// Single-source shortest distances from `source`.
    pub fn shortest_paths(&self, source: NodeId) -> Result<ShortestPaths> {
        dijkstra::shortest_paths(self, source)
    }

    pub(crate) fn check(&self, node: NodeId) -> Result<()> {
        if node < self.node_count() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                node,
                node_count: self.node_count(),
            })
        }
    }

    /// Edges of a node already known to be in range.
    #[inline]
    pub(crate) fn edges_of(&self, node: NodeId) -> &[Edge] {
        &self.adjacency[node]
    }
}
