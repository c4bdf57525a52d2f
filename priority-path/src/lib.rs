//! # priority-path
//!
//! Traversals driven by a lazy-deletion min-priority queue.
//!
//! ## Features
//!
//! - **Shortest paths**: Dijkstra over a directed graph with `u64` weights.
//!   Unreachable nodes report `None` rather than a large sentinel number.
//! - **K-way merge**: lazily combine any number of sorted sources, holding only
//!   one head per source in the queue.
//! - **MinQueue**: the shared priority queue, with FIFO order among equal keys
//!   and no decrease-key.
//!
//! ## Example
//!
//! ```rust
//! use priority_path::{merge_sorted, Graph};
//!
//! let g = Graph::from_edges(3, [(0, 1, 4), (1, 2, 1), (0, 2, 7)]).unwrap();
//! let paths = g.shortest_paths(0).unwrap();
//! assert_eq!(paths.distances(), [Some(0), Some(4), Some(5)]);
//!
//! let merged: Vec<u32> = merge_sorted([vec![1, 5], vec![2, 3]]).collect();
//! assert_eq!(merged, [1, 2, 3, 5]);
//! ```

#![warn(clippy::all)]

pub mod dijkstra;
pub mod graph;
pub mod merge;
pub mod queue;

pub use dijkstra::{shortest_paths, ShortestPaths};
pub use graph::{Edge, Graph, GraphError, NodeId};
pub use merge::{merge_sorted, merge_sorted_by_key, MergeSorted, MergeSortedByKey};
pub use queue::MinQueue;

#[cfg(test)]
mod proptests;
