//! Layered graph layout for task dependency graphs
//!
//! This crate computes a deterministic (x, y) coordinate for every node
//! of a directed graph, for visualizing task/dependency graphs in a
//! debugger or profiler. Nodes are arranged in horizontal levels
//! respecting edge direction, ordered within each level to reduce edge
//! crossings, and mapped to coordinates using a caller-supplied spacing
//! unit. Each weakly connected component is laid out independently.
//!
//! The same input always yields the same output: node identifiers are
//! sorted into a canonical order at ingestion and every heuristic scans
//! nodes and slots in that order, so no result ever depends on hash
//! iteration order.
//!
//! # Example
//!
//! ```
//! use petgraph::graphmap::DiGraphMap;
//! use taskgraph_layout::LayeredLayout;
//!
//! // Create a graph
//! let mut graph = DiGraphMap::new();
//! graph.add_edge(1, 2, ());
//! graph.add_edge(1, 3, ());
//! graph.add_edge(2, 4, ());
//! graph.add_edge(3, 4, ());
//!
//! // Create a layout engine with a spacing unit
//! let engine = LayeredLayout::new(20.0);
//!
//! let layout = engine.layout(&graph).unwrap().expect("graph has nodes");
//! assert_eq!(layout.components.len(), 1);
//! ```

mod geometry;
mod graph;

pub mod layered;

// Re-export core types
pub use geometry::Point;
pub use layered::{ComponentLayout, GraphLayout, LayeredLayout, LayeredLayoutError};

// Re-export petgraph visitor traits for graph abstraction
pub use petgraph::visit::{GraphBase, IntoNeighborsDirected, IntoNodeIdentifiers};
pub use petgraph::Direction;
