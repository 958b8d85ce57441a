//! # strata-graph
//!
//! strata-graph is a persistent directed-acyclic-graph library with incremental
//! topological layering. Every node is assigned a non-negative layer index such
//! that each edge points from a lower layer to a strictly higher one, the set of
//! used indices stays contiguous (`0..L`), and any batch of mutations that would
//! close a cycle is rejected atomically with the offending cycle.
//!
//! ## Features
//! - Immutable graph versions: each committed batch yields a new [`graph::Graph`]
//!   value; indices untouched by the batch are shared with the prior version.
//! - Batched mutation through [`graph::Mutator`] and `with_mutations`, with
//!   single-item convenience entry points for nodes and edges.
//! - Incremental re-layering: only the subgraph affected by a batch is
//!   re-levelled (downward push, then upward tightening, then compaction).
//! - Hybrid cycle detection: per-edge reachability probes against the previous
//!   layer assignment for small batches, a full three-colour DFS otherwise.
//!
//! ## Usage
//! Add `strata-graph` as a dependency in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! strata-graph = "0.4"
//! ```
//!
//! Build a graph and inspect its layers:
//!
//! ```rust
//! use strata_graph::prelude::*;
//!
//! # fn main() -> Result<(), GraphError> {
//! let g = Graph::<(), ()>::new()
//!     .add_nodes([Node::bare("a"), Node::bare("b"), Node::bare("c")])?
//!     .add_edges([Edge::between("a", "b"), Edge::between("b", "c")])?;
//! assert_eq!(g.layer_of("c"), Some(2));
//! assert!(g.add_edge(Edge::between("c", "a")).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! Enable the `strict-invariants` feature to keep internal consistency checks
//! active in release builds.

pub mod graph;
pub mod graph_error;

/// A convenient prelude importing the most-used types:
pub mod prelude {
    pub use crate::graph::{Edge, EdgeId, Graph, Layer, LayerId, Mutator, Node, NodeId};
    pub use crate::graph_error::GraphError;
}
