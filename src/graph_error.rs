//! GraphError: unified error type for strata-graph public APIs
//!
//! All commit-time failures surface through this type. A failed commit never
//! mutates the prior graph version.

use thiserror::Error;

use crate::graph::ident::{EdgeId, NodeId};

/// Unified error type for strata-graph operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The batch would close a directed cycle. Carries the offending cycle as
    /// an ordered list of node ids whose first and last elements coincide.
    #[error("Cycle detected: {}", render_cycle(.cycle))]
    CycleDetected {
        /// The cycle, in traversal order, closed on itself.
        cycle: Vec<NodeId>,
    },
    /// An added edge references a node absent at the moment edges are applied.
    #[error("edge `{edge}` references endpoint `{endpoint}` which is not a node in the graph")]
    UnknownEndpoint {
        /// Id of the offending edge.
        edge: EdgeId,
        /// The missing endpoint.
        endpoint: NodeId,
    },
}

impl GraphError {
    /// The offending cycle, if this is a [`GraphError::CycleDetected`].
    pub fn cycle(&self) -> Option<&[NodeId]> {
        match self {
            GraphError::CycleDetected { cycle } => Some(cycle),
            _ => None,
        }
    }
}

fn render_cycle(cycle: &[NodeId]) -> String {
    let parts: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
    parts.join(" → ")
}
