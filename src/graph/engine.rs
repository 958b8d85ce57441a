//! Applies a change log to a scratch store.
//!
//! Application order within one batch is fixed: nodes added, nodes removed,
//! edges added, edges removed; insertion order within each list. Removing a
//! node enqueues its incident edges (snapshotted before the removal) into the
//! removed-edges list, so they are torn down by the same step that handles
//! explicit edge removals.
//!
//! The pass accumulates the *dirty set* driving the layer updater (every
//! added node plus the target of every added or removed edge) and the probe
//! list the incremental cycle check walks.

use std::collections::BTreeSet;

use crate::graph_error::GraphError;

use super::bounds::Payload;
use super::changes::ChangeLog;
use super::ident::{EdgeId, NodeId};
use super::store::GraphStore;

/// What a batch application leaves behind for the detector and the updater.
#[derive(Debug)]
pub(crate) struct BatchOutcome {
    /// Nodes whose layer assignment may be stale.
    pub(crate) dirty: BTreeSet<NodeId>,
    /// `(id, source, target)` of every added edge, for incremental probing.
    pub(crate) probes: Vec<(EdgeId, NodeId, NodeId)>,
    /// `|added nodes| + |added edges|`, the hybrid detector's change volume.
    pub(crate) change_count: usize,
}

/// Apply `log` to `store` in batch order.
///
/// # Errors
/// [`GraphError::UnknownEndpoint`] if an added edge references a node absent
/// at the moment edges are applied (including nodes removed earlier in the
/// same batch). The caller discards the scratch store on error.
pub(crate) fn apply<N: Payload, E: Payload>(
    store: &mut GraphStore<N, E>,
    log: ChangeLog<N, E>,
) -> Result<BatchOutcome, GraphError> {
    let ChangeLog {
        added_nodes,
        removed_nodes,
        added_edges,
        mut removed_edges,
    } = log;

    let change_count = added_nodes.len() + added_edges.len();
    let mut dirty = BTreeSet::new();
    let mut probes = Vec::with_capacity(added_edges.len());

    for node in added_nodes {
        dirty.insert(node.id().clone());
        store.insert_node(node);
    }

    for id in removed_nodes {
        if !store.has_node(id.as_str()) {
            continue;
        }
        removed_edges.extend(store.incident_edge_ids(id.as_str()));
        store.detach_node(id.as_str());
    }

    for edge in added_edges {
        dirty.insert(edge.target().clone());
        probes.push((edge.id().clone(), edge.source().clone(), edge.target().clone()));
        store.insert_edge(edge)?;
    }

    for id in removed_edges {
        if let Some(edge) = store.remove_edge(id.as_str()) {
            dirty.insert(edge.target().clone());
        }
    }

    Ok(BatchOutcome {
        dirty,
        probes,
        change_count,
    })
}
