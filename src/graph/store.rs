//! The persistent index store backing a graph version.
//!
//! Seven id-keyed indices are held behind individual `Arc` handles. Cloning a
//! store is a handle copy; commits mutate through [`Arc::make_mut`], so a
//! batch deep-copies only the indices it actually touches and everything else
//! stays shared with the prior version. A failed commit simply drops its
//! scratch store, leaving every shared index intact.
//!
//! Outgoing and incoming adjacency are perfect mirrors of the edge map:
//! `succs[u]` and `preds[v]` hold the id of every edge `u→v` and nothing
//! else. Hash-map + `BTreeSet` adjacency yields average-case O(log d) updates
//! and deterministic neighbour order.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::graph_error::GraphError;

use super::bounds::Payload;
use super::entity::{Edge, Node};
use super::ident::{EdgeId, LayerId, NodeId};
use super::layer::Layer;

/// Iterator over the edge-id set of one adjacency slot.
pub(crate) type EdgeIdSetIter<'a> =
    std::iter::Flatten<std::option::IntoIter<&'a BTreeSet<EdgeId>>>;

/// The index bundle of one graph version.
#[derive(Clone, Debug)]
pub(crate) struct GraphStore<N, E> {
    /// Node records by id.
    pub(crate) nodes: Arc<HashMap<NodeId, Node<N>>>,
    /// Edge records by derived id.
    pub(crate) edges: Arc<HashMap<EdgeId, Edge<E>>>,
    /// Incoming edge ids per node.
    pub(crate) preds: Arc<HashMap<NodeId, BTreeSet<EdgeId>>>,
    /// Outgoing edge ids per node.
    pub(crate) succs: Arc<HashMap<NodeId, BTreeSet<EdgeId>>>,
    /// Layer assignment per node.
    pub(crate) node_layer: Arc<HashMap<NodeId, LayerId>>,
    /// Layer records by stable id.
    pub(crate) layers: Arc<HashMap<LayerId, Layer>>,
    /// Layer ids in positional order; a layer's position equals its `index`.
    pub(crate) layer_order: Arc<Vec<LayerId>>,
    /// Next unallocated layer id.
    next_layer_id: u64,
}

impl<N, E> Default for GraphStore<N, E> {
    fn default() -> Self {
        GraphStore {
            nodes: Arc::new(HashMap::new()),
            edges: Arc::new(HashMap::new()),
            preds: Arc::new(HashMap::new()),
            succs: Arc::new(HashMap::new()),
            node_layer: Arc::new(HashMap::new()),
            layers: Arc::new(HashMap::new()),
            layer_order: Arc::new(Vec::new()),
            next_layer_id: 0,
        }
    }
}

impl<N, E> GraphStore<N, E> {
    #[inline]
    pub(crate) fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub(crate) fn node(&self, id: &str) -> Option<&Node<N>> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn edge(&self, id: &str) -> Option<&Edge<E>> {
        self.edges.get(id)
    }

    /// Ids of edges ending at `id`.
    #[inline]
    pub(crate) fn pred_edge_ids<'a>(&'a self, id: &str) -> EdgeIdSetIter<'a> {
        self.preds.get(id).into_iter().flatten()
    }

    /// Ids of edges starting at `id`.
    #[inline]
    pub(crate) fn succ_edge_ids<'a>(&'a self, id: &str) -> EdgeIdSetIter<'a> {
        self.succs.get(id).into_iter().flatten()
    }

    /// Sources of the edges ending at `id` (one entry per edge, so a node
    /// connected through several ports appears once per edge).
    pub(crate) fn pred_node_ids<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = &'a NodeId> + 'a> {
        Box::new(
            self.pred_edge_ids(id)
                .filter_map(|eid| self.edges.get(eid.as_str()).map(|e| e.source())),
        )
    }

    /// Targets of the edges starting at `id`.
    pub(crate) fn succ_node_ids<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = &'a NodeId> + 'a> {
        Box::new(
            self.succ_edge_ids(id)
                .filter_map(|eid| self.edges.get(eid.as_str()).map(|e| e.target())),
        )
    }

    /// Every edge id incident to `id`, incoming and outgoing.
    pub(crate) fn incident_edge_ids(&self, id: &str) -> Vec<EdgeId> {
        self.pred_edge_ids(id)
            .chain(self.succ_edge_ids(id))
            .cloned()
            .collect()
    }

    #[inline]
    pub(crate) fn layer_id_of(&self, id: &str) -> Option<LayerId> {
        self.node_layer.get(id).copied()
    }

    /// Positional layer index of node `id`, if present.
    #[inline]
    pub(crate) fn layer_index_of(&self, id: &str) -> Option<usize> {
        let layer_id = self.layer_id_of(id)?;
        self.layers.get(&layer_id).map(Layer::index)
    }

    /// Highest layer index among the parents of `id`.
    pub(crate) fn max_pred_index(&self, id: &str) -> Option<usize> {
        self.pred_node_ids(id)
            .filter_map(|p| self.layer_index_of(p.as_str()))
            .max()
    }

    /// Lowest layer index among the children of `id`.
    pub(crate) fn min_succ_index(&self, id: &str) -> Option<usize> {
        self.succ_node_ids(id)
            .filter_map(|c| self.layer_index_of(c.as_str()))
            .min()
    }
}

impl<N: Payload, E: Payload> GraphStore<N, E> {
    #[inline]
    fn nodes_mut(&mut self) -> &mut HashMap<NodeId, Node<N>> {
        Arc::make_mut(&mut self.nodes)
    }

    #[inline]
    fn edges_mut(&mut self) -> &mut HashMap<EdgeId, Edge<E>> {
        Arc::make_mut(&mut self.edges)
    }

    #[inline]
    fn preds_mut(&mut self) -> &mut HashMap<NodeId, BTreeSet<EdgeId>> {
        Arc::make_mut(&mut self.preds)
    }

    #[inline]
    fn succs_mut(&mut self) -> &mut HashMap<NodeId, BTreeSet<EdgeId>> {
        Arc::make_mut(&mut self.succs)
    }

    #[inline]
    fn node_layer_mut(&mut self) -> &mut HashMap<NodeId, LayerId> {
        Arc::make_mut(&mut self.node_layer)
    }

    #[inline]
    fn layers_mut(&mut self) -> &mut HashMap<LayerId, Layer> {
        Arc::make_mut(&mut self.layers)
    }

    /// Install a node. A fresh id gets empty adjacency slots and a seat on
    /// layer 0 (created if absent); re-adding an existing id replaces the
    /// payload only, leaving adjacency and layer assignment untouched.
    pub(crate) fn insert_node(&mut self, node: Node<N>) {
        if let Some(existing) = self.nodes_mut().get_mut(node.id().as_str()) {
            existing.data = node.data;
            return;
        }
        let id = node.id().clone();
        self.nodes_mut().insert(id.clone(), node);
        self.preds_mut().insert(id.clone(), BTreeSet::new());
        self.succs_mut().insert(id.clone(), BTreeSet::new());
        let layer_id = self.layer_by_index(0);
        // allocated just above
        self.layers_mut().get_mut(&layer_id).unwrap().insert(id.clone());
        self.node_layer_mut().insert(id, layer_id);
    }

    /// Drop a node from every index. The node's layer keeps its (possibly
    /// empty) slot; compaction is deferred to the layer updater. Incident
    /// edges are *not* removed here; the engine enqueues them for the
    /// remove-edges step.
    pub(crate) fn detach_node(&mut self, id: &str) {
        if let Some(layer_id) = self.node_layer.get(id).copied() {
            if let Some(layer) = self.layers_mut().get_mut(&layer_id) {
                layer.remove(id);
            }
        }
        self.nodes_mut().remove(id);
        self.preds_mut().remove(id);
        self.succs_mut().remove(id);
        self.node_layer_mut().remove(id);
    }

    /// Register an edge and its adjacency mirrors. Re-adding an existing id
    /// overwrites the record (last-writer-wins within a batch).
    ///
    /// # Errors
    /// [`GraphError::UnknownEndpoint`] if either endpoint is absent from the
    /// node map at this moment.
    pub(crate) fn insert_edge(&mut self, edge: Edge<E>) -> Result<(), GraphError> {
        for endpoint in [edge.source(), edge.target()] {
            if !self.nodes.contains_key(endpoint.as_str()) {
                return Err(GraphError::UnknownEndpoint {
                    edge: edge.id().clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
        let id = edge.id().clone();
        let source = edge.source().clone();
        let target = edge.target().clone();
        // adjacency is total over nodes, checked above
        self.succs_mut()
            .get_mut(source.as_str())
            .unwrap()
            .insert(id.clone());
        self.preds_mut()
            .get_mut(target.as_str())
            .unwrap()
            .insert(id.clone());
        self.edges_mut().insert(id, edge);
        Ok(())
    }

    /// Remove an edge and its adjacency mirrors, returning the record if it
    /// existed. Endpoint slots may already be gone when the endpoint node was
    /// removed in the same batch.
    pub(crate) fn remove_edge(&mut self, id: &str) -> Option<Edge<E>> {
        let edge = self.edges_mut().remove(id)?;
        if let Some(set) = self.succs_mut().get_mut(edge.source().as_str()) {
            set.remove(id);
        }
        if let Some(set) = self.preds_mut().get_mut(edge.target().as_str()) {
            set.remove(id);
        }
        Some(edge)
    }

    /// Return the layer id at position `index`, appending freshly allocated
    /// empty layers until that position exists.
    pub(crate) fn layer_by_index(&mut self, index: usize) -> LayerId {
        while self.layer_order.len() <= index {
            let id = LayerId::new(self.next_layer_id);
            self.next_layer_id += 1;
            let position = self.layer_order.len();
            self.layers_mut().insert(id, Layer::new(id, position));
            Arc::make_mut(&mut self.layer_order).push(id);
        }
        self.layer_order[index]
    }

    /// Reseat node `id` on the layer at `target_index` (created on demand).
    /// If the move empties the source layer, that layer is deleted and all
    /// subsequent indices are decremented so positions stay contiguous.
    pub(crate) fn move_node(&mut self, id: &NodeId, target_index: usize) {
        let Some(current_id) = self.node_layer.get(id.as_str()).copied() else {
            return;
        };
        let Some(current_index) = self.layers.get(&current_id).map(Layer::index) else {
            return;
        };
        if current_index == target_index {
            return;
        }
        let target_id = self.layer_by_index(target_index);
        {
            let layers = self.layers_mut();
            if let Some(source) = layers.get_mut(&current_id) {
                source.remove(id.as_str());
            }
            // allocated by layer_by_index above
            layers.get_mut(&target_id).unwrap().insert(id.clone());
        }
        self.node_layer_mut().insert(id.clone(), target_id);
        if self.layers.get(&current_id).is_some_and(Layer::is_empty) {
            self.remove_layer(current_id);
        }
    }

    /// Delete a layer record and close the positional gap it leaves.
    fn remove_layer(&mut self, layer_id: LayerId) {
        let Some(position) = self.layer_order.iter().position(|l| *l == layer_id) else {
            return;
        };
        Arc::make_mut(&mut self.layer_order).remove(position);
        self.layers_mut().remove(&layer_id);
        let order = Arc::clone(&self.layer_order);
        let layers = self.layers_mut();
        for lid in &order[position..] {
            // every listed layer has a record
            let layer = layers.get_mut(lid).unwrap();
            layer.set_index(layer.index() - 1);
        }
    }

    /// Drop every empty layer and renumber the survivors contiguously.
    ///
    /// `move_node` compacts the layer it empties, but node removals can empty
    /// a layer no move ever touches; this runs once at the end of each layer
    /// update.
    pub(crate) fn sweep_empty_layers(&mut self) {
        let mut retained = Vec::with_capacity(self.layer_order.len());
        let mut dropped = Vec::new();
        for lid in self.layer_order.iter() {
            if self.layers.get(lid).is_some_and(Layer::is_empty) {
                dropped.push(*lid);
            } else {
                retained.push(*lid);
            }
        }
        if dropped.is_empty() {
            return;
        }
        {
            let layers = self.layers_mut();
            for lid in &dropped {
                layers.remove(lid);
            }
            for (position, lid) in retained.iter().enumerate() {
                // retained ids all have records
                let layer = layers.get_mut(lid).unwrap();
                if layer.index() != position {
                    layer.set_index(position);
                }
            }
        }
        *Arc::make_mut(&mut self.layer_order) = retained;
    }
}

#[cfg(any(debug_assertions, feature = "strict-invariants"))]
impl<N, E> GraphStore<N, E> {
    /// Full consistency check of the committed index bundle. Called at the
    /// end of every commit in debug / `strict-invariants` builds.
    pub(crate) fn debug_assert_invariants(&self) {
        use super::_debug_invariants::{inv_assert, inv_assert_eq};

        // layer assignment is total over nodes and refers to live layers
        inv_assert_eq!(
            self.node_layer.len(),
            self.nodes.len(),
            "layer map must be total over the node map"
        );
        for (id, layer_id) in self.node_layer.iter() {
            inv_assert!(
                self.nodes.contains_key(id.as_str()),
                "layer map entry for unknown node {id}"
            );
            let Some(layer) = self.layers.get(layer_id) else {
                inv_assert!(false, "node {id} assigned to missing layer {layer_id}");
                continue;
            };
            inv_assert!(
                layer.contains(id.as_str()),
                "layer {layer_id} does not list its node {id}"
            );
        }

        // layer list is contiguous, duplicate-free and nonempty per slot
        inv_assert_eq!(
            self.layers.len(),
            self.layer_order.len(),
            "layer map and layer list must agree"
        );
        let mut seen_nodes = 0usize;
        for (position, lid) in self.layer_order.iter().enumerate() {
            let Some(layer) = self.layers.get(lid) else {
                inv_assert!(false, "layer list references missing layer {lid}");
                continue;
            };
            inv_assert_eq!(
                layer.index(),
                position,
                "layer {lid} index disagrees with its list position"
            );
            inv_assert!(!layer.is_empty(), "committed layer {lid} is empty");
            for node in layer.nodes() {
                inv_assert_eq!(
                    self.node_layer.get(node.as_str()),
                    Some(lid),
                    "layer {lid} lists node {node} assigned elsewhere"
                );
            }
            seen_nodes += layer.len();
        }
        inv_assert_eq!(seen_nodes, self.nodes.len(), "layers must partition the nodes");

        // adjacency maps mirror the edge map exactly
        let mirrored: usize = self.preds.values().map(BTreeSet::len).sum();
        inv_assert_eq!(mirrored, self.edges.len(), "incoming mirror out of sync");
        let mirrored: usize = self.succs.values().map(BTreeSet::len).sum();
        inv_assert_eq!(mirrored, self.edges.len(), "outgoing mirror out of sync");
        for (eid, edge) in self.edges.iter() {
            inv_assert!(
                self.succs
                    .get(edge.source().as_str())
                    .is_some_and(|s| s.contains(eid.as_str())),
                "edge {eid} missing from outgoing mirror"
            );
            inv_assert!(
                self.preds
                    .get(edge.target().as_str())
                    .is_some_and(|s| s.contains(eid.as_str())),
                "edge {eid} missing from incoming mirror"
            );
        }

        // every edge climbs strictly upward through the layers
        for (eid, edge) in self.edges.iter() {
            let src = self.layer_index_of(edge.source().as_str());
            let dst = self.layer_index_of(edge.target().as_str());
            inv_assert!(
                matches!((src, dst), (Some(s), Some(t)) if s < t),
                "edge {eid} does not climb: {src:?} -> {dst:?}"
            );
        }
    }
}
