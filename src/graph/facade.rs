//! The public graph value.
//!
//! A [`Graph`] is an immutable snapshot: queries borrow from it, mutations
//! build and commit a batch against it and hand back a *new* graph whose
//! `prior` points at the old one. Indices a batch does not touch are shared
//! between the versions, so holding a chain of graphs is cheap.
//!
//! Commit is atomic. Either a new valid graph comes back, or the batch is
//! rejected ([`GraphError::CycleDetected`] / [`GraphError::UnknownEndpoint`])
//! and the receiver is observably unchanged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::graph_error::GraphError;

use super::_debug_invariants::debug_invariants;
use super::bounds::Payload;
use super::changes::{ChangeLog, Mutator};
use super::cycle;
use super::engine;
use super::entity::{Edge, Node};
use super::ident::{EdgeId, LayerId, NodeId};
use super::layer::Layer;
use super::layering;
use super::store::GraphStore;

/// One immutable version of a layered DAG.
///
/// # Type Parameters
/// - `N`: opaque node payload. Defaults to `()`.
/// - `E`: opaque edge payload. Defaults to `()`.
#[derive(Clone)]
pub struct Graph<N = (), E = ()> {
    store: GraphStore<N, E>,
    prior: Option<Arc<Graph<N, E>>>,
    sorted_ids: OnceCell<Arc<[NodeId]>>,
}

impl<N, E> Graph<N, E> {
    /// An empty graph with no layers and no prior version.
    pub fn new() -> Self {
        Graph {
            store: GraphStore::default(),
            prior: None,
            sorted_ids: OnceCell::new(),
        }
    }

    /// Whether the graph holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.nodes.is_empty()
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.store.nodes.len()
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.store.edges.len()
    }

    /// Number of (nonempty) layers.
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.store.layer_order.len()
    }

    /// Iterate over all node records, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<N>> {
        self.store.nodes.values()
    }

    /// Iterate over all edge records, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> {
        self.store.edges.values()
    }

    /// All node ids, sorted lexicographically. Computed once per version and
    /// cached.
    pub fn node_ids(&self) -> &[NodeId] {
        self.sorted_ids
            .get_or_init(|| {
                let mut ids: Vec<NodeId> = self.store.nodes.keys().cloned().collect();
                ids.sort_unstable();
                ids.into()
            })
            .as_ref()
    }

    /// Whether a node with this id exists.
    #[inline]
    pub fn has_node(&self, id: &str) -> bool {
        self.store.has_node(id)
    }

    /// Whether an edge with this derived id exists.
    #[inline]
    pub fn has_edge(&self, edge_id: &str) -> bool {
        self.store.edges.contains_key(edge_id)
    }

    /// Look up a node record.
    #[inline]
    pub fn get_node(&self, id: &str) -> Option<&Node<N>> {
        self.store.node(id)
    }

    /// Look up an edge record by its derived id.
    #[inline]
    pub fn get_edge(&self, edge_id: &str) -> Option<&Edge<E>> {
        self.store.edge(edge_id)
    }

    /// Ids of the distinct nodes with an edge into `id`, sorted.
    pub fn pred_nodes(&self, id: &str) -> Vec<NodeId> {
        let unique: std::collections::BTreeSet<NodeId> =
            self.store.pred_node_ids(id).cloned().collect();
        unique.into_iter().collect()
    }

    /// Ids of the distinct nodes `id` has an edge to, sorted.
    pub fn succ_nodes(&self, id: &str) -> Vec<NodeId> {
        let unique: std::collections::BTreeSet<NodeId> =
            self.store.succ_node_ids(id).cloned().collect();
        unique.into_iter().collect()
    }

    /// The edges ending at `id`.
    pub fn pred_edges<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = &'a Edge<E>> + 'a> {
        Box::new(
            self.store
                .pred_edge_ids(id)
                .filter_map(|eid| self.store.edge(eid.as_str())),
        )
    }

    /// The edges starting at `id`.
    pub fn succ_edges<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = &'a Edge<E>> + 'a> {
        Box::new(
            self.store
                .succ_edge_ids(id)
                .filter_map(|eid| self.store.edge(eid.as_str())),
        )
    }

    /// The layer index of node `id`, or `None` for an unknown id (consistent
    /// with [`has_node`](Graph::has_node)).
    #[inline]
    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.store.layer_index_of(id)
    }

    /// The stable layer id node `id` is assigned to.
    #[inline]
    pub fn layer_id_of(&self, id: &str) -> Option<LayerId> {
        self.store.layer_id_of(id)
    }

    /// The layer records by stable id.
    #[inline]
    pub fn layers(&self) -> &HashMap<LayerId, Layer> {
        &self.store.layers
    }

    /// One layer record.
    #[inline]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.store.layers.get(&id)
    }

    /// The node → layer-id assignment.
    #[inline]
    pub fn layer_map(&self) -> &HashMap<NodeId, LayerId> {
        &self.store.node_layer
    }

    /// Layer ids in positional order; a layer's position equals its index.
    #[inline]
    pub fn layer_list(&self) -> &[LayerId] {
        &self.store.layer_order
    }

    /// The previous graph version this one was committed against, if any.
    /// Relation only; queries never read through it.
    #[inline]
    pub fn prior(&self) -> Option<&Graph<N, E>> {
        self.prior.as_deref()
    }
}

impl<N: Payload, E: Payload> Graph<N, E> {
    /// Build a graph from node and edge seeds, committed as one batch.
    ///
    /// # Errors
    /// Rejects the seed like any batch: [`GraphError::CycleDetected`] or
    /// [`GraphError::UnknownEndpoint`].
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node<N>>,
        edges: impl IntoIterator<Item = Edge<E>>,
    ) -> Result<Self, GraphError> {
        let mut seeded = Graph::new().with_mutations(|m| {
            m.add_nodes(nodes).add_edges(edges);
        })?;
        // the chain starts at the first user-visible version
        seeded.prior = None;
        Ok(seeded)
    }

    /// Run a batch of mutations and commit it.
    ///
    /// The closure records changes on a [`Mutator`]; on return the change log
    /// is applied, checked for cycles, re-layered, and published as a new
    /// graph version whose [`prior`](Graph::prior) is `self`.
    ///
    /// # Errors
    /// [`GraphError::CycleDetected`] or [`GraphError::UnknownEndpoint`]; in
    /// either case `self` is untouched.
    ///
    /// # Example
    /// ```rust
    /// use strata_graph::prelude::*;
    /// # fn main() -> Result<(), GraphError> {
    /// let g = Graph::<(), ()>::new().with_mutations(|m| {
    ///     m.add_nodes([Node::bare("a"), Node::bare("b")]);
    ///     m.add_edge(Edge::between("a", "b"));
    /// })?;
    /// assert_eq!(g.layer_of("b"), Some(1));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_mutations<F>(&self, build: F) -> Result<Self, GraphError>
    where
        F: FnOnce(&mut Mutator<N, E>),
    {
        let mut mutator = Mutator::new();
        build(&mut mutator);
        self.commit(mutator.into_change_log())
    }

    /// Add one node (a batch of one).
    pub fn add_node(&self, node: Node<N>) -> Result<Self, GraphError> {
        self.with_mutations(|m| {
            m.add_node(node);
        })
    }

    /// Add several nodes in one batch.
    pub fn add_nodes(&self, nodes: impl IntoIterator<Item = Node<N>>) -> Result<Self, GraphError> {
        self.with_mutations(|m| {
            m.add_nodes(nodes);
        })
    }

    /// Remove one node and every edge incident to it. Accepts a node, a
    /// `NodeId` or a plain string id; removing an absent node is a no-op.
    pub fn remove_node(&self, id: impl Into<NodeId>) -> Result<Self, GraphError> {
        let id = id.into();
        self.with_mutations(|m| {
            m.remove_node(id);
        })
    }

    /// Remove several nodes in one batch.
    pub fn remove_nodes<I>(&self, ids: I) -> Result<Self, GraphError>
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.with_mutations(|m| {
            m.remove_nodes(ids);
        })
    }

    /// Add one edge (a batch of one).
    pub fn add_edge(&self, edge: Edge<E>) -> Result<Self, GraphError> {
        self.with_mutations(|m| {
            m.add_edge(edge);
        })
    }

    /// Add several edges in one batch.
    pub fn add_edges(&self, edges: impl IntoIterator<Item = Edge<E>>) -> Result<Self, GraphError> {
        self.with_mutations(|m| {
            m.add_edges(edges);
        })
    }

    /// Remove one edge; removing an absent edge is a no-op.
    pub fn remove_edge(&self, id: impl Into<EdgeId>) -> Result<Self, GraphError> {
        let id = id.into();
        self.with_mutations(|m| {
            m.remove_edge(id);
        })
    }

    /// Remove several edges in one batch.
    pub fn remove_edges<I>(&self, ids: I) -> Result<Self, GraphError>
    where
        I: IntoIterator,
        I::Item: Into<EdgeId>,
    {
        self.with_mutations(|m| {
            m.remove_edges(ids);
        })
    }

    /// Apply, validate and publish one batch against `self`.
    fn commit(&self, log: ChangeLog<N, E>) -> Result<Self, GraphError> {
        let mut store = self.store.clone();
        let outcome = engine::apply(&mut store, log)?;
        cycle::check(&store, &outcome)?;
        layering::update_layers(&mut store, &outcome.dirty);
        debug_invariants!(store);
        Ok(Graph {
            store,
            prior: Some(Arc::new(self.clone())),
            sorted_ids: OnceCell::new(),
        })
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<N, E> fmt::Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.num_nodes())
            .field("edges", &self.num_edges())
            .field("layers", &self.num_layers())
            .field("has_prior", &self.prior.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_no_layers() {
        let g = Graph::<(), ()>::new();
        assert!(g.is_empty());
        assert_eq!(g.num_layers(), 0);
        assert_eq!(g.layer_of("ghost"), None);
        assert!(g.prior().is_none());
    }

    #[test]
    fn untouched_indices_stay_shared_across_versions() {
        let g1 = Graph::<(), ()>::new()
            .add_nodes([Node::bare("a"), Node::bare("b")])
            .unwrap();
        let g2 = g1.add_edge(Edge::between("a", "b")).unwrap();

        // the edge batch rewrote adjacency and layers but never cloned the
        // node map
        assert!(Arc::ptr_eq(&g1.store.nodes, &g2.store.nodes));
        assert!(!Arc::ptr_eq(&g1.store.edges, &g2.store.edges));
    }

    #[test]
    fn rejected_batch_leaves_no_new_version() {
        let g = Graph::<(), ()>::new()
            .add_nodes([Node::bare("a"), Node::bare("b")])
            .unwrap()
            .add_edge(Edge::between("a", "b"))
            .unwrap();
        let err = g.add_edge(Edge::between("b", "a")).unwrap_err();
        assert!(err.cycle().is_some());
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.layer_of("b"), Some(1));
    }

    #[test]
    fn node_ids_are_sorted_and_cached() {
        let g = Graph::<(), ()>::new()
            .add_nodes([Node::bare("b"), Node::bare("a"), Node::bare("c")])
            .unwrap();
        let ids: Vec<&str> = g.node_ids().iter().map(NodeId::as_str).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        // second call hits the cache
        assert_eq!(g.node_ids().len(), 3);
    }

    #[test]
    fn from_parts_seeds_one_batch_without_prior() {
        let g = Graph::<(), ()>::from_parts(
            [Node::bare("a"), Node::bare("b")],
            [Edge::between("a", "b")],
        )
        .unwrap();
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.layer_of("b"), Some(1));
        assert!(g.prior().is_none());

        assert!(
            Graph::<(), ()>::from_parts([Node::bare("a")], [Edge::between("a", "a")]).is_err()
        );
    }

    #[test]
    fn debug_is_a_summary() {
        let g = Graph::<(), ()>::new().add_node(Node::bare("a")).unwrap();
        let shown = format!("{g:?}");
        assert!(shown.contains("nodes: 1"));
    }
}
