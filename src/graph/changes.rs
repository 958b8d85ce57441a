//! The change log and its mutator.
//!
//! A [`Mutator`] is a pure accumulator: four lists of pending additions and
//! removals, in insertion order, with no validation of any kind. All semantic
//! checks (endpoint existence, acyclicity) happen at commit.

use super::entity::{Edge, Node};
use super::ident::{EdgeId, NodeId};

/// Pending mutations of one batch, in the order they will be applied.
#[derive(Clone, Debug)]
pub(crate) struct ChangeLog<N, E> {
    pub(crate) added_nodes: Vec<Node<N>>,
    pub(crate) removed_nodes: Vec<NodeId>,
    pub(crate) added_edges: Vec<Edge<E>>,
    pub(crate) removed_edges: Vec<EdgeId>,
}

impl<N, E> ChangeLog<N, E> {
    fn new() -> Self {
        ChangeLog {
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            added_edges: Vec::new(),
            removed_edges: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
    }
}

/// Accumulates the mutations of one batch.
///
/// Handed to the caller by
/// [`Graph::with_mutations`](super::facade::Graph::with_mutations); every
/// recorded change is applied when the closure returns and the batch commits.
/// Removal calls accept anything convertible to the respective id, so
/// `remove_node("n1")` and `remove_node(&node)` are equivalent.
#[derive(Clone, Debug)]
pub struct Mutator<N = (), E = ()> {
    log: ChangeLog<N, E>,
}

impl<N, E> Mutator<N, E> {
    pub(crate) fn new() -> Self {
        Mutator {
            log: ChangeLog::new(),
        }
    }

    pub(crate) fn into_change_log(self) -> ChangeLog<N, E> {
        self.log
    }

    /// Queue a node for addition.
    pub fn add_node(&mut self, node: Node<N>) -> &mut Self {
        self.log.added_nodes.push(node);
        self
    }

    /// Queue several nodes for addition.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node<N>>) -> &mut Self {
        self.log.added_nodes.extend(nodes);
        self
    }

    /// Queue a node for removal, along with every edge incident to it.
    pub fn remove_node(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.log.removed_nodes.push(id.into());
        self
    }

    /// Queue several nodes for removal.
    pub fn remove_nodes<I>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.log.removed_nodes.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Queue an edge for addition.
    pub fn add_edge(&mut self, edge: Edge<E>) -> &mut Self {
        self.log.added_edges.push(edge);
        self
    }

    /// Queue several edges for addition.
    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = Edge<E>>) -> &mut Self {
        self.log.added_edges.extend(edges);
        self
    }

    /// Queue an edge for removal. Removing an absent edge is a no-op.
    pub fn remove_edge(&mut self, id: impl Into<EdgeId>) -> &mut Self {
        self.log.removed_edges.push(id.into());
        self
    }

    /// Queue several edges for removal.
    pub fn remove_edges<I>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<EdgeId>,
    {
        self.log.removed_edges.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Whether nothing has been queued yet.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
