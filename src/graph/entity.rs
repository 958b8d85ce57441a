//! Node and edge records.
//!
//! A *node* couples a caller-chosen string id with an opaque payload; it is
//! immutable between the batch that adds it and the batch that removes it
//! (replacement is delete + add). An *edge* references its endpoints by id,
//! never by pointer, so edges survive in-batch reordering and no ownership
//! cycles arise. The edge id is derived from the endpoints and optional port
//! names at construction time.

use std::sync::Arc;

use super::ident::{EdgeId, NodeId};

/// A graph node: a unique id plus an opaque payload.
///
/// # Type Parameters
/// - `N`: The payload type. Defaults to `()` for payload-free nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<N = ()> {
    id: NodeId,
    /// User-defined payload data attached to this node.
    pub data: N,
}

impl<N> Node<N> {
    /// Build a node from an id and payload.
    ///
    /// # Example
    /// ```rust
    /// use strata_graph::graph::Node;
    /// let n = Node::new("n1", 7u32);
    /// assert_eq!(n.id().as_str(), "n1");
    /// assert_eq!(n.data, 7);
    /// ```
    pub fn new(id: impl Into<NodeId>, data: N) -> Self {
        Node {
            id: id.into(),
            data,
        }
    }

    /// The node's id.
    #[inline]
    pub fn id(&self) -> &NodeId {
        &self.id
    }
}

impl Node<()> {
    /// Build a payload-free node.
    pub fn bare(id: impl Into<NodeId>) -> Self {
        Node::new(id, ())
    }
}

impl<N> From<&Node<N>> for NodeId {
    #[inline]
    fn from(node: &Node<N>) -> Self {
        node.id.clone()
    }
}

/// A directed edge between two (possibly port-qualified) nodes.
///
/// # Type Parameters
/// - `E`: The payload type. Defaults to `()` for payload-free edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge<E = ()> {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    source_port: Option<Arc<str>>,
    target_port: Option<Arc<str>>,
    /// User-defined payload data attached to this edge.
    pub data: E,
}

impl<E> Edge<E> {
    /// Build an edge from `source` to `target` carrying `data`.
    ///
    /// # Example
    /// ```rust
    /// use strata_graph::graph::Edge;
    /// let e = Edge::new("n1", "n2", 3.5f64);
    /// assert_eq!(e.id().as_str(), "n1-n2");
    /// ```
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, data: E) -> Self {
        Self::with_ports(source, None::<&str>, target, None::<&str>, data)
    }

    /// Build a port-qualified edge. The derived id is
    /// `"{source[.source_port]}-{target[.target_port]}"`, deterministic and
    /// collision-free given unique port names.
    ///
    /// # Example
    /// ```rust
    /// use strata_graph::graph::Edge;
    /// let e = Edge::with_ports("n1", Some("out"), "n2", Some("in"), ());
    /// assert_eq!(e.id().as_str(), "n1.out-n2.in");
    /// ```
    pub fn with_ports(
        source: impl Into<NodeId>,
        source_port: Option<impl Into<Arc<str>>>,
        target: impl Into<NodeId>,
        target_port: Option<impl Into<Arc<str>>>,
        data: E,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        let source_port = source_port.map(Into::into);
        let target_port = target_port.map(Into::into);
        let id = EdgeId::compose(
            &source,
            source_port.as_deref(),
            &target,
            target_port.as_deref(),
        );
        Edge {
            id,
            source,
            target,
            source_port,
            target_port,
            data,
        }
    }

    /// The derived edge id.
    #[inline]
    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    /// The source node id.
    #[inline]
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// The target node id.
    #[inline]
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// The source port name, if any.
    #[inline]
    pub fn source_port(&self) -> Option<&str> {
        self.source_port.as_deref()
    }

    /// The target port name, if any.
    #[inline]
    pub fn target_port(&self) -> Option<&str> {
        self.target_port.as_deref()
    }
}

impl Edge<()> {
    /// Build a payload-free edge.
    pub fn between(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Edge::new(source, target, ())
    }
}

impl<E> From<&Edge<E>> for EdgeId {
    #[inline]
    fn from(edge: &Edge<E>) -> Self {
        edge.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_node_and_payload_node() {
        let n = Node::bare("n1");
        assert_eq!(n.id().as_str(), "n1");
        let m = Node::new("n2", vec![1, 2]);
        assert_eq!(m.data, vec![1, 2]);
    }

    #[test]
    fn edge_id_reflects_ports() {
        let plain = Edge::between("a", "b");
        assert_eq!(plain.id().as_str(), "a-b");
        assert_eq!(plain.source().as_str(), "a");
        assert_eq!(plain.target().as_str(), "b");
        assert_eq!(plain.source_port(), None);

        let ported = Edge::with_ports("a", Some("x"), "b", Some("y"), ());
        assert_eq!(ported.id().as_str(), "a.x-b.y");
        assert_eq!(ported.source_port(), Some("x"));
        assert_eq!(ported.target_port(), Some("y"));
    }

    #[test]
    fn distinct_ports_give_distinct_ids() {
        let e1 = Edge::with_ports("a", Some("p1"), "b", None::<&str>, ());
        let e2 = Edge::with_ports("a", Some("p2"), "b", None::<&str>, ());
        assert_ne!(e1.id(), e2.id());
    }

    #[test]
    fn node_ref_converts_to_id() {
        let n = Node::bare("n1");
        let id: NodeId = (&n).into();
        assert_eq!(id.as_str(), "n1");
    }
}
