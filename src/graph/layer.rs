//! Layer records.
//!
//! A layer couples a stable [`LayerId`] with a positional `index` and the set
//! of nodes currently assigned to it. Indices are renumbered when emptied
//! layers are compacted away; ids are not. A layer may be empty transiently
//! while a batch is being applied but never at commit.

use std::collections::BTreeSet;

use super::ident::{LayerId, NodeId};

/// One horizontal stratum of the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    id: LayerId,
    index: usize,
    nodes: BTreeSet<NodeId>,
}

impl Layer {
    pub(crate) fn new(id: LayerId, index: usize) -> Self {
        Layer {
            id,
            index,
            nodes: BTreeSet::new(),
        }
    }

    /// The stable layer id.
    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The current positional index of this layer (`0` = source side).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The nodes currently assigned to this layer, in id order.
    #[inline]
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    /// Number of nodes on this layer.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the layer currently holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` is assigned to this layer.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    #[inline]
    pub(crate) fn insert(&mut self, id: NodeId) {
        self.nodes.insert(id);
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.nodes.remove(id)
    }

    #[inline]
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
