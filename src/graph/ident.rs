//! Id newtypes for graph entities.
//!
//! Node and edge identity is the id *string* (spelled by the caller for nodes,
//! derived from endpoints and ports for edges). Both newtypes wrap `Arc<str>`
//! so clones are reference bumps: ids are copied into every index that refers
//! to them, and the layering passes clone them freely.
//!
//! This module provides:
//! - [`NodeId`] and [`EdgeId`], interned-string handles with `Borrow<str>` so
//!   indices can be probed with plain `&str` keys.
//! - [`LayerId`], an opaque `u64` handle allocated by the store. Layer ids are
//!   stable across compaction; only the positional *index* of a layer is
//!   renumbered.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A cheap-to-clone handle identifying a node.
///
/// Equality, ordering and hashing all follow the underlying string, so a
/// `NodeId` can key hash maps and ordered sets interchangeably with `&str`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// View the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    #[inline]
    fn from(raw: &str) -> Self {
        NodeId(Arc::from(raw))
    }
}

impl From<String> for NodeId {
    #[inline]
    fn from(raw: String) -> Self {
        NodeId(Arc::from(raw))
    }
}

impl From<&NodeId> for NodeId {
    #[inline]
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for NodeId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cheap-to-clone handle identifying an edge.
///
/// Edge ids are derived from the endpoints and optional port names as
/// `"{source[.source_port]}-{target[.target_port]}"`; see
/// [`Edge`](crate::graph::entity::Edge). The derivation is deterministic and
/// collision-free given unique port names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EdgeId(Arc<str>);

impl EdgeId {
    /// View the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compose the canonical id for an edge between two (possibly
    /// port-qualified) endpoints.
    pub fn compose(
        source: &NodeId,
        source_port: Option<&str>,
        target: &NodeId,
        target_port: Option<&str>,
    ) -> Self {
        let mut raw = String::with_capacity(
            source.as_str().len()
                + target.as_str().len()
                + source_port.map_or(0, |p| p.len() + 1)
                + target_port.map_or(0, |p| p.len() + 1)
                + 1,
        );
        raw.push_str(source.as_str());
        if let Some(port) = source_port {
            raw.push('.');
            raw.push_str(port);
        }
        raw.push('-');
        raw.push_str(target.as_str());
        if let Some(port) = target_port {
            raw.push('.');
            raw.push_str(port);
        }
        EdgeId(Arc::from(raw))
    }
}

impl From<&str> for EdgeId {
    #[inline]
    fn from(raw: &str) -> Self {
        EdgeId(Arc::from(raw))
    }
}

impl From<String> for EdgeId {
    #[inline]
    fn from(raw: String) -> Self {
        EdgeId(Arc::from(raw))
    }
}

impl From<&EdgeId> for EdgeId {
    #[inline]
    fn from(id: &EdgeId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for EdgeId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stable handle identifying a layer record.
///
/// Allocated by the store when a layer is created and never reused within a
/// version chain. The *positional* index of a layer changes as emptied layers
/// are compacted away; the id does not.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct LayerId(u64);

impl LayerId {
    #[inline]
    pub(crate) fn new(raw: u64) -> Self {
        LayerId(raw)
    }

    /// Returns the underlying `u64` value of this `LayerId`.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LayerId").field(&self.0).finish()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
