//! Common bound aliases used across graph code.
//!
//! The trait has a blanket impl, so any type satisfying the underlying bound
//! automatically implements it. It is zero-cost and only reduces duplication
//! in `where` clauses.

/// Minimal bound for opaque node/edge payloads.
///
/// Payloads are cloned when an index page is copied on write, so `Clone` is
/// the only requirement; wrap large payloads in `Arc<T>` to keep that cheap.
pub trait Payload: Clone {}
impl<T: Clone> Payload for T {}
