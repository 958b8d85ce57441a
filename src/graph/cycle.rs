//! Hybrid cycle detection.
//!
//! Runs after a batch has been applied structurally and *before* the layer
//! updater, so the incremental path can lean on the previous version's layer
//! assignment: an added edge `u→v` with `layer(u) < layer(v)` respects a
//! topological order that was valid at the last commit and cannot close a
//! cycle on its own. Nodes added in this batch sit at layer 0 and are
//! therefore well-defined at detection time.
//!
//! Mode selection: with `N = |nodes|` and `C = |added nodes| + |added edges|`,
//! a full three-colour DFS runs when `N < 20` or `C/N > 0.2`: the scan is a
//! cheap constant on small graphs, and the probe list would be large anyway when
//! a batch rewrites a big share of the graph. Otherwise each suspect edge gets
//! a breadth-first reachability probe.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph_error::GraphError;

use super::engine::BatchOutcome;
use super::ident::NodeId;
use super::store::GraphStore;

/// Below this node count the full scan always runs.
const FULL_SCAN_NODE_FLOOR: usize = 20;
/// Above this change ratio the full scan always runs.
const FULL_SCAN_CHANGE_RATIO: f64 = 0.2;

/// Validate acyclicity of `store` after a batch.
///
/// # Errors
/// [`GraphError::CycleDetected`] carrying the first cycle found, closed on
/// itself (`cycle[0] == cycle[len-1]`).
pub(crate) fn check<N, E>(
    store: &GraphStore<N, E>,
    outcome: &BatchOutcome,
) -> Result<(), GraphError> {
    let n = store.nodes.len();
    if n < FULL_SCAN_NODE_FLOOR || outcome.change_count as f64 > FULL_SCAN_CHANGE_RATIO * n as f64 {
        full_scan(store)
    } else {
        incremental(store, outcome)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Colour {
    White,
    Gray,
    Black,
}

struct Frame {
    node: NodeId,
    children: Vec<NodeId>,
    next: usize,
}

/// Three-colour DFS over the successor relation from every white node. A
/// gray→gray edge is a back edge; the cycle is read off the DFS parent chain.
fn full_scan<N, E>(store: &GraphStore<N, E>) -> Result<(), GraphError> {
    let mut colour: HashMap<NodeId, Colour> = HashMap::with_capacity(store.nodes.len());
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();

    let mut roots: Vec<&NodeId> = store.nodes.keys().collect();
    roots.sort_unstable();

    for root in roots {
        if colour.get(root).copied().unwrap_or(Colour::White) != Colour::White {
            continue;
        }
        colour.insert(root.clone(), Colour::Gray);
        stack.push(Frame {
            node: root.clone(),
            children: store.succ_node_ids(root.as_str()).cloned().collect(),
            next: 0,
        });

        loop {
            let step = {
                let Some(frame) = stack.last_mut() else { break };
                if frame.next < frame.children.len() {
                    let child = frame.children[frame.next].clone();
                    frame.next += 1;
                    Some((frame.node.clone(), child))
                } else {
                    None
                }
            };
            match step {
                None => {
                    // frame exhausted
                    let frame = stack.pop().unwrap();
                    colour.insert(frame.node, Colour::Black);
                }
                Some((node, child)) => {
                    match colour.get(&child).copied().unwrap_or(Colour::White) {
                        Colour::White => {
                            parent.insert(child.clone(), node);
                            colour.insert(child.clone(), Colour::Gray);
                            let children = store.succ_node_ids(child.as_str()).cloned().collect();
                            stack.push(Frame {
                                node: child,
                                children,
                                next: 0,
                            });
                        }
                        Colour::Gray => {
                            // back edge: `child` is a gray ancestor of `node`
                            return Err(GraphError::CycleDetected {
                                cycle: read_back_cycle(&parent, child, node),
                            });
                        }
                        Colour::Black => {}
                    }
                }
            }
        }
    }
    Ok(())
}

/// Walk parent pointers from `end` up to `start` and return the cycle in
/// traversal order, with `start` at both endpoints.
fn read_back_cycle(parent: &HashMap<NodeId, NodeId>, start: NodeId, end: NodeId) -> Vec<NodeId> {
    let mut cycle = vec![start.clone()];
    let mut cursor = end;
    while cursor != start {
        cycle.push(cursor.clone());
        // `end` is a DFS descendant of the gray `start`, so the chain reaches it
        cursor = parent[&cursor].clone();
    }
    cycle.push(start);
    cycle.reverse();
    cycle
}

/// Probe each added edge that does not already respect the pre-batch layer
/// order. Edges added and then removed within the same batch are skipped: a
/// path back to their source no longer closes anything.
fn incremental<N, E>(store: &GraphStore<N, E>, outcome: &BatchOutcome) -> Result<(), GraphError> {
    for (edge_id, source, target) in &outcome.probes {
        if !store.edges.contains_key(edge_id.as_str()) {
            continue;
        }
        let (Some(src_layer), Some(dst_layer)) = (
            store.layer_index_of(source.as_str()),
            store.layer_index_of(target.as_str()),
        ) else {
            continue;
        };
        if src_layer < dst_layer {
            continue;
        }
        if let Some(cycle) = probe(store, source, target) {
            return Err(GraphError::CycleDetected { cycle });
        }
    }
    Ok(())
}

/// BFS from `target` along successors looking for `source`; the new edge
/// `source→target` closes any such path into a cycle. Returns the cycle as
/// the reversed parent chain with `target` closing the loop.
fn probe<N, E>(store: &GraphStore<N, E>, source: &NodeId, target: &NodeId) -> Option<Vec<NodeId>> {
    if source == target {
        return Some(vec![target.clone(), target.clone()]);
    }
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::from([target.clone()]);
    let mut queue: VecDeque<NodeId> = VecDeque::from([target.clone()]);

    while let Some(cursor) = queue.pop_front() {
        for child in store.succ_node_ids(cursor.as_str()) {
            if !visited.insert(child.clone()) {
                continue;
            }
            parent.insert(child.clone(), cursor.clone());
            if child == source {
                let mut cycle = Vec::new();
                let mut back = source.clone();
                loop {
                    cycle.push(back.clone());
                    if &back == target {
                        break;
                    }
                    back = parent[&back].clone();
                }
                cycle.reverse();
                cycle.push(target.clone());
                return Some(cycle);
            }
            queue.push_back(child.clone());
        }
    }
    None
}
