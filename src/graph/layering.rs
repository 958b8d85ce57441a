//! Two-phase incremental layer maintenance.
//!
//! Runs after a batch has passed cycle detection and restores the layering
//! invariant for every node the batch may have disturbed (the dirty set).
//!
//! **Phase 1, push children down.** Pop dirty ids off a LIFO stack; a node
//! belongs at layer 0 if it has no parents, else one past its highest parent.
//! Moving a node re-queues its children (their floor just changed) and marks
//! its parents for phase 2.
//!
//! **Phase 2, pull parents in toward their children.** Process the marked
//! ids bucketed by current layer, highest first; a node with children is
//! pulled to one layer above its lowest child, and a move re-buckets its
//! parents so cascades continue upward. Sinks stay where phase 1 left them.
//!
//! `move_node` compacts any layer a move empties; a final sweep drops layers
//! emptied purely by node removals. Each move strictly tightens the
//! assignment, so both phases terminate in O(depth) moves per node.

use std::collections::{BTreeMap, BTreeSet};

use super::bounds::Payload;
use super::ident::NodeId;
use super::store::GraphStore;

pub(crate) fn update_layers<N: Payload, E: Payload>(
    store: &mut GraphStore<N, E>,
    dirty: &BTreeSet<NodeId>,
) {
    let mut phase2: BTreeSet<NodeId> = dirty.clone();

    // Phase 1
    let mut stack: Vec<NodeId> = dirty.iter().cloned().collect();
    while let Some(id) = stack.pop() {
        let Some(current) = store.layer_index_of(id.as_str()) else {
            // removed in this batch
            continue;
        };
        let correct = store.max_pred_index(id.as_str()).map_or(0, |m| m + 1);
        if correct != current {
            store.move_node(&id, correct);
            stack.extend(store.succ_node_ids(id.as_str()).cloned());
            phase2.extend(store.pred_node_ids(id.as_str()).cloned());
        }
    }

    // Phase 2
    let mut buckets: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
    for id in phase2 {
        if let Some(index) = store.layer_index_of(id.as_str()) {
            buckets.entry(index).or_default().push(id);
        }
    }
    loop {
        // parents re-bucket strictly below the bucket in hand
        let Some(index) = buckets.keys().next_back().copied() else {
            break;
        };
        let ids = buckets.remove(&index).unwrap();
        for id in ids {
            let Some(current) = store.layer_index_of(id.as_str()) else {
                continue;
            };
            let Some(min_child) = store.min_succ_index(id.as_str()) else {
                continue;
            };
            let correct = min_child.saturating_sub(1);
            if correct != current {
                store.move_node(&id, correct);
                let parents: Vec<NodeId> = store.pred_node_ids(id.as_str()).cloned().collect();
                for parent in parents {
                    if let Some(parent_index) = store.layer_index_of(parent.as_str()) {
                        buckets.entry(parent_index).or_default().push(parent);
                    }
                }
            }
        }
    }

    store.sweep_empty_layers();
}
