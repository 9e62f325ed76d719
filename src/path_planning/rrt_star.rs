//! RRT* cost-optimizing primitives
//!
//! Near-set query, cost-based parent selection and rewiring. These are
//! plugged into the single-tree and bidirectional loops through
//! [`ExtendStrategy::CostOptimizing`](crate::path_planning::ExtendStrategy).

use log::trace;

use crate::common::{Environment, Point2D};
use crate::path_planning::tree::{NodeId, Tree};

/// Nodes within `search_radius` of the candidate configuration
pub fn find_near_nodes(tree: &Tree, candidate: &Point2D, search_radius: f64) -> Vec<NodeId> {
    tree.near(candidate, search_radius)
}

/// Cheapest collision-free parent for `candidate` among `near_inds`.
///
/// Returns `(parent, cost)`; ties keep the earliest node in `near_inds`.
/// `None` when the near set is empty or every connection is blocked.
pub fn choose_parent(
    tree: &Tree,
    env: &Environment,
    candidate: &Point2D,
    near_inds: &[NodeId],
) -> Option<(NodeId, f64)> {
    let mut best: Option<(NodeId, f64)> = None;

    for &i in near_inds {
        let near = tree.node(i);
        let cost = near.cost + near.position.distance(candidate);
        let better = best.map_or(true, |(_, min_cost)| cost < min_cost);
        if better && env.is_segment_free(&near.position, candidate) {
            best = Some((i, cost));
        }
    }

    best
}

/// Re-parent near nodes through `new_ind` wherever that strictly lowers
/// their cost, propagating the change to their descendants.
///
/// Returns how many nodes were rewired.
pub fn rewire(tree: &mut Tree, env: &Environment, new_ind: NodeId, near_inds: &[NodeId]) -> usize {
    let new_pos = tree.position(new_ind);
    let new_cost = tree.cost(new_ind);
    let mut rewired = 0;

    for &i in near_inds {
        if i == new_ind {
            continue;
        }
        let near_pos = tree.position(i);
        let edge_cost = new_cost + new_pos.distance(&near_pos);
        if edge_cost >= tree.cost(i) {
            continue;
        }
        // A node never adopts one of its own ancestors as a child.
        if tree.is_ancestor(i, new_ind) {
            continue;
        }
        if !env.is_segment_free(&new_pos, &near_pos) {
            continue;
        }

        trace!(
            "rewire node {} under {}: cost {:.3} -> {:.3}",
            i, new_ind, tree.cost(i), edge_cost
        );
        tree.reparent(i, new_ind, edge_cost);
        rewired += 1;
    }

    rewired
}
