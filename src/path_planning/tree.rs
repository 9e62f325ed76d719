//! Arena-backed search tree shared by every RRT variant
//!
//! Nodes live in an insertion-ordered `Vec` and refer to their parent by
//! index. Positions never change after insertion; only `parent` and `cost`
//! are reassigned, and only through [`Tree::reparent`], which keeps the child
//! lists and the accumulated costs of the moved subtree consistent.

use ordered_float::OrderedFloat;

use crate::common::Point2D;

/// Index of a node inside its tree
pub type NodeId = usize;

/// Tree node
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub position: Point2D,
    pub parent: Option<NodeId>,
    /// Sum of edge lengths from the root along the current parent links
    pub cost: f64,
}

/// Rooted tree of configurations
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    children: Vec<Vec<NodeId>>,
}

impl Tree {
    /// Create a tree holding only `root`
    pub fn new(root: Point2D) -> Self {
        Tree {
            nodes: vec![TreeNode { position: root, parent: None, cost: 0.0 }],
            children: vec![Vec::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn position(&self, id: NodeId) -> Point2D {
        self.nodes[id].position
    }

    pub fn cost(&self, id: NodeId) -> f64 {
        self.nodes[id].cost
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id]
    }

    /// Append a node under `parent`
    pub fn push(&mut self, position: Point2D, parent: NodeId, cost: f64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode { position, parent: Some(parent), cost });
        self.children.push(Vec::new());
        self.children[parent].push(id);
        id
    }

    /// Node closest to `point`; ties go to the earliest inserted node
    pub fn nearest(&self, point: &Point2D) -> NodeId {
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, node)| OrderedFloat(node.position.distance_squared(point)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// All nodes within `radius` of `point`, in insertion order
    pub fn near(&self, point: &Point2D, radius: f64) -> Vec<NodeId> {
        let r2 = radius * radius;
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.position.distance_squared(point) <= r2)
            .map(|(i, _)| i)
            .collect()
    }

    /// True if `ancestor` lies on the parent chain of `id` (or is `id`)
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.nodes[i].parent;
        }
        false
    }

    /// Move `id` under `new_parent` with cost `new_cost`, then refresh the
    /// cost of every descendant.
    ///
    /// `new_parent` must not be inside the subtree of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId, new_cost: f64) {
        debug_assert!(!self.is_ancestor(id, new_parent), "reparenting would create a cycle");

        if let Some(old_parent) = self.nodes[id].parent {
            self.children[old_parent].retain(|&c| c != id);
        }
        self.nodes[id].parent = Some(new_parent);
        self.nodes[id].cost = new_cost;
        self.children[new_parent].push(id);
        self.propagate_cost(id);
    }

    /// Recompute `cost = parent.cost + edge` for the subtree below `id`.
    ///
    /// Uses an explicit stack so deep trees do not grow the call stack.
    /// Returns the number of descendants updated.
    pub fn propagate_cost(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut visited = 0;
        while let Some(parent) = stack.pop() {
            let parent_pos = self.nodes[parent].position;
            let parent_cost = self.nodes[parent].cost;
            for k in 0..self.children[parent].len() {
                let child = self.children[parent][k];
                let edge = parent_pos.distance(&self.nodes[child].position);
                self.nodes[child].cost = parent_cost + edge;
                stack.push(child);
                visited += 1;
            }
        }
        visited
    }

    /// Positions from `id` back to the root, `id` first
    pub fn path_to_root(&self, id: NodeId) -> Vec<Point2D> {
        let mut points = Vec::new();
        let mut current = Some(id);
        while let Some(i) = current {
            points.push(self.nodes[i].position);
            current = self.nodes[i].parent;
        }
        points
    }

    /// Number of edges between `id` and the root.
    ///
    /// Gives up and returns `None` after `len()` steps, which can only happen
    /// if the parent links contain a cycle.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut current = self.nodes[id].parent;
        let mut depth = 0;
        while let Some(i) = current {
            depth += 1;
            if depth > self.nodes.len() {
                return None;
            }
            current = self.nodes[i].parent;
        }
        Some(depth)
    }
}

/// Explored node counts reported after a planning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Nodes in the start-rooted tree
    pub start_tree: usize,
    /// Nodes in the goal-rooted tree, for bidirectional variants
    pub goal_tree: Option<usize>,
}

impl TreeStats {
    pub fn single(nodes: usize) -> Self {
        TreeStats { start_tree: nodes, goal_tree: None }
    }

    pub fn dual(start_tree: usize, goal_tree: usize) -> Self {
        TreeStats { start_tree, goal_tree: Some(goal_tree) }
    }

    pub fn total(&self) -> usize {
        self.start_tree + self.goal_tree.unwrap_or(0)
    }
}
