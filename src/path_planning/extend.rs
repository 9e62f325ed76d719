//! Tree extension strategies
//!
//! One extension is sample -> nearest -> steer -> collision check -> insert.
//! The plain strategy inserts under the nearest node; the cost-optimizing
//! strategy picks the cheapest collision-free parent in the near set and
//! rewires the neighbourhood afterwards.

use serde::{Deserialize, Serialize};

use crate::common::{Environment, Point2D};
use crate::path_planning::rrt_star;
use crate::path_planning::tree::{NodeId, Tree};

/// How a tree grows by one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtendStrategy {
    /// Parent is always the nearest node (RRT, RRT-Connect)
    Plain,
    /// Parent selection and rewiring within `search_radius` (RRT*, RRT*-Connect)
    CostOptimizing { search_radius: f64 },
}

/// Grows trees inside one environment with a fixed step size
#[derive(Debug, Clone, Copy)]
pub struct TreeExtender<'a> {
    env: &'a Environment,
    step_size: f64,
    strategy: ExtendStrategy,
}

impl<'a> TreeExtender<'a> {
    pub fn new(env: &'a Environment, step_size: f64, strategy: ExtendStrategy) -> Self {
        TreeExtender { env, step_size, strategy }
    }

    pub fn env(&self) -> &'a Environment {
        self.env
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn strategy(&self) -> ExtendStrategy {
        self.strategy
    }

    /// Move from `from` toward `to` by at most one step
    pub fn steer(&self, from: &Point2D, to: &Point2D) -> Point2D {
        let d = from.distance(to);
        if d < self.step_size {
            return *to;
        }
        let v = from.to_vector();
        Point2D::from(v + (to.to_vector() - v) * (self.step_size / d))
    }

    /// Append `position` under `parent`, costing it by the edge length
    pub fn attach(&self, tree: &mut Tree, position: Point2D, parent: NodeId) -> NodeId {
        let cost = tree.cost(parent) + tree.position(parent).distance(&position);
        tree.push(position, parent, cost)
    }

    /// One extension toward `sample`. Returns the new node, or `None` when
    /// the steered segment collides.
    pub fn extend(&self, tree: &mut Tree, sample: &Point2D) -> Option<NodeId> {
        let nearest = tree.nearest(sample);
        let nearest_pos = tree.position(nearest);
        let new_pos = self.steer(&nearest_pos, sample);

        if !self.env.is_segment_free(&nearest_pos, &new_pos) {
            return None;
        }

        match self.strategy {
            ExtendStrategy::Plain => Some(self.attach(tree, new_pos, nearest)),
            ExtendStrategy::CostOptimizing { search_radius } => {
                let near_inds = rrt_star::find_near_nodes(tree, &new_pos, search_radius);
                let new_ind = match rrt_star::choose_parent(tree, self.env, &new_pos, &near_inds) {
                    Some((parent, cost)) => tree.push(new_pos, parent, cost),
                    None => self.attach(tree, new_pos, nearest),
                };
                rrt_star::rewire(tree, self.env, new_ind, &near_inds);
                Some(new_ind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AreaBounds, RectObstacle};
    use crate::path_planning::sampler::{make_rng, GoalBiasedSampler};

    fn env() -> Environment {
        Environment::new(
            AreaBounds::new(0.0, 10.0, 0.0, 10.0),
            vec![RectObstacle::new(4.0, 0.0, 1.0, 6.0)],
        )
    }

    #[test]
    fn test_steer_short_distance_returns_target() {
        let env = env();
        let ext = TreeExtender::new(&env, 1.0, ExtendStrategy::Plain);
        let to = Point2D::new(0.5, 0.5);
        assert_eq!(ext.steer(&Point2D::new(0.0, 0.0), &to), to);
    }

    #[test]
    fn test_steer_clamps_to_step() {
        let env = env();
        let ext = TreeExtender::new(&env, 1.0, ExtendStrategy::Plain);
        let from = Point2D::new(1.0, 1.0);
        let p = ext.steer(&from, &Point2D::new(4.0, 5.0));
        assert!((from.distance(&p) - 1.0).abs() < 1e-12);
        assert!((p.x - 1.6).abs() < 1e-12);
        assert!((p.y - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_extend_appends_under_nearest() {
        let env = env();
        let ext = TreeExtender::new(&env, 1.0, ExtendStrategy::Plain);
        let mut tree = Tree::new(Point2D::new(1.0, 1.0));
        let id = ext.extend(&mut tree, &Point2D::new(1.0, 5.0)).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(id).parent, Some(0));
        assert_eq!(tree.position(id), Point2D::new(1.0, 2.0));
        assert!((tree.cost(id) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extend_rejects_collision() {
        let env = env();
        let ext = TreeExtender::new(&env, 1.0, ExtendStrategy::Plain);
        let mut tree = Tree::new(Point2D::new(3.5, 3.0));
        assert!(ext.extend(&mut tree, &Point2D::new(9.0, 3.0)).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_cost_optimizing_extend_picks_cheaper_parent() {
        let env = Environment::open(AreaBounds::new(-10.0, 10.0, -10.0, 10.0));
        let ext = TreeExtender::new(&env, 1.0, ExtendStrategy::CostOptimizing { search_radius: 1.5 });
        let mut tree = Tree::new(Point2D::new(0.0, 0.0));
        // Long way round to (1, 1).
        let a = tree.push(Point2D::new(0.0, 1.0), 0, 1.0);
        let b = tree.push(Point2D::new(1.0, 1.2), a, 6.0);

        // Nearest to the sample is b, but the root is a cheaper parent.
        assert_eq!(tree.nearest(&Point2D::new(1.0, 1.0)), b);
        let id = ext.extend(&mut tree, &Point2D::new(1.0, 1.0)).unwrap();
        assert_eq!(tree.node(id).parent, Some(0));
        assert!((tree.cost(id) - 2f64.sqrt()).abs() < 1e-12);
        // b is then rewired through the new node.
        assert_eq!(tree.node(b).parent, Some(id));
        assert!((tree.cost(b) - (2f64.sqrt() + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_cost_optimizing_extend_never_raises_existing_costs() {
        let env = env();
        let goal = Point2D::new(9.0, 1.0);
        let ext = TreeExtender::new(&env, 1.0, ExtendStrategy::CostOptimizing { search_radius: 1.5 });
        let sampler = GoalBiasedSampler::new(&env.bounds, goal);
        let mut rng = make_rng(Some(11));
        let mut tree = Tree::new(Point2D::new(1.0, 1.0));

        // Grow until some node sits a few edges deep, then record its cost
        // after every later extension.
        let mut tracked = None;
        let mut history = Vec::new();
        for _ in 0..2000 {
            let before: Vec<f64> = tree.nodes().iter().map(|n| n.cost).collect();
            ext.extend(&mut tree, &sampler.sample(&mut rng));

            for (id, old) in before.iter().enumerate() {
                assert!(tree.cost(id) <= old + 1e-9, "node {} cost rose from {} to {}", id, old, tree.cost(id));
            }
            if tracked.is_none() {
                tracked = (0..tree.len()).find(|&id| tree.depth(id).map_or(false, |d| d >= 4));
            }
            if let Some(id) = tracked {
                history.push(tree.cost(id));
            }
        }

        let tracked = tracked.expect("tree never grew four edges deep");
        assert!(history.windows(2).all(|w| w[1] <= w[0] + 1e-9));
        let chain = tree.path_to_root(tracked);
        let chain_length: f64 = chain.windows(2).map(|w| w[0].distance(&w[1])).sum();
        assert!((tree.cost(tracked) - chain_length).abs() < 1e-9);
    }
}
