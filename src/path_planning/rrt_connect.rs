//! RRT-Connect: bidirectional RRT
//!
//! Two trees grow from the start and from the goal. Each iteration one tree
//! extends toward a random sample and the other greedily connects to the new
//! node; when that fails the two trees swap roles, so both grow at a similar
//! rate and tend to meet in the middle. With
//! [`ExtendStrategy::CostOptimizing`] the extension step is the RRT* one
//! (RRT*-Connect); connect steps are costed but never rewired.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{
    Environment, NoopObserver, Path2D, PathPlanner, PlanningObserver, Point2D, Progress,
    SamplingBasedPlanner,
};
use crate::path_planning::extend::{ExtendStrategy, TreeExtender};
use crate::path_planning::rrt::{is_goal_reached, strategy_label, RRTConfig, PROGRESS_LOG_INTERVAL};
use crate::path_planning::sampler::{make_rng, GoalBiasedSampler};
use crate::path_planning::tree::{NodeId, Tree, TreeStats};

const START_TREE: usize = 0;
const GOAL_TREE: usize = 1;

/// When a connect attempt counts as having reached its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionPolicy {
    /// A new node within half a step of the target ends the attempt.
    /// The two path halves may then be joined across a gap of up to
    /// `step_size / 2` that was never collision-checked.
    #[default]
    HalfStep,
    /// The node within half a step must also link to the target itself
    /// through a free segment; the halves meet exactly.
    Exact,
}

/// Greedily grow `tree` toward `target` until it arrives or collides.
///
/// Returns the node that completed the connection. Each step either ends the
/// loop or moves the nearest node a full step closer, so it terminates.
pub fn connect_tree(
    extender: &TreeExtender<'_>,
    tree: &mut Tree,
    target: &Point2D,
    policy: JunctionPolicy,
) -> Option<NodeId> {
    let env = extender.env();
    let step_size = extender.step_size();

    loop {
        let nearest = tree.nearest(target);
        let nearest_pos = tree.position(nearest);

        if nearest_pos.distance(target) < step_size {
            if !env.is_segment_free(&nearest_pos, target) {
                return None;
            }
            return Some(extender.attach(tree, *target, nearest));
        }

        let new_pos = extender.steer(&nearest_pos, target);
        if !env.is_segment_free(&nearest_pos, &new_pos) {
            return None;
        }
        let new_ind = extender.attach(tree, new_pos, nearest);

        if new_pos.distance(target) < step_size * 0.5 {
            return match policy {
                JunctionPolicy::HalfStep => Some(new_ind),
                JunctionPolicy::Exact => {
                    if env.is_segment_free(&new_pos, target) {
                        Some(extender.attach(tree, *target, new_ind))
                    } else {
                        None
                    }
                }
            };
        }
    }
}

/// Bidirectional RRT-Connect / RRT*-Connect planner
pub struct RRTConnectPlanner<'a> {
    env: &'a Environment,
    start: Point2D,
    goal: Point2D,
    config: RRTConfig,
    strategy: ExtendStrategy,
    junction_policy: JunctionPolicy,
    trees: [Tree; 2],
    /// Connection node in the start tree and in the goal tree
    connection: Option<(NodeId, NodeId)>,
    iterations: usize,
}

impl<'a> RRTConnectPlanner<'a> {
    /// Create a plain RRT-Connect planner
    pub fn new(env: &'a Environment, start: Point2D, goal: Point2D, config: RRTConfig) -> Self {
        Self::with_strategy(env, start, goal, config, ExtendStrategy::Plain)
    }

    /// Create an RRT*-Connect planner using `config.search_radius`
    pub fn new_star(env: &'a Environment, start: Point2D, goal: Point2D, config: RRTConfig) -> Self {
        let strategy = ExtendStrategy::CostOptimizing { search_radius: config.search_radius };
        Self::with_strategy(env, start, goal, config, strategy)
    }

    pub fn with_strategy(
        env: &'a Environment,
        start: Point2D,
        goal: Point2D,
        config: RRTConfig,
        strategy: ExtendStrategy,
    ) -> Self {
        RRTConnectPlanner {
            env,
            start,
            goal,
            config,
            strategy,
            junction_policy: JunctionPolicy::default(),
            trees: [Tree::new(start), Tree::new(goal)],
            connection: None,
            iterations: 0,
        }
    }

    pub fn with_junction_policy(mut self, policy: JunctionPolicy) -> Self {
        self.junction_policy = policy;
        self
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    pub fn junction_policy(&self) -> JunctionPolicy {
        self.junction_policy
    }

    /// Tree rooted at the start
    pub fn start_tree(&self) -> &Tree {
        &self.trees[START_TREE]
    }

    /// Tree rooted at the goal
    pub fn goal_tree(&self) -> &Tree {
        &self.trees[GOAL_TREE]
    }

    /// Connection nodes `(in start tree, in goal tree)` of the last success.
    ///
    /// Both roots when the start was already within reach of the goal.
    pub fn connection(&self) -> Option<(NodeId, NodeId)> {
        self.connection
    }

    /// Distance between the two connection nodes.
    ///
    /// Zero when the trees met exactly; up to half a step under
    /// [`JunctionPolicy::HalfStep`]. When both roots were connected directly
    /// this is the checked start-to-goal distance.
    pub fn junction_gap(&self) -> Option<f64> {
        self.connection.map(|(s, g)| {
            self.trees[START_TREE].position(s).distance(&self.trees[GOAL_TREE].position(g))
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run the planner with an explicit random source and progress observer.
    ///
    /// Both trees are reset to their roots first.
    pub fn plan_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        observer: &mut dyn PlanningObserver,
    ) -> Option<Path2D> {
        let label = strategy_label(self.strategy, true);
        self.trees = [Tree::new(self.start), Tree::new(self.goal)];
        self.connection = None;
        self.iterations = 0;

        debug!("{} planning start: {:?} -> {:?}", label, self.start, self.goal);

        if is_goal_reached(self.env, &self.start, &self.goal) {
            info!("{}: start already within reach of the goal", label);
            self.connection = Some((self.trees[START_TREE].root(), self.trees[GOAL_TREE].root()));
            let mut points = vec![self.start];
            if self.start != self.goal {
                points.push(self.goal);
            }
            return Some(Path2D::from_points(points));
        }

        let sampler = GoalBiasedSampler::new(&self.env.bounds, self.goal);
        let extender = TreeExtender::new(self.env, self.config.step_size, self.strategy);
        let max_iter = self.config.max_iter;
        // Index of the tree currently playing the extending role.
        let mut active = START_TREE;

        for i in 0..max_iter {
            self.iterations = i + 1;
            let sample = sampler.sample(rng);
            let other = 1 - active;

            let mut connected = None;
            if let Some(new_ind) = extender.extend(&mut self.trees[active], &sample) {
                let target = self.trees[active].position(new_ind);
                if let Some(conn_ind) =
                    connect_tree(&extender, &mut self.trees[other], &target, self.junction_policy)
                {
                    connected = Some(if active == START_TREE {
                        (new_ind, conn_ind)
                    } else {
                        (conn_ind, new_ind)
                    });
                }
            }

            observer.on_iteration(&Progress {
                iteration: i,
                max_iter,
                node_count: self.node_count(),
            });

            if let Some(connection) = connected {
                self.connection = Some(connection);
                info!(
                    "{}: found path after {} iterations ({} nodes: start tree {}, goal tree {})",
                    label,
                    i + 1,
                    self.node_count(),
                    self.trees[START_TREE].len(),
                    self.trees[GOAL_TREE].len()
                );
                return Some(self.extract_dual_path(connection));
            }

            active = other;

            if (i + 1) % PROGRESS_LOG_INTERVAL == 0 {
                debug!("{} iteration {}/{}, nodes: {}", label, i + 1, max_iter, self.node_count());
            }
        }

        info!(
            "{}: no path within {} iterations ({} nodes: start tree {}, goal tree {})",
            label,
            max_iter,
            self.node_count(),
            self.trees[START_TREE].len(),
            self.trees[GOAL_TREE].len()
        );
        None
    }

    fn node_count(&self) -> usize {
        self.trees[START_TREE].len() + self.trees[GOAL_TREE].len()
    }

    /// Start -> connection from the start tree, then the goal tree from the
    /// connection node's parent down to the goal root.
    fn extract_dual_path(&self, (start_conn, goal_conn): (NodeId, NodeId)) -> Path2D {
        let mut points = self.trees[START_TREE].path_to_root(start_conn);
        points.reverse();

        let goal_tree = &self.trees[GOAL_TREE];
        if let Some(parent) = goal_tree.node(goal_conn).parent {
            points.extend(goal_tree.path_to_root(parent));
        }

        Path2D::from_points(points)
    }
}

impl PathPlanner for RRTConnectPlanner<'_> {
    fn plan(&mut self) -> Option<Path2D> {
        let mut rng = make_rng(self.config.seed);
        self.plan_with(&mut rng, &mut NoopObserver)
    }
}

impl SamplingBasedPlanner for RRTConnectPlanner<'_> {
    fn tree_stats(&self) -> TreeStats {
        TreeStats::dual(self.trees[START_TREE].len(), self.trees[GOAL_TREE].len())
    }

    fn set_max_iterations(&mut self, max_iter: usize) {
        self.config.max_iter = max_iter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AreaBounds, RectObstacle};
    use crate::path_planning::test_support::*;

    fn seeded(max_iter: usize, seed: u64) -> RRTConfig {
        RRTConfig {
            step_size: 1.0,
            max_iter,
            search_radius: 1.5,
            seed: Some(seed),
        }
    }

    fn open_extender(env: &Environment) -> TreeExtender<'_> {
        TreeExtender::new(env, 1.0, ExtendStrategy::Plain)
    }

    #[test]
    fn test_connect_reaches_target_exactly_when_close() {
        let env = open_field();
        let ext = open_extender(&env);
        let mut tree = Tree::new(Point2D::new(0.0, 0.0));
        let target = Point2D::new(0.6, 0.0);
        let id = connect_tree(&ext, &mut tree, &target, JunctionPolicy::HalfStep).unwrap();
        assert_eq!(tree.position(id), target);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_connect_half_step_leaves_gap() {
        let env = open_field();
        let ext = open_extender(&env);
        let mut tree = Tree::new(Point2D::new(0.0, 0.0));
        // 3.3 away: steps land at 1, 2, 3 and 3 is within half a step.
        let target = Point2D::new(3.3, 0.0);
        let id = connect_tree(&ext, &mut tree, &target, JunctionPolicy::HalfStep).unwrap();
        let gap = tree.position(id).distance(&target);
        assert!(gap > 0.0 && gap < 0.5, "gap {}", gap);
        assert_eq!(tree.len(), 4);
        assert!((tree.cost(id) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_connect_exact_closes_gap() {
        let env = open_field();
        let ext = open_extender(&env);
        let mut tree = Tree::new(Point2D::new(0.0, 0.0));
        let target = Point2D::new(3.3, 0.0);
        let id = connect_tree(&ext, &mut tree, &target, JunctionPolicy::Exact).unwrap();
        assert_eq!(tree.position(id), target);
        assert_eq!(tree.len(), 5);
        assert!((tree.cost(id) - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_connect_aborts_on_collision() {
        let env = Environment::new(
            AreaBounds::new(-2.0, 12.0, -5.0, 5.0),
            vec![RectObstacle::new(2.2, -1.0, 0.5, 2.0)],
        );
        let ext = open_extender(&env);
        let mut tree = Tree::new(Point2D::new(0.0, 0.0));
        assert!(connect_tree(&ext, &mut tree, &Point2D::new(6.0, 0.0), JunctionPolicy::HalfStep).is_none());
        // Nodes added before the collision stay in the tree.
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_rrt_connect_open_field() {
        let env = open_field();
        let start = Point2D::new(0.0, 0.0);
        let goal = Point2D::new(10.0, 0.0);
        let mut planner = RRTConnectPlanner::new(&env, start, goal, seeded(2000, 1));
        let path = planner.plan().expect("open field must be solvable");
        assert_endpoints(&path, start, goal);
        assert!(path.total_length() < 30.0);
        let stats = planner.tree_stats();
        assert_eq!(stats.start_tree, planner.start_tree().len());
        assert_eq!(stats.goal_tree, Some(planner.goal_tree().len()));
        assert!(planner.junction_gap().unwrap() < 0.5);
    }

    #[test]
    fn test_rrt_connect_wall_field_all_seeds_and_policies() {
        let env = wall_field();
        let start = Point2D::new(2.0, 2.0);
        let goal = Point2D::new(18.0, 2.0);
        for seed in 0..8 {
            for star in [false, true] {
                let config = seeded(5000, seed);
                let planner = if star {
                    RRTConnectPlanner::new_star(&env, start, goal, config)
                } else {
                    RRTConnectPlanner::new(&env, start, goal, config)
                };

                let mut exact = planner.with_junction_policy(JunctionPolicy::Exact);
                let path = exact.plan().expect("wall field must be solvable");
                assert_endpoints(&path, start, goal);
                assert_collision_free(&env, &path);
                assert_eq!(exact.junction_gap(), Some(0.0));
                assert_acyclic(exact.start_tree());
                assert_acyclic(exact.goal_tree());
                assert_costs_consistent(exact.start_tree());
                assert_costs_consistent(exact.goal_tree());
            }
        }
    }

    #[test]
    fn test_rrt_connect_half_step_junction_is_the_only_unchecked_segment() {
        let env = wall_field();
        let start = Point2D::new(2.0, 2.0);
        let goal = Point2D::new(18.0, 2.0);
        for seed in 0..8 {
            let mut planner = RRTConnectPlanner::new(&env, start, goal, seeded(5000, seed));
            let path = planner.plan().expect("wall field must be solvable");
            assert_endpoints(&path, start, goal);

            let (start_conn, _) = planner.connection().unwrap();
            let gap = planner.junction_gap().unwrap();
            assert!(gap < 0.5, "junction gap {} exceeds half a step", gap);

            // The start half ends at the start-tree connection node; every
            // segment except the one leaving it was checked while growing.
            let junction = planner.start_tree().path_to_root(start_conn).len() - 1;
            for (i, w) in path.points.windows(2).enumerate() {
                if i != junction {
                    assert!(env.is_segment_free(&w[0], &w[1]), "segment {} collides", i);
                }
            }
        }
    }

    #[test]
    fn test_rrt_connect_start_equals_goal() {
        let env = open_field();
        let p = Point2D::new(4.0, -1.0);
        let mut planner = RRTConnectPlanner::new(&env, p, p, seeded(100, 0));
        assert_eq!(planner.plan().unwrap().points, vec![p]);
        assert_eq!(planner.iterations(), 0);
        assert_eq!(planner.connection(), Some((0, 0)));
        assert_eq!(planner.junction_gap(), Some(0.0));
    }

    #[test]
    fn test_rrt_connect_start_within_reach_records_root_connection() {
        let env = open_field();
        let start = Point2D::new(4.0, -1.0);
        let goal = Point2D::new(4.3, -1.0);
        let mut planner = RRTConnectPlanner::new_star(&env, start, goal, seeded(100, 0));
        assert_eq!(planner.plan().unwrap().points, vec![start, goal]);
        assert_eq!(planner.connection(), Some((0, 0)));
        assert!((planner.junction_gap().unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(planner.tree_stats(), TreeStats::dual(1, 1));
    }

    #[test]
    fn test_rrt_connect_sealed_goal_exhausts_budget() {
        let (env, goal) = sealed_goal_field();
        let start = Point2D::new(2.0, 2.0);
        for star in [false, true] {
            let config = seeded(300, 4);
            let mut planner = if star {
                RRTConnectPlanner::new_star(&env, start, goal, config)
            } else {
                RRTConnectPlanner::new(&env, start, goal, config)
            };
            assert!(planner.plan().is_none());
            assert_eq!(planner.iterations(), 300);
            assert!(planner.connection().is_none());
            let stats = planner.tree_stats();
            assert!(stats.start_tree > 1);
            assert!(stats.goal_tree.unwrap() >= 1);
        }
    }

    #[test]
    fn test_rrt_connect_seeded_runs_are_identical() {
        let env = wall_field();
        let start = Point2D::new(2.0, 2.0);
        let goal = Point2D::new(18.0, 2.0);
        let mut a = RRTConnectPlanner::new_star(&env, start, goal, seeded(5000, 21));
        let mut b = RRTConnectPlanner::new_star(&env, start, goal, seeded(5000, 21));
        let path_a = a.plan();
        assert!(path_a.is_some());
        assert_eq!(path_a, b.plan());
        assert_eq!(a.start_tree().nodes(), b.start_tree().nodes());
        assert_eq!(a.goal_tree().nodes(), b.goal_tree().nodes());
    }
}
