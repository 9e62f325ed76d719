//! RRT (Rapidly-exploring Random Tree) path planning algorithm
//!
//! Sampling-based path planning algorithm that builds a tree by
//! randomly sampling the configuration space. The same loop runs RRT*
//! when constructed with [`ExtendStrategy::CostOptimizing`].

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{
    Environment, NoopObserver, Path2D, PathPlanner, PlannerError, PlannerResult,
    PlanningObserver, Point2D, Progress, SamplingBasedPlanner,
};
use crate::path_planning::extend::{ExtendStrategy, TreeExtender};
use crate::path_planning::sampler::{make_rng, GoalBiasedSampler};
use crate::path_planning::tree::{NodeId, Tree, TreeStats};

/// A node closer than this to the goal (with a free segment) reaches it
pub const GOAL_THRESHOLD: f64 = 0.5;

/// Iterations between progress log lines
pub const PROGRESS_LOG_INTERVAL: usize = 100;

/// Configuration shared by every RRT variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RRTConfig {
    /// Expansion distance per step
    pub step_size: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Near-set radius for the cost-optimizing variants
    pub search_radius: f64,
    /// Random seed (None for a non-deterministic run)
    pub seed: Option<u64>,
}

impl Default for RRTConfig {
    fn default() -> Self {
        Self {
            step_size: 0.5,
            max_iter: 1000,
            search_radius: 1.5,
            seed: None,
        }
    }
}

impl RRTConfig {
    pub fn validate(&self) -> PlannerResult<()> {
        if !(self.step_size > 0.0 && self.step_size.is_finite()) {
            return Err(PlannerError::InvalidParameter(format!(
                "step_size must be positive and finite, got {}",
                self.step_size
            )));
        }
        if !(self.search_radius > 0.0 && self.search_radius.is_finite()) {
            return Err(PlannerError::InvalidParameter(format!(
                "search_radius must be positive and finite, got {}",
                self.search_radius
            )));
        }
        Ok(())
    }
}

/// True if `point` is within [`GOAL_THRESHOLD`] of `goal` and the straight
/// segment between them is free
pub fn is_goal_reached(env: &Environment, point: &Point2D, goal: &Point2D) -> bool {
    point.distance(goal) < GOAL_THRESHOLD && env.is_segment_free(point, goal)
}

pub(crate) fn strategy_label(strategy: ExtendStrategy, bidirectional: bool) -> &'static str {
    match (strategy, bidirectional) {
        (ExtendStrategy::Plain, false) => "RRT",
        (ExtendStrategy::CostOptimizing { .. }, false) => "RRT*",
        (ExtendStrategy::Plain, true) => "RRT-Connect",
        (ExtendStrategy::CostOptimizing { .. }, true) => "RRT*-Connect",
    }
}

/// Single-tree RRT / RRT* planner
pub struct RRTPlanner<'a> {
    env: &'a Environment,
    start: Point2D,
    goal: Point2D,
    config: RRTConfig,
    strategy: ExtendStrategy,
    tree: Tree,
    goal_node: Option<NodeId>,
    iterations: usize,
}

impl<'a> RRTPlanner<'a> {
    /// Create a plain RRT planner
    pub fn new(env: &'a Environment, start: Point2D, goal: Point2D, config: RRTConfig) -> Self {
        Self::with_strategy(env, start, goal, config, ExtendStrategy::Plain)
    }

    /// Create an RRT* planner using `config.search_radius`
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
        RRTPlanner {
            env,
            start,
            goal,
            config,
            strategy,
            tree: Tree::new(start),
            goal_node: None,
            iterations: 0,
        }
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    /// Get the tree built during planning
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Goal node of the last successful run
    pub fn goal_node(&self) -> Option<NodeId> {
        self.goal_node
    }

    /// Accumulated cost recorded at the goal node
    pub fn goal_cost(&self) -> Option<f64> {
        self.goal_node.map(|id| self.tree.cost(id))
    }

    /// Iterations consumed by the last run
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run the planner with an explicit random source and progress observer.
    ///
    /// The tree is reset to the start configuration first.
    pub fn plan_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        observer: &mut dyn PlanningObserver,
    ) -> Option<Path2D> {
        let label = strategy_label(self.strategy, false);
        self.tree = Tree::new(self.start);
        self.goal_node = None;
        self.iterations = 0;

        debug!("{} planning start: {:?} -> {:?}", label, self.start, self.goal);

        if let Some(goal_node) = self.try_reach_goal(self.tree.root()) {
            info!("{}: start already within reach of the goal", label);
            return Some(self.extract_path(goal_node));
        }

        let sampler = GoalBiasedSampler::new(&self.env.bounds, self.goal);
        let extender = TreeExtender::new(self.env, self.config.step_size, self.strategy);
        let max_iter = self.config.max_iter;

        for i in 0..max_iter {
            self.iterations = i + 1;
            let sample = sampler.sample(rng);

            let reached = extender
                .extend(&mut self.tree, &sample)
                .and_then(|new_ind| self.try_reach_goal(new_ind));

            observer.on_iteration(&Progress {
                iteration: i,
                max_iter,
                node_count: self.tree.len(),
            });

            if let Some(goal_node) = reached {
                info!(
                    "{}: found path after {} iterations ({} nodes)",
                    label, i + 1, self.tree.len()
                );
                return Some(self.extract_path(goal_node));
            }

            if (i + 1) % PROGRESS_LOG_INTERVAL == 0 {
                debug!("{} iteration {}/{}, nodes: {}", label, i + 1, max_iter, self.tree.len());
            }
        }

        info!(
            "{}: no path within {} iterations ({} nodes explored)",
            label, max_iter, self.tree.len()
        );
        None
    }

    /// Attach the goal under `from` if it is reachable from there
    fn try_reach_goal(&mut self, from: NodeId) -> Option<NodeId> {
        let pos = self.tree.position(from);
        if !is_goal_reached(self.env, &pos, &self.goal) {
            return None;
        }
        let goal_node = if pos == self.goal {
            from
        } else {
            let cost = self.tree.cost(from) + pos.distance(&self.goal);
            self.tree.push(self.goal, from, cost)
        };
        self.goal_node = Some(goal_node);
        Some(goal_node)
    }

    fn extract_path(&self, goal_node: NodeId) -> Path2D {
        let mut points = self.tree.path_to_root(goal_node);
        points.reverse();
        Path2D::from_points(points)
    }
}

impl PathPlanner for RRTPlanner<'_> {
    fn plan(&mut self) -> Option<Path2D> {
        let mut rng = make_rng(self.config.seed);
        self.plan_with(&mut rng, &mut NoopObserver)
    }
}

impl SamplingBasedPlanner for RRTPlanner<'_> {
    fn tree_stats(&self) -> TreeStats {
        TreeStats::single(self.tree.len())
    }

    fn set_max_iterations(&mut self, max_iter: usize) {
        self.config.max_iter = max_iter;
    }
}
