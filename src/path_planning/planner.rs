//! Variant selection
//!
//! [`Planner`] runs any of the five RRT variants over the same environment
//! and reports the path together with the explored tree sizes.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{
    Environment, NoopObserver, Path2D, PlannerError, PlannerResult, PlanningObserver, Point2D,
    SamplingBasedPlanner,
};
use crate::path_planning::rrt::{RRTConfig, RRTPlanner};
use crate::path_planning::rrt_connect::{JunctionPolicy, RRTConnectPlanner};
use crate::path_planning::sampler::make_rng;
use crate::path_planning::shortcut::{PathShortcutter, ShortcutConfig};
use crate::path_planning::tree::{Tree, TreeStats};

/// The RRT family members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerVariant {
    Rrt,
    RrtStar,
    RrtConnect,
    RrtStarConnect,
    /// RRT-Connect followed by path shortcutting
    RrtConnectShortcut,
}

impl PlannerVariant {
    pub const ALL: [PlannerVariant; 5] = [
        PlannerVariant::Rrt,
        PlannerVariant::RrtStar,
        PlannerVariant::RrtConnect,
        PlannerVariant::RrtStarConnect,
        PlannerVariant::RrtConnectShortcut,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlannerVariant::Rrt => "RRT",
            PlannerVariant::RrtStar => "RRT*",
            PlannerVariant::RrtConnect => "RRT-Connect",
            PlannerVariant::RrtStarConnect => "RRT*-Connect",
            PlannerVariant::RrtConnectShortcut => "RRT-Connect+Shortcut",
        }
    }

    pub fn is_bidirectional(&self) -> bool {
        !matches!(self, PlannerVariant::Rrt | PlannerVariant::RrtStar)
    }

    pub fn is_cost_optimizing(&self) -> bool {
        matches!(self, PlannerVariant::RrtStar | PlannerVariant::RrtStarConnect)
    }
}

impl fmt::Display for PlannerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlannerVariant {
    type Err = PlannerError;

    /// Accepts display names and snake_case names, case-insensitively:
    /// `rrt*-connect`, `RRT_STAR_CONNECT` and `rrt*_connect` are the same.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_").replace('*', "_star");
        match key.as_str() {
            "rrt" => Ok(PlannerVariant::Rrt),
            "rrt_star" => Ok(PlannerVariant::RrtStar),
            "rrt_connect" => Ok(PlannerVariant::RrtConnect),
            "rrt_star_connect" => Ok(PlannerVariant::RrtStarConnect),
            "rrt_connect_shortcut" | "rrt_connect+shortcut" => Ok(PlannerVariant::RrtConnectShortcut),
            _ => Err(PlannerError::InvalidParameter(format!("unknown planner variant '{}'", s))),
        }
    }
}

/// What one planning run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub variant: PlannerVariant,
    /// Final waypoints from start to goal; `None` if the budget ran out
    pub path: Option<Path2D>,
    /// Waypoint count before shortcutting
    pub raw_waypoints: Option<usize>,
    pub stats: TreeStats,
    /// Explored trees: the start-rooted tree, then the goal-rooted one for
    /// bidirectional variants
    pub trees: Vec<Tree>,
    /// Iterations consumed by tree growth
    pub iterations: usize,
}

impl PlanResult {
    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    pub fn path_length(&self) -> Option<f64> {
        self.path.as_ref().map(Path2D::total_length)
    }
}

/// Runs one [`PlannerVariant`] over a borrowed environment
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    variant: PlannerVariant,
    env: &'a Environment,
    start: Point2D,
    goal: Point2D,
    config: RRTConfig,
    junction_policy: JunctionPolicy,
    shortcut: ShortcutConfig,
}

impl<'a> Planner<'a> {
    pub fn new(variant: PlannerVariant, env: &'a Environment, start: Point2D, goal: Point2D) -> Self {
        Planner {
            variant,
            env,
            start,
            goal,
            config: RRTConfig::default(),
            junction_policy: JunctionPolicy::default(),
            shortcut: ShortcutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RRTConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_junction_policy(mut self, policy: JunctionPolicy) -> Self {
        self.junction_policy = policy;
        self
    }

    pub fn with_shortcut_config(mut self, shortcut: ShortcutConfig) -> Self {
        self.shortcut = shortcut;
        self
    }

    pub fn variant(&self) -> PlannerVariant {
        self.variant
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    /// Check parameters and environment before planning
    pub fn validate(&self) -> PlannerResult<()> {
        self.config.validate()?;
        self.shortcut.validate()?;
        self.env.validate()
    }

    /// Plan with a generator built from the configured seed
    pub fn plan(&self) -> PlanResult {
        let mut rng = make_rng(self.config.seed);
        self.plan_with(&mut rng, &mut NoopObserver)
    }

    pub fn plan_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        observer: &mut dyn PlanningObserver,
    ) -> PlanResult {
        let (env, start, goal, config) = (self.env, self.start, self.goal, self.config.clone());

        let (path, stats, trees, iterations) = match self.variant {
            PlannerVariant::Rrt | PlannerVariant::RrtStar => {
                let mut planner = if self.variant.is_cost_optimizing() {
                    RRTPlanner::new_star(env, start, goal, config)
                } else {
                    RRTPlanner::new(env, start, goal, config)
                };
                let path = planner.plan_with(rng, observer);
                let trees = vec![planner.tree().clone()];
                (path, planner.tree_stats(), trees, planner.iterations())
            }
            PlannerVariant::RrtConnect
            | PlannerVariant::RrtStarConnect
            | PlannerVariant::RrtConnectShortcut => {
                let planner = if self.variant.is_cost_optimizing() {
                    RRTConnectPlanner::new_star(env, start, goal, config)
                } else {
                    RRTConnectPlanner::new(env, start, goal, config)
                };
                let mut planner = planner.with_junction_policy(self.junction_policy);
                let path = planner.plan_with(rng, observer);
                let trees = vec![planner.start_tree().clone(), planner.goal_tree().clone()];
                (path, planner.tree_stats(), trees, planner.iterations())
            }
        };

        let raw_waypoints = path.as_ref().map(Path2D::len);
        let path = match (self.variant, path) {
            (PlannerVariant::RrtConnectShortcut, Some(raw)) => {
                Some(PathShortcutter::new(env, self.shortcut.clone()).shortcut(&raw))
            }
            (_, path) => path,
        };

        PlanResult {
            variant: self.variant,
            path,
            raw_waypoints,
            stats,
            trees,
            iterations,
        }
    }
}
