//! Common traits defining interfaces for the planners

use crate::common::types::*;
use crate::path_planning::tree::TreeStats;

/// Trait for path planning algorithms
pub trait PathPlanner {
    /// Plan a path from the configured start to the configured goal.
    ///
    /// Returns `None` when the iteration budget is exhausted.
    fn plan(&mut self) -> Option<Path2D>;
}

/// Trait for sampling-based path planning algorithms (RRT family)
pub trait SamplingBasedPlanner: PathPlanner {
    /// Node counts of the tree(s) grown by the last run
    fn tree_stats(&self) -> TreeStats;

    /// Set maximum iterations for planning
    fn set_max_iterations(&mut self, max_iter: usize);
}

/// Snapshot handed to observers once per planning iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based iteration index
    pub iteration: usize,
    pub max_iter: usize,
    /// Total nodes across all trees after this iteration
    pub node_count: usize,
}

/// Receives per-iteration progress notifications.
///
/// Observers only see copies of counters; they cannot influence planning.
pub trait PlanningObserver {
    fn on_iteration(&mut self, progress: &Progress);
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PlanningObserver for NoopObserver {
    fn on_iteration(&mut self, _progress: &Progress) {}
}

impl<F> PlanningObserver for F
where
    F: FnMut(&Progress),
{
    fn on_iteration(&mut self, progress: &Progress) {
        self(progress)
    }
}
