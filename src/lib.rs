//! rust_rrt - the RRT family of sampling-based path planners
//!
//! RRT, RRT*, RRT-Connect, RRT*-Connect and RRT-Connect with path
//! shortcutting, planning in a 2D field of axis-aligned rectangular
//! obstacles.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{AreaBounds, Environment, Path2D, Point2D, RectObstacle};
pub use common::{PathPlanner, PlanningObserver, Progress, SamplingBasedPlanner};
pub use common::{PlannerError, PlannerResult};
pub use config::ScenarioConfig;
pub use path_planning::{PlanResult, Planner, PlannerVariant};
