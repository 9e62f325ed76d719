//! Scenario configuration loading.
//!
//! A scenario file describes one environment, the start and goal, and the
//! planner settings shared by every variant that runs on it.

mod defaults;
mod planner;
mod scenario;

pub use planner::PlannerSection;
pub use scenario::ScenarioConfig;
