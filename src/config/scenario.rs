//! ScenarioConfig and conversion to planners.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::planner::PlannerSection;
use crate::common::{Environment, PlannerError, PlannerResult, Point2D};
use crate::path_planning::{Planner, PlannerVariant};

/// One planning problem loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Label used in reports and plot titles
    #[serde(default)]
    pub name: String,

    /// Bounds and obstacles
    pub environment: Environment,

    pub start: Point2D,

    pub goal: Point2D,

    /// Planner settings
    #[serde(default)]
    pub planner: PlannerSection,
}

impl ScenarioConfig {
    pub fn new(environment: Environment, start: Point2D, goal: Point2D) -> Self {
        Self {
            name: String::new(),
            environment,
            start,
            goal,
            planner: PlannerSection::default(),
        }
    }

    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> PlannerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> PlannerResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> PlannerResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the environment, the endpoints and the planner settings
    pub fn validate(&self) -> PlannerResult<()> {
        self.environment.validate()?;
        self.planner.validate()?;

        for (label, point) in [("start", &self.start), ("goal", &self.goal)] {
            if !self.environment.bounds.contains(point) {
                return Err(PlannerError::InvalidParameter(format!(
                    "{} {:?} lies outside the bounds",
                    label, point
                )));
            }
            if !self.environment.is_point_free(point) {
                return Err(PlannerError::InvalidParameter(format!(
                    "{} {:?} lies inside an obstacle",
                    label, point
                )));
            }
        }
        Ok(())
    }

    /// Planner for `variant` configured from this scenario
    pub fn planner(&self, variant: PlannerVariant) -> Planner<'_> {
        Planner::new(variant, &self.environment, self.start, self.goal)
            .with_config(self.planner.rrt.clone())
            .with_junction_policy(self.planner.junction_policy)
            .with_shortcut_config(self.planner.shortcut.clone())
    }
}
