//! Planner configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::common::PlannerResult;
use crate::path_planning::{JunctionPolicy, PlannerVariant, RRTConfig, ShortcutConfig};

/// Settings shared by every variant run on a scenario
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Tree growth parameters
    #[serde(default)]
    pub rrt: RRTConfig,

    /// Post-processing for the shortcut variant
    #[serde(default)]
    pub shortcut: ShortcutConfig,

    /// Connect termination for the bidirectional variants
    #[serde(default)]
    pub junction_policy: JunctionPolicy,

    /// Variants to run, in order
    #[serde(default = "defaults::variants")]
    pub variants: Vec<PlannerVariant>,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            rrt: RRTConfig::default(),
            shortcut: ShortcutConfig::default(),
            junction_policy: JunctionPolicy::default(),
            variants: defaults::variants(),
        }
    }
}

impl PlannerSection {
    pub fn validate(&self) -> PlannerResult<()> {
        self.rrt.validate()?;
        self.shortcut.validate()
    }
}
