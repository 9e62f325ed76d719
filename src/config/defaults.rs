//! Default value functions for serde.

use crate::path_planning::PlannerVariant;

pub fn variants() -> Vec<PlannerVariant> {
    PlannerVariant::ALL.to_vec()
}
