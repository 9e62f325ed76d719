//! Planning environment: bounds, rectangular obstacles and the collision oracle

use serde::{Deserialize, Serialize};

use crate::common::error::{PlannerError, PlannerResult};
use crate::common::types::{AreaBounds, Point2D, RectObstacle};

/// Linear sampling resolution used when checking a segment.
///
/// Obstacles thinner than this along the segment direction can be missed.
pub const SEGMENT_RESOLUTION: f64 = 0.1;

/// Static description of the configuration space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub bounds: AreaBounds,
    #[serde(default)]
    pub obstacles: Vec<RectObstacle>,
}

impl Environment {
    pub fn new(bounds: AreaBounds, obstacles: Vec<RectObstacle>) -> Self {
        Self { bounds, obstacles }
    }

    /// Obstacle-free environment
    pub fn open(bounds: AreaBounds) -> Self {
        Self::new(bounds, Vec::new())
    }

    /// Check the well-formedness guarantees planners rely on
    pub fn validate(&self) -> PlannerResult<()> {
        let b = &self.bounds;
        let finite = [b.xmin, b.xmax, b.ymin, b.ymax].iter().all(|v| v.is_finite());
        if !(finite && b.xmin <= b.xmax && b.ymin <= b.ymax) {
            return Err(PlannerError::InvalidParameter(format!(
                "bounds are inverted or not finite: {:?}",
                b
            )));
        }
        for (i, obs) in self.obstacles.iter().enumerate() {
            if ![obs.x, obs.y, obs.width, obs.height].iter().all(|v| v.is_finite()) {
                return Err(PlannerError::InvalidParameter(format!(
                    "obstacle {} is not finite: {:?}",
                    i, obs
                )));
            }
            if !(obs.width >= 0.0 && obs.height >= 0.0) {
                return Err(PlannerError::InvalidParameter(format!(
                    "obstacle {} has negative extent (width={}, height={})",
                    i, obs.width, obs.height
                )));
            }
        }
        Ok(())
    }

    /// True if the point is inside bounds and outside every obstacle
    pub fn is_point_free(&self, point: &Point2D) -> bool {
        self.bounds.contains(point) && !self.obstacles.iter().any(|obs| obs.contains(point))
    }

    /// Discretized segment test.
    ///
    /// Samples `max(floor(d / SEGMENT_RESOLUTION), 1)` equal sub-intervals,
    /// both endpoints included, and stops at the first sample that is out of
    /// bounds or inside an obstacle.
    pub fn is_segment_free(&self, from: &Point2D, to: &Point2D) -> bool {
        let steps = segment_steps(from.distance(to));
        (0..=steps).all(|i| {
            let t = i as f64 / steps as f64;
            self.is_point_free(&from.lerp(to, t))
        })
    }
}

fn segment_steps(distance: f64) -> usize {
    ((distance / SEGMENT_RESOLUTION).floor() as usize).max(1)
}
