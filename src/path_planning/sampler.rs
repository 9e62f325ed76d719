//! Goal-biased uniform sampling over the configuration space

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::common::{AreaBounds, Point2D};

/// Probability of returning the goal instead of a uniform sample
pub const GOAL_SAMPLE_RATE: f64 = 0.1;

/// Build the per-run generator: seeded runs are reproducible
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws random configurations, returning the goal 10% of the time
#[derive(Debug, Clone)]
pub struct GoalBiasedSampler {
    goal: Point2D,
    x_dist: Uniform<f64>,
    y_dist: Uniform<f64>,
}

impl GoalBiasedSampler {
    /// `bounds` must not be inverted
    pub fn new(bounds: &AreaBounds, goal: Point2D) -> Self {
        GoalBiasedSampler {
            goal,
            x_dist: Uniform::new_inclusive(bounds.xmin, bounds.xmax),
            y_dist: Uniform::new_inclusive(bounds.ymin, bounds.ymax),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point2D {
        if rng.gen::<f64>() < GOAL_SAMPLE_RATE {
            return self.goal;
        }
        Point2D::new(self.x_dist.sample(rng), self.y_dist.sample(rng))
    }
}
