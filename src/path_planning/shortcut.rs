//! Path shortcutting
//!
//! Greedy line-of-sight simplification of a waypoint sequence. From each
//! waypoint the farthest later waypoint reachable by a free straight segment
//! is linked directly and everything in between is dropped. Passes repeat
//! until nothing changes or the pass cap is hit.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::common::{Environment, Path2D, PlannerError, PlannerResult};

/// Path shortcutting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    /// Maximum number of optimization passes
    pub max_passes: usize,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self { max_passes: 100 }
    }
}

impl ShortcutConfig {
    pub fn validate(&self) -> PlannerResult<()> {
        if self.max_passes == 0 {
            return Err(PlannerError::InvalidParameter(
                "max_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one shortcutting run
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutReport {
    pub passes: usize,
    pub removed_points: usize,
    pub original_length: f64,
    pub shortened_length: f64,
}

impl ShortcutReport {
    /// Length reduction in percent of the original length
    pub fn improvement_percent(&self) -> f64 {
        if self.original_length > 0.0 {
            (self.original_length - self.shortened_length) / self.original_length * 100.0
        } else {
            0.0
        }
    }
}

/// Line-of-sight path shortcutter
pub struct PathShortcutter<'a> {
    env: &'a Environment,
    config: ShortcutConfig,
}

impl<'a> PathShortcutter<'a> {
    pub fn new(env: &'a Environment, config: ShortcutConfig) -> Self {
        Self { env, config }
    }

    pub fn with_defaults(env: &'a Environment) -> Self {
        Self::new(env, ShortcutConfig::default())
    }

    pub fn config(&self) -> &ShortcutConfig {
        &self.config
    }

    /// Shortened copy of `path`. Paths of two or fewer points come back
    /// unchanged.
    pub fn shortcut(&self, path: &Path2D) -> Path2D {
        self.shortcut_with_report(path).0
    }

    pub fn shortcut_with_report(&self, path: &Path2D) -> (Path2D, ShortcutReport) {
        let original_length = path.total_length();
        let mut points = path.points.clone();
        let mut passes = 0;

        if points.len() > 2 {
            debug!("shortcutting path: {} points, length {:.2}", points.len(), original_length);

            let mut improved = true;
            while improved && passes < self.config.max_passes {
                improved = false;
                passes += 1;

                let mut i = 0;
                while i + 2 < points.len() {
                    let max_skip = points.len() - 1 - i;
                    // Longest skip first; a skip of 1 is the existing segment.
                    let farthest = (2..=max_skip)
                        .rev()
                        .map(|skip| i + skip)
                        .find(|&j| self.env.is_segment_free(&points[i], &points[j]));
                    match farthest {
                        Some(j) => {
                            debug!("pass {}: linking point {} to point {}, dropping {}", passes, i, j, j - i - 1);
                            points.drain(i + 1..j);
                            improved = true;
                        }
                        None => i += 1,
                    }
                }
            }
        }

        let shortened = Path2D::from_points(points);
        let report = ShortcutReport {
            passes,
            removed_points: path.len() - shortened.len(),
            original_length,
            shortened_length: shortened.total_length(),
        };

        if passes > 0 {
            info!(
                "shortcut: {} -> {} points, length {:.2} -> {:.2} ({:.1}% shorter) in {} passes",
                path.len(),
                shortened.len(),
                report.original_length,
                report.shortened_length,
                report.improvement_percent(),
                passes
            );
        }

        (shortened, report)
    }
}
