//! Error types for rust_rrt
//!
//! Planning itself never fails with an error: an exhausted iteration budget is
//! reported as an absent path. These errors cover configuration, I/O and
//! rendering around the planners.

use thiserror::Error;

/// Main error type for the planner crate
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Invalid parameter or malformed environment
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {0}")]
    Config(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    Visualization(String),
}

impl From<serde_yaml::Error> for PlannerError {
    fn from(e: serde_yaml::Error) -> Self {
        PlannerError::Config(e.to_string())
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
