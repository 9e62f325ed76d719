//! Common types, traits, and error definitions for rust_rrt
//!
//! This module provides the building blocks shared by every planner
//! variant: geometry, the planning environment, errors and traits.

pub mod types;
pub mod environment;
pub mod traits;
pub mod error;

pub use types::*;
pub use environment::*;
pub use traits::*;
pub use error::*;
