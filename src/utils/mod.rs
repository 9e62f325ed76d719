//! Utility modules for rust_rrt

pub mod visualization;

pub use visualization::{colors, PathStyle, PointStyle, Visualizer};
