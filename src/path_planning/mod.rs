// Path Planning algorithms module

pub mod tree;
pub mod sampler;
pub mod extend;
pub mod rrt_star;
pub mod rrt;
pub mod rrt_connect;
pub mod shortcut;
pub mod planner;

#[cfg(test)]
mod test_support;

pub use tree::*;
pub use sampler::*;
pub use extend::*;
pub use rrt_star::*;
pub use rrt::*;
pub use rrt_connect::*;
pub use shortcut::*;
pub use planner::*;
