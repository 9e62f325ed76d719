//! Shared fixtures and property checks for planner tests

use crate::common::{AreaBounds, Environment, Path2D, Point2D, RectObstacle};
use crate::path_planning::tree::Tree;

/// 14 x 10 open field around the segment (0,0) -> (10,0)
pub fn open_field() -> Environment {
    Environment::open(AreaBounds::new(-2.0, 12.0, -5.0, 5.0))
}

/// 20 x 20 field with a wall that forces a detour around its top end
pub fn wall_field() -> Environment {
    Environment::new(
        AreaBounds::new(0.0, 20.0, 0.0, 20.0),
        vec![
            RectObstacle::new(9.0, 0.0, 2.0, 14.0),
            RectObstacle::new(3.0, 15.0, 2.0, 2.0),
            RectObstacle::new(14.0, 4.0, 3.0, 2.0),
        ],
    )
}

/// Goal at (15,15) sealed inside a ring of 0.5-thick walls
pub fn sealed_goal_field() -> (Environment, Point2D) {
    let env = Environment::new(
        AreaBounds::new(0.0, 20.0, 0.0, 20.0),
        vec![
            RectObstacle::new(13.0, 13.0, 4.0, 0.5),
            RectObstacle::new(13.0, 16.5, 4.0, 0.5),
            RectObstacle::new(13.0, 13.0, 0.5, 4.0),
            RectObstacle::new(16.5, 13.0, 0.5, 4.0),
        ],
    );
    (env, Point2D::new(15.0, 15.0))
}

pub fn assert_endpoints(path: &Path2D, start: Point2D, goal: Point2D) {
    let first = path.first().expect("path is empty");
    let last = path.last().expect("path is empty");
    assert!(first.distance(&start) < 1e-9, "path starts at {:?}, expected {:?}", first, start);
    assert!(last.distance(&goal) < 1e-9, "path ends at {:?}, expected {:?}", last, goal);
}

pub fn assert_collision_free(env: &Environment, path: &Path2D) {
    for (i, w) in path.points.windows(2).enumerate() {
        assert!(
            env.is_segment_free(&w[0], &w[1]),
            "segment {} {:?} -> {:?} collides",
            i, w[0], w[1]
        );
    }
}

pub fn assert_acyclic(tree: &Tree) {
    for id in 0..tree.len() {
        assert!(tree.depth(id).is_some(), "node {} is on a parent cycle", id);
    }
}

/// Every non-root node costs exactly its parent's cost plus the edge length
pub fn assert_costs_consistent(tree: &Tree) {
    for (id, node) in tree.nodes().iter().enumerate() {
        match node.parent {
            Some(p) => {
                let expected = tree.cost(p) + tree.position(p).distance(&node.position);
                assert!(
                    (node.cost - expected).abs() < 1e-9,
                    "node {} cost {} but parent chain gives {}",
                    id, node.cost, expected
                );
            }
            None => assert_eq!(id, tree.root()),
        }
    }
}
