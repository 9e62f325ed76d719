//! Visualization utilities for rust_rrt
//!
//! Draws environments, explored trees and planned paths with gnuplot.
//! Layers are collected first and rendered onto a single set of axes when
//! the figure is saved.

use std::path::Path;

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Environment, Path2D, PlannerError, PlannerResult, Point2D};
use crate::path_planning::Tree;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00AA00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const GRAY: &str = "#808080";
    pub const LIGHT_BLUE: &str = "#9EC5F0";
    pub const LIGHT_ORANGE: &str = "#F5C992";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const BOUNDS: &str = GRAY;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
    pub const RAW_PATH: &str = ORANGE;
    pub const START_TREE: &str = LIGHT_BLUE;
    pub const GOAL_TREE: &str = LIGHT_ORANGE;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

#[derive(Debug, Clone)]
enum Layer {
    Lines {
        x: Vec<f64>,
        y: Vec<f64>,
        color: String,
        width: f64,
        caption: Option<String>,
    },
    Points {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PointStyle,
    },
}

/// Collects plot layers and renders them with gnuplot
pub struct Visualizer {
    figure: Figure,
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            layers: Vec::new(),
            title: String::new(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_label(&mut self, label: &str) -> &mut Self {
        self.x_label = label.to_string();
        self
    }

    pub fn set_y_label(&mut self, label: &str) -> &mut Self {
        self.y_label = label.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Number of layers queued for rendering
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Bounds rectangle, every obstacle outline, and axis ranges fitted to
    /// the bounds
    pub fn plot_environment(&mut self, env: &Environment) -> &mut Self {
        let b = &env.bounds;
        self.push_lines(
            vec![b.xmin, b.xmax, b.xmax, b.xmin, b.xmin],
            vec![b.ymin, b.ymin, b.ymax, b.ymax, b.ymin],
            colors::BOUNDS,
            1.0,
            None,
        );
        self.set_x_range(b.xmin, b.xmax);
        self.set_y_range(b.ymin, b.ymax);
        self.plot_obstacles(env)
    }

    /// Obstacle outlines; only the first carries a legend entry
    pub fn plot_obstacles(&mut self, env: &Environment) -> &mut Self {
        for (i, obstacle) in env.obstacles.iter().enumerate() {
            let outline = obstacle.outline();
            let caption = if i == 0 { Some("Obstacles".to_string()) } else { None };
            self.push_lines(
                outline.iter().map(|p| p.x).collect(),
                outline.iter().map(|p| p.y).collect(),
                colors::OBSTACLE,
                1.5,
                caption,
            );
        }
        self
    }

    /// Every parent-child edge of `tree`
    pub fn plot_tree(&mut self, tree: &Tree, color: &str, caption: &str) -> &mut Self {
        let mut captioned = false;
        for node in tree.nodes() {
            if let Some(parent) = node.parent {
                let from = tree.position(parent);
                let caption = if captioned { None } else { Some(caption.to_string()) };
                captioned = true;
                self.push_lines(
                    vec![from.x, node.position.x],
                    vec![from.y, node.position.y],
                    color,
                    0.5,
                    caption,
                );
            }
        }
        self
    }

    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.push_lines(
            path.x_coords(),
            path.y_coords(),
            &style.color,
            style.line_width,
            Some(style.caption.clone()),
        );
        self
    }

    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.plot_points(&[point], style)
    }

    pub fn plot_points(&mut self, points: &[Point2D], style: &PointStyle) -> &mut Self {
        self.layers.push(Layer::Points {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            style: style.clone(),
        });
        self
    }

    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5).with_symbol('S'))
    }

    /// Save plot to PNG file
    pub fn save_png<P: AsRef<Path>>(&mut self, path: P, width: u32, height: u32) -> PlannerResult<()> {
        self.render();
        self.figure
            .save_to_png(path.as_ref(), width, height)
            .map_err(|e| PlannerError::Visualization(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg<P: AsRef<Path>>(&mut self, path: P, width: u32, height: u32) -> PlannerResult<()> {
        self.render();
        self.figure
            .save_to_svg(path.as_ref(), width, height)
            .map_err(|e| PlannerError::Visualization(e.to_string()))
    }

    fn push_lines(&mut self, x: Vec<f64>, y: Vec<f64>, color: &str, width: f64, caption: Option<String>) {
        self.layers.push(Layer::Lines {
            x,
            y,
            color: color.to_string(),
            width,
            caption,
        });
    }

    fn render(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes2d();

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, color, width, caption: Some(caption) } => {
                    axes.lines(x, y, &[Caption(caption), Color(color.as_str()), LineWidth(*width)]);
                }
                Layer::Lines { x, y, color, width, caption: None } => {
                    axes.lines(x, y, &[Color(color.as_str()), LineWidth(*width)]);
                }
                Layer::Points { x, y, style } => {
                    axes.points(x, y, &[
                        Caption(&style.caption),
                        Color(style.color.as_str()),
                        PointSymbol(style.symbol),
                        PointSize(style.size),
                    ]);
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AreaBounds, RectObstacle};

    #[test]
    fn test_visualizer_creation() {
        let vis = Visualizer::new();
        assert!(vis.aspect_ratio.is_some());
        assert_eq!(vis.layer_count(), 0);
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_layers_collected() {
        let env = Environment::new(
            AreaBounds::new(0.0, 10.0, 0.0, 10.0),
            vec![RectObstacle::new(1.0, 1.0, 2.0, 2.0), RectObstacle::new(5.0, 5.0, 1.0, 3.0)],
        );
        let mut tree = Tree::new(Point2D::new(0.5, 0.5));
        let a = tree.push(Point2D::new(0.5, 4.0), 0, 3.5);
        tree.push(Point2D::new(4.0, 4.0), a, 7.0);

        let mut vis = Visualizer::new();
        vis.plot_environment(&env)
            .plot_tree(&tree, colors::START_TREE, "Tree")
            .plot_start(Point2D::new(0.5, 0.5))
            .plot_goal(Point2D::new(9.0, 9.0));

        // bounds + 2 obstacles + 2 edges + start + goal
        assert_eq!(vis.layer_count(), 7);
        assert_eq!(vis.x_range, Some((0.0, 10.0)));
    }
}
