//! Side-by-side comparison of the RRT variants on one scenario.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin rrt_comparison -- --scenario configs/benchmark.yaml --plot-dir output
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use log::{info, warn};

use rust_rrt::utils::{colors, PathStyle, Visualizer};
use rust_rrt::{PlanResult, PlannerResult, PlannerVariant, ScenarioConfig};

/// Run every configured RRT variant on a scenario and compare the results
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file path
    #[arg(short, long, default_value = "configs/benchmark.yaml")]
    scenario: PathBuf,

    /// Override the scenario's random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's iteration budget
    #[arg(long)]
    max_iter: Option<usize>,

    /// Only run these variants (e.g. rrt, "rrt*", rrt-connect)
    #[arg(short, long, value_delimiter = ',')]
    variants: Vec<PlannerVariant>,

    /// Write one PNG per variant into this directory
    #[arg(short, long)]
    plot_dir: Option<PathBuf>,
}

struct Run {
    result: PlanResult,
    elapsed: Duration,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Loading scenario from {:?}", args.scenario);
    let mut scenario = ScenarioConfig::load(&args.scenario)?;
    if let Some(seed) = args.seed {
        scenario.planner.rrt.seed = Some(seed);
    }
    if let Some(max_iter) = args.max_iter {
        scenario.planner.rrt.max_iter = max_iter;
    }
    if !args.variants.is_empty() {
        scenario.planner.variants = args.variants.clone();
    }
    scenario.validate()?;

    info!(
        "Scenario '{}': {} obstacles, start {:?}, goal {:?}, step {}, max_iter {}",
        scenario.name,
        scenario.environment.obstacles.len(),
        scenario.start,
        scenario.goal,
        scenario.planner.rrt.step_size,
        scenario.planner.rrt.max_iter
    );

    let mut runs = Vec::new();
    for &variant in &scenario.planner.variants {
        info!("Running {}...", variant);
        let planner = scenario.planner(variant);
        let timer = Instant::now();
        let result = planner.plan();
        let elapsed = timer.elapsed();

        if !result.is_success() {
            warn!("{}: no path after {} iterations", variant, result.iterations);
        }
        if let Some(dir) = &args.plot_dir {
            plot_run(&scenario, &result, dir)?;
        }
        runs.push(Run { result, elapsed });
    }

    print_comparison(&runs);
    Ok(())
}

fn print_comparison(runs: &[Run]) {
    println!();
    println!(
        "{:<22} {:>8} {:>10} {:>10} {:>10} {:>12} {:>10}",
        "Algorithm", "Success", "Nodes", "Waypoints", "Raw", "Length", "Time [ms]"
    );
    println!("{}", "-".repeat(88));

    for run in runs {
        let r = &run.result;
        let nodes = match r.stats.goal_tree {
            Some(goal_tree) => format!("{}+{}", r.stats.start_tree, goal_tree),
            None => r.stats.start_tree.to_string(),
        };
        let waypoints = r.path.as_ref().map_or("-".to_string(), |p| p.len().to_string());
        let raw = r.raw_waypoints.map_or("-".to_string(), |n| n.to_string());
        let length = r.path_length().map_or("-".to_string(), |l| format!("{:.2}", l));

        println!(
            "{:<22} {:>8} {:>10} {:>10} {:>10} {:>12} {:>10.2}",
            r.variant.name(),
            if r.is_success() { "yes" } else { "no" },
            nodes,
            waypoints,
            raw,
            length,
            run.elapsed.as_secs_f64() * 1000.0
        );
    }

    if let Some(best) = runs
        .iter()
        .filter_map(|run| run.result.path_length().map(|l| (run.result.variant, l)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
    {
        println!();
        println!("Shortest path: {} ({:.2})", best.0, best.1);
    }
}

fn plot_run(scenario: &ScenarioConfig, result: &PlanResult, dir: &Path) -> PlannerResult<()> {
    std::fs::create_dir_all(dir)?;

    let mut vis = Visualizer::new();
    vis.set_title(&format!("{} - {}", scenario.name, result.variant));
    vis.plot_environment(&scenario.environment);

    let tree_colors = [colors::START_TREE, colors::GOAL_TREE];
    let tree_captions = ["Start tree", "Goal tree"];
    for (i, tree) in result.trees.iter().enumerate() {
        vis.plot_tree(tree, tree_colors[i % 2], tree_captions[i % 2]);
    }

    if let Some(path) = &result.path {
        vis.plot_path(path, &PathStyle::default().with_line_width(2.5));
    }
    vis.plot_start(scenario.start);
    vis.plot_goal(scenario.goal);

    let file_name = format!("{:?}.png", result.variant).to_lowercase();
    let out = dir.join(file_name);
    vis.save_png(&out, 1000, 1000)?;
    info!("Plot saved to {:?}", out);
    Ok(())
}
