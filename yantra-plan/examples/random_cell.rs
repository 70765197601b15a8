//! Random work-cell demo
//!
//! Generates a random fleet of robots with reachable pick-and-place
//! operations, runs the planner, and prints the resulting schedule.
//!
//! Usage:
//!   cargo run --example random_cell -- --robots 3 --ops 6
//!   cargo run --example random_cell -- --seed 42
//!
//! Enable debug logging to watch the pipeline stages:
//!   RUST_LOG=debug cargo run --example random_cell

use clap::Parser;
use rand::prelude::*;
use rand::rngs::StdRng;

use yantra_plan::{Planner, PlannerConfig};

/// Random work-cell demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of robots, spaced 1.5 m apart along the x axis
    #[arg(short, long, default_value_t = 2)]
    robots: usize,

    /// Number of pick-and-place operations
    #[arg(short, long, default_value_t = 4)]
    ops: usize,

    /// Dwell time at each pick and place point, in milliseconds
    #[arg(short, long, default_value_t = 300)]
    process_time: u32,

    /// RNG seed; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    println!("# seed {seed}");
    let input = generate_cell(&mut rng, args.robots, args.ops, args.process_time);
    println!("# input\n{input}");

    match Planner::new(PlannerConfig::default()).plan(&input) {
        Ok(plan) => {
            println!("# plan, makespan {} ms", plan.makespan_ms);
            print!("{}", plan.render());
        }
        Err(e) => {
            eprintln!("planning failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Build input text: bases along x, each op picked near a random robot.
fn generate_cell(rng: &mut StdRng, robots: usize, ops: usize, process_time: u32) -> String {
    let mut text = format!("{robots} {ops}\n");
    for r in 0..robots {
        text.push_str(&format!("{:.1} 0.0 0.0\n", r as f64 * 1.5));
    }
    text.push_str("-170 170 90 45\n");
    text.push_str("-120 120 90 45\n");
    text.push_str("-120 120 90 45\n");
    text.push_str("-170 170 90 45\n");
    text.push_str("-120 120 90 45\n");
    text.push_str("-170 170 90 45\n");
    text.push_str("0.1 0.2\n");

    for _ in 0..ops {
        let home = rng.gen_range(0..robots) as f64 * 1.5;
        let pick = random_point_near(rng, home);
        let place = random_point_near(rng, home);
        text.push_str(&format!(
            "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} {}\n",
            pick.0, pick.1, pick.2, place.0, place.1, place.2, process_time
        ));
    }
    text
}

/// A point comfortably inside one robot's workspace.
fn random_point_near(rng: &mut StdRng, base_x: f64) -> (f64, f64, f64) {
    let radius = rng.gen_range(0.35..0.6);
    let azimuth = rng.gen_range(0.0..std::f64::consts::TAU);
    let z = rng.gen_range(0.15..0.45);
    (
        base_x + radius * azimuth.cos(),
        radius * azimuth.sin(),
        z,
    )
}
