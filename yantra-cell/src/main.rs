//! YantraCell - Work-cell driver for the YantraPlan motion scheduler
//!
//! Reads a work-cell description (robot bases, joint limits, safety
//! clearances, pick-and-place operations), plans a collision-free schedule
//! for every robot, and writes the time-stamped waypoint schedules.
//!
//! The planning engine itself is synchronous; the driver offloads the run
//! onto a worker thread so the entry thread stays free for logging and
//! signal delivery.
//!
//! # Usage
//!
//! ```bash
//! yantra-cell cell.txt
//! yantra-cell cell.txt --output plan.txt
//! cat cell.txt | yantra-cell
//! yantra-cell cell.txt --config yantra.toml
//! ```

mod config;
mod error;

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use yantra_plan::Planner;

use config::CellConfig;
use error::Result;

struct Args {
    input_path: Option<String>,
    config_path: Option<String>,
    output_path: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("yantra_cell=info".parse().unwrap()),
        )
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(&argv[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_args(argv: &[String]) -> std::result::Result<Args, String> {
    let mut input_path = None;
    let mut config_path = None;
    let mut output_path = None;

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(take_value(argv, &mut i, "--config")?);
            }
            "--output" | "-o" => {
                output_path = Some(take_value(argv, &mut i, "--output")?);
            }
            "--help" | "-h" => {
                return Err("Help requested".to_string());
            }
            "-" => {
                input_path = None;
            }
            arg if !arg.starts_with('-') => {
                if input_path.is_some() {
                    return Err("Multiple input files specified".to_string());
                }
                input_path = Some(arg.to_string());
            }
            _ => {
                return Err(format!("Unknown argument: {}", argv[i]));
            }
        }
        i += 1;
    }

    Ok(Args {
        input_path,
        config_path,
        output_path,
    })
}

fn take_value(argv: &[String], i: &mut usize, flag: &str) -> std::result::Result<String, String> {
    *i += 1;
    argv.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [input-file] [options]", program);
    eprintln!();
    eprintln!("Reads the work-cell description from input-file, or stdin when omitted.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <path>   TOML configuration (default: yantra.toml if present)");
    eprintln!("  -o, --output <path>   Write the schedule here instead of stdout");
    eprintln!("  -h, --help            Show this help");
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    let input = match &args.input_path {
        Some(path) => {
            info!("Reading work cell from {}", path);
            std::fs::read_to_string(path)?
        }
        None => {
            info!("Reading work cell from stdin");
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    // The engine is synchronous and shares nothing; run it on a worker so
    // this thread stays responsive.
    let planner = Planner::new(config.planner.clone());
    let worker = std::thread::spawn(move || planner.plan(&input));
    let plan = worker.join().map_err(|_| error::CellError::Worker)??;

    info!("Plan complete, makespan {} ms", plan.makespan_ms);
    let rendered = plan.render();

    let output_path = args.output_path.or(config.output.result_path);
    match output_path {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            info!("Schedule written to {}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<CellConfig> {
    if let Some(path) = &args.config_path {
        info!("Loading configuration from {}", path);
        return CellConfig::load(Path::new(path));
    }
    if Path::new("yantra.toml").exists() {
        info!("Loading configuration from yantra.toml");
        return CellConfig::load(Path::new("yantra.toml"));
    }
    debug!("Using default configuration");
    Ok(CellConfig::default())
}
