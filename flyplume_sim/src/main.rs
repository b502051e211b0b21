//! Fly plume simulator CLI
//!
//! Runs seeded headless episodes and reports how the fly fared.

use clap::Parser;
use flyplume_sim::scenarios::ScenarioId;
use flyplume_sim::{net_displacement, ScenarioResult, ScenarioRunner, SimConfig, SimError};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Fly plume-navigation simulator
#[derive(Parser, Debug)]
#[command(name = "flyplume-sim")]
#[command(about = "Run deterministic fly plume-navigation episodes", long_about = None)]
struct Args {
    /// Master seed for determinism
    #[arg(short, long)]
    seed: Option<u64>,

    /// Scenario to run (upwind_ones, blank_cast, rolling_surge, random_walk, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Ticks per episode
    #[arg(short, long)]
    ticks: Option<u64>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,

    /// Export a single scenario's trajectory to this JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export every N-th tick
    #[arg(long, default_value = "1")]
    export_interval: u64,
}

fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.num_ticks = ticks;
    }
    Ok(config)
}

fn parse_scenarios(name: &str) -> Result<Vec<ScenarioId>, SimError> {
    if name == "all" {
        Ok(ScenarioId::all())
    } else {
        Ok(vec![name.parse()?])
    }
}

fn run(args: &Args) -> Result<Vec<ScenarioResult>, SimError> {
    let config = load_config(args)?;
    let scenarios = parse_scenarios(&args.scenario)?;
    let runner = ScenarioRunner::new(config.clone());

    if let Some(path) = &args.export {
        let [scenario] = scenarios.as_slice() else {
            return Err(SimError::ExportNeedsSingleScenario);
        };
        let (result, export) = runner.run_with_export(*scenario, args.export_interval)?;
        export.write_to_file(path)?;
        info!("Exported {} frames to {}", export.frames.len(), path.display());
        return Ok(vec![result]);
    }

    let mut results = Vec::new();
    for scenario in scenarios {
        let result = runner.run(scenario)?;
        if !args.json {
            info!(
                "✓ {} (seed={}) moved {:.1} from start",
                scenario.name(),
                config.seed,
                net_displacement(&config, &result.summary)
            );
        }
        results.push(result);
    }
    Ok(results)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("Fly plume simulator v{}", env!("CARGO_PKG_VERSION"));
    }

    let results = match run(&args) {
        Ok(results) => results,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        let summary = serde_json::json!({
            "total": results.len(),
            "results": results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "summary": r.summary,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to encode results: {}", e);
                std::process::exit(1);
            }
        }
    }
}
