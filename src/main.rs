//! Anthill - headless colony runner
//!
//! Generates a world, runs it for a number of ticks and reports colony
//! statistics as text or JSON.

use anthill::core::config::SimulationConfig;
use anthill::core::error::Result;
use anthill::ecs::world::World;
use anthill::llm::oracle::LlmOracle;
use anthill::simulation::decision::{DecisionPolicy, FallbackPolicy, OraclePolicy, PolicyStats};
use anthill::simulation::stats::{AntSnapshot, WorldStats};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Headless ant colony simulation
#[derive(Parser, Debug)]
#[command(name = "anthill")]
#[command(about = "Run an ant colony simulation and report colony statistics")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Ask the LLM oracle for decisions (configured via LLM_API_URL,
    /// LLM_MODEL and LLM_API_KEY); falls back to the rule table if unset
    #[arg(long)]
    oracle: bool,

    /// Log statistics every N ticks (0 disables)
    #[arg(long, default_value_t = 600)]
    report_every: u64,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Include per-ant snapshots in the JSON report
    #[arg(long, requires = "json")]
    ants: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    policy: &'static str,
    decisions: PolicyStats,
    stats: WorldStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    ants: Option<Vec<AntSnapshot>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anthill=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let mut policy = build_policy(args.oracle, &config);
    let mut world = match args.seed {
        Some(seed) => World::with_seed(config, seed)?,
        None => World::new(config)?,
    };

    tracing::info!(ticks = args.ticks, policy = policy.name(), "Anthill starting...");

    for _ in 0..args.ticks {
        world.tick(policy.as_mut());

        if args.report_every > 0 && world.frame_count % args.report_every == 0 {
            tracing::info!("{}", world.statistics());
        }

        if world.population() == 0 {
            tracing::warn!(frame = world.frame_count, "Colony died out");
            break;
        }
    }

    let stats = world.statistics();
    if args.json {
        let report = RunReport {
            policy: policy.name(),
            decisions: policy.stats(),
            stats,
            ants: args.ants.then(|| world.ant_snapshots()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", stats);
    }

    Ok(())
}

fn build_policy(use_oracle: bool, config: &SimulationConfig) -> Box<dyn DecisionPolicy> {
    if use_oracle {
        match LlmOracle::from_env(config.oracle_timeout()) {
            Ok(oracle) => return Box::new(OraclePolicy::new(Box::new(oracle), config)),
            Err(e) => tracing::warn!(error = %e, "Oracle unavailable, using rule-based decisions"),
        }
    }
    Box::new(FallbackPolicy::from_config(config))
}
