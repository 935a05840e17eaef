#![warn(missing_docs)]

//! Entry point for the `tile-sim` binary.

mod cli;
mod desktop;
mod drag;
mod error;
mod layout;
mod partition;
mod report;
mod scenario;

use std::process;

use clap::Parser;
use tile_engine::EngineConfig;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{Cli, Commands},
    error::Result,
    scenario::Scenario,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli {
        log,
        config,
        command,
    } = Cli::parse();
    let log_spec = log.spec();
    let env_filter = logging::env_filter_from_spec(&log_spec);
    registry()
        .with(env_filter)
        .with(fmt::layer().without_time())
        .try_init()
        .ok();
    debug!(spec = %log_spec, "logging installed");

    let mut engine_config = match &config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let output = match command {
        Commands::Partition(args) => {
            let scenario = Scenario::load(&args.scenario)?;
            report::render(&partition::run(&scenario, &engine_config)?)?
        }
        Commands::Layout(args) => {
            let scenario = Scenario::load(&args.scenario.scenario)?;
            let rt = runtime()?;
            let out = layout::run_layout(&rt, &scenario, engine_config, args.kind, args.repeat)?;
            report::render(&out)?
        }
        Commands::Window(args) => {
            let scenario = Scenario::load(&args.scenario.scenario)?;
            engine_config.animate |= args.animate;
            let rt = runtime()?;
            report::render(&layout::run_window(&rt, &scenario, engine_config, args.action)?)?
        }
        Commands::Drag(args) => {
            let scenario = Scenario::load(&args.scenario.scenario)?;
            if let Some(settle) = args.settle {
                engine_config.settle_ms = u64::try_from(settle.as_millis()).unwrap_or(u64::MAX);
            }
            let rt = runtime()?;
            report::render(&drag::run(&rt, &scenario, engine_config)?)?
        }
    };
    println!("{output}");
    Ok(())
}

/// Single-threaded runtime with timers for the settle delays.
fn runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_time().build()?)
}
