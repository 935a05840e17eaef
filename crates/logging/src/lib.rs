#![warn(missing_docs)]

//! Shared logging helpers and CLI argument definitions for the tiler workspace.
//!
//! Binaries flatten [`LogArgs`] into their CLI, turn it into a filter
//! directive with [`compute_spec`], and install an [`EnvFilter`] built by
//! [`env_filter_from_spec`]. Level flags only raise verbosity for our own
//! crates, so dependencies stay at their defaults.

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "tile_engine=trace,tile_layout=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// The filter directive these flags select. See [`compute_spec`].
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        // Core crates
        "tile_ids",
        "tile_geom",
        "tile_layout",
        "tile_engine",
        // Apps
        "tile_sim",
        // Utilities
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{t}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| level_spec_for("info"))
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn level_spec_covers_every_crate() {
        let spec = level_spec_for("DEBUG");
        assert_eq!(spec.split(',').count(), our_crates().len());
        assert!(spec.contains("tile_engine=debug"));
        assert!(!spec.contains("DEBUG"));
    }

    #[test]
    fn explicit_filter_wins() {
        let spec = compute_spec(true, false, Some("warn"), Some("tile_layout=trace"));
        assert_eq!(spec, "tile_layout=trace");
    }

    #[test]
    fn flags_beat_level() {
        assert_eq!(compute_spec(false, true, Some("warn"), None), level_spec_for("debug"));
        assert_eq!(compute_spec(false, false, Some("warn"), None), level_spec_for("warn"));
    }

    #[test]
    fn cli_flags_parse_and_conflict() {
        let cli = Cli::try_parse_from(["t", "--trace"]).unwrap();
        assert_eq!(cli.log.spec(), level_spec_for("trace"));
        assert!(Cli::try_parse_from(["t", "--trace", "--debug"]).is_err());
        let cli = Cli::try_parse_from(["t", "--log-filter", "tile_engine=warn"]).unwrap();
        assert_eq!(cli.log.spec(), "tile_engine=warn");
    }
}
