//! Command-line interface definitions for tile-sim.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use logging::LogArgs;

/// Command-line interface for the `tile-sim` binary.
#[derive(Parser, Debug)]
#[command(
    name = "tile-sim",
    about = "Run tiler layouts and drag reconciliation against scripted desktops",
    version
)]
pub struct Cli {
    /// Logging controls shared across tiler binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Optional path to an engine configuration file (RON).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Which simulation to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level simulator commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the partition the engine infers for every screen.
    Partition(ScenarioArgs),
    /// Run a whole-screen layout command.
    Layout(LayoutArgs),
    /// Run a single-window command on the focused window.
    Window(WindowArgs),
    /// Replay the scenario's drag steps through the reconciler.
    Drag(DragArgs),
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Scenario file (RON).
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,
}

/// Whole-screen layouts.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Next window takes the whole screen.
    PrimaryOnly,
    /// Primary on the left, stack on the right.
    StackedLeft,
    /// Primary on the right, stack on the left.
    StackedRight,
}

/// Arguments for the `layout` subcommand.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Scenario to load.
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Layout to apply.
    #[arg(long, value_enum, default_value_t = LayoutKind::StackedLeft)]
    pub kind: LayoutKind,

    /// Apply the layout this many times, cycling the primary window.
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub repeat: u32,
}

/// Single-window commands.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// Left half of the screen.
    LeftHalf,
    /// Right half of the screen.
    RightHalf,
    /// Centered with padding.
    Center,
    /// Whole visible frame.
    Fullscreen,
    /// Raise the top edge.
    TopUp,
    /// Lower the top edge.
    TopDown,
    /// Raise the bottom edge.
    BottomUp,
    /// Lower the bottom edge.
    BottomDown,
}

/// Arguments for the `window` subcommand.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Scenario to load; it must name a focused window.
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Command to run.
    #[arg(value_enum, value_name = "ACTION")]
    pub action: WindowAction,

    /// Glide the window into place instead of jumping.
    #[arg(long)]
    pub animate: bool,
}

/// Arguments for the `drag` subcommand.
#[derive(Args, Debug, Clone)]
pub struct DragArgs {
    /// Scenario to replay.
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Override the settle delay between frame requests.
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub settle: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layout_flags() {
        let cli = Cli::try_parse_from([
            "tile-sim",
            "--debug",
            "layout",
            "desk.ron",
            "--kind",
            "stacked-right",
            "--repeat",
            "3",
        ])
        .unwrap();
        assert!(cli.log.debug);
        let Commands::Layout(args) = cli.command else {
            panic!("expected layout");
        };
        assert_eq!(args.kind, LayoutKind::StackedRight);
        assert_eq!(args.repeat, 3);
        assert_eq!(args.scenario.scenario, PathBuf::from("desk.ron"));
    }

    #[test]
    fn parses_drag_settle_duration() {
        let cli = Cli::try_parse_from(["tile-sim", "drag", "d.ron", "--settle", "5ms"]).unwrap();
        let Commands::Drag(args) = cli.command else {
            panic!("expected drag");
        };
        assert_eq!(args.settle, Some(Duration::from_millis(5)));
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tile-sim", "window", "d.ron", "center", "--config", "c.ron"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.ron")));
        let Commands::Window(args) = cli.command else {
            panic!("expected window");
        };
        assert!(!args.animate);
    }

    #[test]
    fn window_animate_flag() {
        let cli = Cli::try_parse_from(["tile-sim", "window", "d.ron", "left-half", "--animate"])
            .unwrap();
        let Commands::Window(args) = cli.command else {
            panic!("expected window");
        };
        assert_eq!(args.action, WindowAction::LeftHalf);
        assert!(args.animate);
    }
}
