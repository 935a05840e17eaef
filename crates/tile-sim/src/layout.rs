//! Implementation for the `layout` and `window` subcommands.

use std::sync::Arc;

use tile_engine::{EngineConfig, Tiler, WindowOps};
use tile_geom::{CoordinateSpace, Nudge};
use tile_layout::Side;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::{
    cli::{LayoutKind, WindowAction},
    desktop::SimDesktop,
    error::Result,
    report::{LayoutReport, WindowReport},
    scenario::Scenario,
};

/// Apply a whole-screen layout `repeat` times.
pub fn run_layout(
    rt: &Runtime,
    scenario: &Scenario,
    config: EngineConfig,
    kind: LayoutKind,
    repeat: u32,
) -> Result<LayoutReport> {
    let desktop = Arc::new(SimDesktop::from_scenario(scenario)?);
    let tiler = Tiler::new(desktop.clone(), config);
    let mut primaries = Vec::new();
    for round in 0..repeat {
        let outcome = rt.block_on(async {
            match kind {
                LayoutKind::PrimaryOnly => tiler.primary_only().await,
                LayoutKind::StackedLeft => tiler.primary_stacked(Side::Left).await,
                LayoutKind::StackedRight => tiler.primary_stacked(Side::Right).await,
            }
        })?;
        match outcome {
            Some(out) => {
                info!(round, primary = %out.primary, windows = out.frames.len(), "layout applied");
                primaries.push(out.primary);
            }
            None => {
                warn!(round, "no windows to lay out");
                break;
            }
        }
    }
    Ok(LayoutReport {
        primaries,
        frames: desktop.frames(),
        labels: desktop.labels(),
    })
}

/// Run one single-window command on the focused window.
pub fn run_window(
    rt: &Runtime,
    scenario: &Scenario,
    config: EngineConfig,
    action: WindowAction,
) -> Result<WindowReport> {
    let desktop = Arc::new(SimDesktop::from_scenario(scenario)?);
    let tiler = Tiler::new(desktop.clone(), config);
    let tiling = tiler.tiling();
    let requested = rt.block_on(async {
        match action {
            WindowAction::LeftHalf => tiling.left_half().await,
            WindowAction::RightHalf => tiling.right_half().await,
            WindowAction::Center => tiling.center().await,
            WindowAction::Fullscreen => tiling.fullscreen().await,
            WindowAction::TopUp => tiling.nudge(Nudge::TopUp).await,
            WindowAction::TopDown => tiling.nudge(Nudge::TopDown).await,
            WindowAction::BottomUp => tiling.nudge(Nudge::BottomUp).await,
            WindowAction::BottomDown => tiling.nudge(Nudge::BottomDown).await,
        }
    })?;
    let id = desktop.focused_window().map(|w| w.id);
    let space = CoordinateSpace::from_screens(&desktop.screens());
    let frame = id
        .and_then(|id| desktop.window_frame(id))
        .map(|f| space.to_consumer(f));
    Ok(WindowReport {
        id,
        requested,
        frame,
    })
}
