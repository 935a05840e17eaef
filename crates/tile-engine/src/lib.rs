//! Tile Engine
//!
//! The engine drives window frames through the [`WindowOps`] seam:
//! - re-tiles a screen around the window the user is dragging ([`Reconciler`])
//! - polls that reconciliation on a fixed cadence ([`Poller`])
//! - runs round-robin primary/stack layouts ([`LayoutCommands`])
//! - places and nudges the focused window ([`TilingCommands`])
//!
//! Every frame-mutating path enters the same [`ApplyGate`], so a layout command
//! and a reconciliation tick never interleave their requests. [`Tiler`] wires
//! all of them together around one gate.
use std::sync::Arc;

mod apply;
mod config;
mod drag;
mod error;
mod layouts;
mod ops;
mod poller;
mod reconcile;
mod tiling;
mod windows;

use tile_layout::Side;
use tokio::sync::Mutex;
use tracing::debug;

pub use apply::{animate_frame, apply_frame, focus_and_move, measure_width, move_frame};
pub use config::EngineConfig;
pub use drag::{DragState, resolve_dragged};
pub use error::{Error, Result};
pub use layouts::{LayoutCommands, LayoutOutcome};
#[cfg(any(test, feature = "test-utils"))]
pub use ops::{MockCall, MockWindowOps};
pub use ops::WindowOps;
pub use poller::{Poller, ReconcileEvent};
pub use reconcile::{ApplyGate, ApplyGuard, Reconciler, TickOutcome, TickReport};
pub use tiling::TilingCommands;
pub use windows::{WindowOrder, frames_changed, merge_order};

/// Default tuning values.
pub mod defaults {
    pub use crate::config::{
        ANIMATION_FPS, ANIMATION_MS, CENTER_PADDING, CHANGE_TOLERANCE, FRAME_TOLERANCE,
        MIN_GAP_RENDER, MOVEMENT_THRESHOLD, NUDGE_STEP, POLL_MS, REMEASURE_ATTEMPTS, SETTLE_MS,
    };
}

/// Reconciler, layouts and single-window commands sharing one apply gate.
pub struct Tiler {
    /// Drag reconciliation driver.
    poller: Poller,
    /// Round-robin layouts; serialized so the planner cursor advances once per call.
    layouts: Mutex<LayoutCommands>,
    /// Focused-window commands.
    tiling: TilingCommands,
}

impl Tiler {
    /// Build every component over `ops` with a shared gate. Polling is idle
    /// until [`Poller::start`].
    pub fn new(ops: Arc<dyn WindowOps>, config: EngineConfig) -> Self {
        let gate = ApplyGate::new();
        let reconciler = Reconciler::with_gate(ops.clone(), config.clone(), gate.clone());
        Self {
            poller: Poller::new(reconciler),
            layouts: Mutex::new(LayoutCommands::new(ops.clone(), config.clone(), gate.clone())),
            tiling: TilingCommands::new(ops, config, gate),
        }
    }

    /// The reconciliation poller.
    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Focused-window commands.
    pub fn tiling(&self) -> &TilingCommands {
        &self.tiling
    }

    /// Primary-only layout over the current windows. Drag history is reset
    /// afterwards so the layout's own moves are not read as a drag.
    pub async fn primary_only(&self) -> Result<Option<LayoutOutcome>> {
        let mut layouts = self.layouts.lock().await;
        let windows = layouts.ordered_windows();
        let out = layouts.primary_only(&windows).await;
        drop(layouts);
        self.poller.reset().await;
        debug!(ok = out.is_ok(), "primary_only finished");
        out
    }

    /// Primary/stack layout over the current windows. Drag history is reset
    /// afterwards.
    pub async fn primary_stacked(&self, side: Side) -> Result<Option<LayoutOutcome>> {
        let mut layouts = self.layouts.lock().await;
        let windows = layouts.ordered_windows();
        let out = layouts.primary_stacked(&windows, side).await;
        drop(layouts);
        self.poller.reset().await;
        debug!(ok = out.is_ok(), ?side, "primary_stacked finished");
        out
    }
}
