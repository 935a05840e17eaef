//! Serializable results, rendered as RON on stdout.

use std::collections::BTreeMap;

use ron::ser::{PrettyConfig, to_string_pretty};
use serde::Serialize;
use tile_engine::TickOutcome;
use tile_geom::Rect;
use tile_ids::{ScreenId, WindowId};

use crate::error::Result;

/// Partition of one screen.
#[derive(Debug, Serialize)]
pub struct ScreenPartition {
    /// Screen partitioned.
    pub screen: ScreenId,
    /// Owner region per window.
    pub owners: BTreeMap<WindowId, Rect>,
    /// Unowned regions worth drawing.
    pub gaps: Vec<Rect>,
}

/// Result of one or more layout invocations.
#[derive(Debug, Serialize)]
pub struct LayoutReport {
    /// Primary chosen by each invocation, in order.
    pub primaries: Vec<WindowId>,
    /// Final frames, row-up.
    pub frames: BTreeMap<WindowId, Rect>,
    /// Window labels.
    pub labels: BTreeMap<WindowId, String>,
}

/// Result of a single-window command.
#[derive(Debug, Serialize)]
pub struct WindowReport {
    /// Window the command acted on.
    pub id: Option<WindowId>,
    /// Frame the command requested, row-up.
    pub requested: Rect,
    /// Frame the window ended up with, row-up.
    pub frame: Option<Rect>,
}

/// Coarse tick outcome for output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TickKind {
    /// The apply gate was held.
    Busy,
    /// Nothing was dragged.
    NoDrag,
    /// A drag target had no screen.
    NoScreen,
    /// The screen was re-tiled.
    Reconciled,
}

/// One reconciliation pass in a drag replay.
#[derive(Debug, Serialize)]
pub struct TickRecord {
    /// Tick number, from zero.
    pub tick: usize,
    /// What the pass did.
    pub outcome: TickKind,
    /// Drag target, if any.
    pub dragged: Option<WindowId>,
    /// Screen re-tiled, if any.
    pub screen: Option<ScreenId>,
    /// Windows whose frame was applied.
    pub applied: Vec<WindowId>,
    /// Windows whose frame application failed.
    pub failed: Vec<WindowId>,
    /// Gap regions of the plan.
    pub gaps: Vec<Rect>,
    /// Frames after the pass, row-up.
    pub frames: BTreeMap<WindowId, Rect>,
}

impl TickRecord {
    /// Summarize an outcome together with the frames after the pass.
    pub fn new(tick: usize, outcome: &TickOutcome, frames: BTreeMap<WindowId, Rect>) -> Self {
        let mut record = Self {
            tick,
            outcome: TickKind::NoDrag,
            dragged: None,
            screen: None,
            applied: Vec::new(),
            failed: Vec::new(),
            gaps: Vec::new(),
            frames,
        };
        match outcome {
            TickOutcome::Busy => record.outcome = TickKind::Busy,
            TickOutcome::NoDrag => {}
            TickOutcome::NoScreen(id) => {
                record.outcome = TickKind::NoScreen;
                record.dragged = Some(*id);
            }
            TickOutcome::Reconciled(report) => {
                record.outcome = TickKind::Reconciled;
                record.dragged = Some(report.dragged);
                record.screen = Some(report.screen);
                record.applied.clone_from(&report.applied);
                record.failed.clone_from(&report.failed);
                record.gaps.clone_from(&report.plan.gaps);
            }
        }
        record
    }
}

/// Render any report as pretty RON.
pub fn render<T: Serialize>(value: &T) -> Result<String> {
    let config = PrettyConfig::new().struct_names(false);
    Ok(to_string_pretty(value, config)?)
}
