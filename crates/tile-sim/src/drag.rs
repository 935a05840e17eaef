//! Implementation for the `drag` subcommand.

use std::sync::Arc;

use tile_engine::{EngineConfig, Reconciler, TickOutcome, WindowOps};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::{
    desktop::SimDesktop,
    error::{Error, Result},
    report::TickRecord,
    scenario::{Scenario, Step},
};

/// Replay the scenario's steps, ticking the reconciler where the script says.
pub fn run(rt: &Runtime, scenario: &Scenario, config: EngineConfig) -> Result<Vec<TickRecord>> {
    if !scenario.steps.iter().any(|s| matches!(s, Step::Tick | Step::Ticks(_))) {
        return Err(Error::other("scenario has no Tick steps to replay"));
    }
    let desktop = Arc::new(SimDesktop::from_scenario(scenario)?);
    let mut reconciler = Reconciler::new(desktop.clone(), config);
    let mut records = Vec::new();

    for (i, step) in scenario.steps.iter().enumerate() {
        debug!(step = i, ?step, "replay");
        match step {
            Step::Press => desktop.set_pressed(true),
            Step::Release => desktop.set_pressed(false),
            Step::Focus(id) => desktop.focus_window(*id)?,
            Step::Mouse(id) => desktop.set_mouse(*id),
            Step::Move { id, frame } => desktop.move_window(*id, *frame),
            Step::Tick => records.push(tick(rt, &mut reconciler, &desktop, records.len())),
            Step::Ticks(n) => {
                for _ in 0..*n {
                    records.push(tick(rt, &mut reconciler, &desktop, records.len()));
                }
            }
        }
    }
    Ok(records)
}

/// Run one pass and capture the resulting frames.
fn tick(rt: &Runtime, reconciler: &mut Reconciler, desktop: &SimDesktop, n: usize) -> TickRecord {
    let outcome = rt.block_on(reconciler.tick());
    if let TickOutcome::Reconciled(report) = &outcome {
        info!(tick = n, dragged = %report.dragged, applied = report.applied.len(), "reconciled");
    }
    TickRecord::new(n, &outcome, desktop.frames())
}
