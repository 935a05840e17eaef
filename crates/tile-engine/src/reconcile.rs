//! One reconciliation pass: find the dragged window and re-tile the rest of
//! its screen around it.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tile_geom::{CoordinateSpace, Rect, Screen};
use tile_ids::{ScreenId, WindowId};
use tile_layout::{LayoutPlan, WindowSnapshot, plan_partition};
use tracing::{debug, trace, warn};

use crate::{
    apply::apply_frame,
    config::EngineConfig,
    drag::{DragState, resolve_dragged},
    ops::WindowOps,
};

/// In-progress flag shared by everything that mutates window frames.
///
/// Clones share the same flag. Entering returns a guard that clears the flag
/// when dropped; a second entry while a guard is alive fails.
#[derive(Clone, Debug, Default)]
pub struct ApplyGate {
    /// Set while a guard is alive.
    busy: Arc<AtomicBool>,
}

/// Holds an [`ApplyGate`] until dropped.
#[derive(Debug)]
pub struct ApplyGuard {
    /// Flag cleared on drop.
    busy: Arc<AtomicBool>,
}

impl ApplyGate {
    /// A fresh, idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` if it is already held.
    pub fn try_enter(&self) -> Option<ApplyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ApplyGuard {
                busy: self.busy.clone(),
            })
    }

    /// Whether a guard is currently alive.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ApplyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// What a reconciliation pass did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// The window treated as the drag target; never mutated.
    pub dragged: WindowId,
    /// Screen the pass was restricted to.
    pub screen: ScreenId,
    /// Plan computed for that screen, consumer space.
    pub plan: LayoutPlan,
    /// Windows that were out of place and had their frame applied.
    pub applied: Vec<WindowId>,
    /// Windows whose frame application failed; retried next tick.
    pub failed: Vec<WindowId>,
}

/// Outcome of [`Reconciler::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Another mutation sequence held the apply gate; nothing was read or changed.
    Busy,
    /// No drag target this tick; movement history was updated.
    NoDrag,
    /// A drag target was found but no screen could be resolved for it.
    NoScreen(WindowId),
    /// The active screen was re-tiled around the drag target.
    Reconciled(TickReport),
}

/// Drag-aware reconciler. Owns the cross-tick [`DragState`].
pub struct Reconciler {
    /// Window server seam.
    ops: Arc<dyn WindowOps>,
    /// Tuning.
    config: EngineConfig,
    /// Lock and movement history.
    state: DragState,
    /// Shared with layout commands.
    gate: ApplyGate,
}

impl Reconciler {
    /// Reconciler with its own apply gate.
    pub fn new(ops: Arc<dyn WindowOps>, config: EngineConfig) -> Self {
        Self::with_gate(ops, config, ApplyGate::new())
    }

    /// Reconciler sharing `gate` with other frame-mutating commands.
    pub fn with_gate(ops: Arc<dyn WindowOps>, config: EngineConfig, gate: ApplyGate) -> Self {
        Self {
            ops,
            config,
            state: DragState::new(),
            gate,
        }
    }

    /// Current drag state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The gate this reconciler enters on every tick.
    pub fn gate(&self) -> &ApplyGate {
        &self.gate
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clear the drag lock and movement history.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Run one reconciliation pass.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(_guard) = self.gate.try_enter() else {
            trace!("tick skipped: apply in progress");
            return TickOutcome::Busy;
        };
        let ops = self.ops.clone();

        let screens = ops.screens();
        let space = CoordinateSpace::from_screens(&screens);
        if space.desktop_top().is_none() {
            debug!("no screens known; treating frames as unconverted");
        }
        let snapshots = active_snapshots(ops.as_ref(), &space);
        let current: HashMap<WindowId, Rect> = snapshots.iter().map(|w| (w.id, w.frame)).collect();

        let pressed = ops.is_primary_button_pressed();
        let focused = ops.focused_window().map(|w| w.id);
        let Some(dragged) = resolve_dragged(
            &mut self.state,
            &current,
            pressed,
            focused,
            self.config.movement_threshold,
        ) else {
            self.state.previous = current;
            return TickOutcome::NoDrag;
        };

        let Some(screen) = active_screen(ops.as_ref(), &screens, &snapshots, dragged) else {
            warn!(id = %dragged, "no screen for drag target");
            self.state.previous = current;
            return TickOutcome::NoScreen(dragged);
        };

        let plan = plan_partition(&snapshots, &screen, self.config.min_gap_render);
        trace!(
            dragged = %dragged,
            screen = %screen.id,
            assigned = plan.assignments.len(),
            "planned"
        );

        let mut applied = Vec::new();
        let mut failed = Vec::new();
        for (id, target) in &plan.assignments {
            if *id == dragged {
                continue;
            }
            let Some(cur) = current.get(id) else { continue };
            if cur.approx_eq(&target.rect, self.config.frame_tolerance) {
                continue;
            }
            let producer = space.to_producer(target.rect);
            match apply_frame(ops.as_ref(), *id, producer, self.config.settle_delay()).await {
                Ok(()) => applied.push(*id),
                Err(e) => {
                    warn!(id = %id, error = %e, "apply_frame failed; retrying next tick");
                    failed.push(*id);
                }
            }
        }

        self.state.previous = current
            .iter()
            .map(|(id, cur)| {
                let rect = match plan.assignments.get(id) {
                    Some(t) if *id != dragged => t.rect,
                    _ => *cur,
                };
                (*id, rect)
            })
            .collect();

        if !ops.is_primary_button_pressed() {
            debug!(id = %dragged, "button released; drag lock cleared");
            self.state.locked = None;
        }

        TickOutcome::Reconciled(TickReport {
            dragged,
            screen: screen.id,
            plan,
            applied,
            failed,
        })
    }
}

/// Windows on the active space with non-empty frames, converted to consumer
/// space.
fn active_snapshots(ops: &dyn WindowOps, space: &CoordinateSpace) -> Vec<WindowSnapshot> {
    ops.list_windows()
        .into_iter()
        .filter(|w| ops.is_on_active_space(w.id))
        .filter_map(|mut w| {
            let frame = w.frame.standardized();
            if frame.is_empty() {
                return None;
            }
            w.frame = space.to_consumer(frame);
            Some(w)
        })
        .collect()
}

/// The dragged window's screen, else the screen under the mouse, else the
/// first snapshot's screen.
fn active_screen(
    ops: &dyn WindowOps,
    screens: &[Screen],
    snapshots: &[WindowSnapshot],
    dragged: WindowId,
) -> Option<Screen> {
    let by_id = |id: ScreenId| screens.iter().find(|s| s.id == id).copied();
    snapshots
        .iter()
        .find(|w| w.id == dragged)
        .and_then(|w| by_id(w.screen))
        .or_else(|| ops.screen_under_mouse())
        .or_else(|| snapshots.first().and_then(|w| by_id(w.screen)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MockWindowOps;

    fn setup() -> (Arc<MockWindowOps>, Reconciler) {
        let ops = Arc::new(MockWindowOps::new());
        ops.set_screens(vec![Screen::full(
            ScreenId::new(1),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        )]);
        ops.set_windows(vec![
            WindowSnapshot::new(WindowId::new(1), Rect::new(0.0, 0.0, 500.0, 1000.0), ScreenId::new(1)),
            WindowSnapshot::new(WindowId::new(2), Rect::new(500.0, 0.0, 500.0, 1000.0), ScreenId::new(1)),
        ]);
        let r = Reconciler::new(ops.clone(), EngineConfig::default());
        (ops, r)
    }

    #[test]
    fn gate_is_exclusive_and_released_on_drop() {
        let gate = ApplyGate::new();
        let g = gate.try_enter();
        assert!(g.is_some());
        assert!(gate.clone().try_enter().is_none());
        drop(g);
        assert!(!gate.is_busy());
        assert!(gate.try_enter().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn busy_gate_leaves_state_untouched() {
        let (ops, mut r) = setup();
        ops.set_pressed(true);
        let _held = r.gate().try_enter();
        assert_eq!(r.tick().await, TickOutcome::Busy);
        assert_eq!(r.state(), &DragState::new());
        assert!(ops.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_press_records_history_only() {
        let (ops, mut r) = setup();
        assert_eq!(r.tick().await, TickOutcome::NoDrag);
        assert_eq!(r.state().previous.len(), 2);
        assert!(ops.mutations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn off_space_and_empty_windows_are_ignored() {
        let (ops, mut r) = setup();
        ops.set_off_space(WindowId::new(2), true);
        r.tick().await;
        assert_eq!(r.state().previous.len(), 1);
        ops.set_off_space(WindowId::new(2), false);
        ops.set_frame(WindowId::new(2), Rect::new(500.0, 0.0, 0.0, 1000.0));
        r.tick().await;
        assert!(!r.state().previous.contains_key(&WindowId::new(2)));
    }
}
