//! Whole-screen layout commands: primary-only and primary/stack.
//!
//! Frame math comes from [`tile_layout::planner`]; this module sequences the
//! focus and frame requests against [`WindowOps`] with the settle delay after
//! each one.

use std::sync::Arc;

use tile_geom::{CoordinateSpace, Rect, Screen, Size, approx_eq};
use tile_ids::WindowId;
use tile_layout::{
    LayoutPlanner, Side, WindowSnapshot,
    planner::{full_frame, primary_frame, right_anchor, stack_frames, stack_order},
};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    apply::{focus_and_move, measure_width, move_frame},
    config::EngineConfig,
    ops::WindowOps,
    reconcile::ApplyGate,
    windows::WindowOrder,
};

/// Result of a layout command.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOutcome {
    /// The window chosen as primary this round.
    pub primary: WindowId,
    /// Requested frames, consumer space, primary first.
    pub frames: Vec<(WindowId, Rect)>,
}

/// Round-robin layout commands over a shared [`WindowOps`].
pub struct LayoutCommands {
    /// Window server seam.
    ops: Arc<dyn WindowOps>,
    /// Tuning.
    config: EngineConfig,
    /// Round-robin cursor.
    planner: LayoutPlanner,
    /// Stable window order across enumerations.
    order: WindowOrder,
    /// Shared with the reconciler.
    gate: ApplyGate,
}

impl LayoutCommands {
    /// Layout commands sharing `gate` with the reconciler.
    pub fn new(ops: Arc<dyn WindowOps>, config: EngineConfig, gate: ApplyGate) -> Self {
        Self {
            ops,
            config,
            planner: LayoutPlanner::new(),
            order: WindowOrder::new(),
            gate,
        }
    }

    /// The round-robin planner state.
    pub fn planner(&self) -> &LayoutPlanner {
        &self.planner
    }

    /// Enumerate active-space windows with non-empty frames, merged into the
    /// remembered order.
    pub fn ordered_windows(&mut self) -> Vec<WindowSnapshot> {
        let ops = self.ops.as_ref();
        let latest: Vec<WindowSnapshot> = ops
            .list_windows()
            .into_iter()
            .filter(|w| ops.is_on_active_space(w.id) && !w.frame.is_empty())
            .collect();
        self.order.refresh(&latest).to_vec()
    }

    /// Give the next round-robin window the whole visible frame of the screen
    /// under the mouse. Returns `None` when `windows` is empty.
    pub async fn primary_only(
        &mut self,
        windows: &[WindowSnapshot],
    ) -> Result<Option<LayoutOutcome>> {
        let Some(_guard) = self.gate.try_enter() else {
            return Err(Error::Busy);
        };
        let (screen, space) = self.target_screen()?;
        let Some(primary) = self
            .planner
            .advance(windows.len())
            .and_then(|i| windows.get(i))
        else {
            return Ok(None);
        };

        let frame = full_frame(screen.visible_frame);
        info!(id = %primary.id, screen = %screen.id, "primary only");
        focus_and_move(
            self.ops.as_ref(),
            primary.id,
            space.to_producer(frame),
            self.config.settle_delay(),
        )
        .await?;
        Ok(Some(LayoutOutcome {
            primary: primary.id,
            frames: vec![(primary.id, frame)],
        }))
    }

    /// Put the next round-robin window on `side` of the screen under the
    /// mouse and stack the rest in the other half.
    ///
    /// The primary is re-read after it settles: a window that refused the
    /// requested width keeps its applied width, and on the right side it is
    /// re-anchored to the screen edge. The stack fills whatever width remains.
    pub async fn primary_stacked(
        &mut self,
        windows: &[WindowSnapshot],
        side: Side,
    ) -> Result<Option<LayoutOutcome>> {
        let Some(_guard) = self.gate.try_enter() else {
            return Err(Error::Busy);
        };
        let (screen, space) = self.target_screen()?;
        let count = windows.len();
        let Some(index) = self.planner.advance(count) else {
            return Ok(None);
        };
        let Some(primary) = windows.get(index) else {
            return Ok(None);
        };

        let ops = self.ops.as_ref();
        let settle = self.config.settle_delay();
        let visible = screen.visible_frame;
        let requested = primary_frame(visible, count, side);
        info!(id = %primary.id, screen = %screen.id, ?side, count, "primary stacked");
        focus_and_move(ops, primary.id, space.to_producer(requested), settle).await?;

        let mut applied = requested;
        if count > 1 {
            let width = measure_width(
                ops,
                primary.id,
                requested.w,
                self.config.remeasure_attempts,
                settle,
            )
            .await;
            if !approx_eq(width, requested.w, self.config.frame_tolerance) {
                debug!(id = %primary.id, requested = requested.w, applied = width, "primary width differs");
                applied = match side {
                    Side::Left => requested.with_size(Size::new(width, requested.h)),
                    Side::Right => {
                        let anchored = right_anchor(visible, width);
                        move_frame(ops, primary.id, space.to_producer(anchored), settle).await?;
                        anchored
                    }
                };
            }
        }

        let mut frames = vec![(primary.id, applied)];
        let order = stack_order(count, index);
        let slots = stack_frames(visible, applied, side, order.len());
        for (i, slot) in order.into_iter().zip(slots) {
            let Some(w) = windows.get(i) else { continue };
            if let Err(e) = focus_and_move(ops, w.id, space.to_producer(slot), settle).await {
                warn!(id = %w.id, error = %e, "stack move failed");
                continue;
            }
            frames.push((w.id, slot));
        }

        ops.focus_window(primary.id)?;
        sleep(settle).await;
        Ok(Some(LayoutOutcome {
            primary: primary.id,
            frames,
        }))
    }

    /// The screen under the mouse, else the first screen, plus the coordinate
    /// space for the current screen set.
    fn target_screen(&self) -> Result<(Screen, CoordinateSpace)> {
        let screens = self.ops.screens();
        let space = CoordinateSpace::from_screens(&screens);
        let screen = self
            .ops
            .screen_under_mouse()
            .or_else(|| screens.first().copied())
            .ok_or(Error::NoScreen)?;
        Ok((screen, space))
    }
}

#[cfg(test)]
mod tests {
    use tile_ids::ScreenId;

    use super::*;
    use crate::ops::{MockCall, MockWindowOps};

    fn desk(n: u32) -> (Arc<MockWindowOps>, LayoutCommands) {
        let ops = Arc::new(MockWindowOps::new());
        ops.set_screens(vec![Screen::full(
            ScreenId::new(1),
            Rect::new(0.0, 0.0, 1200.0, 800.0),
        )]);
        ops.set_windows(
            (1..=n)
                .map(|i| {
                    WindowSnapshot::new(
                        WindowId::new(i),
                        Rect::new(10.0 * f64::from(i), 10.0, 300.0, 300.0),
                        ScreenId::new(1),
                    )
                })
                .collect(),
        );
        let cmds = LayoutCommands::new(ops.clone(), EngineConfig::default(), ApplyGate::new());
        (ops, cmds)
    }

    #[tokio::test(start_paused = true)]
    async fn primary_only_cycles_windows() {
        let (ops, mut cmds) = desk(2);
        let wins = cmds.ordered_windows();
        let first = cmds.primary_only(&wins).await.unwrap().unwrap();
        assert_eq!(first.primary, WindowId::new(1));
        assert_eq!(ops.frame(WindowId::new(1)), Some(Rect::new(0.0, 0.0, 1200.0, 800.0)));
        let second = cmds.primary_only(&wins).await.unwrap().unwrap();
        assert_eq!(second.primary, WindowId::new(2));
        assert_eq!(cmds.planner().last_starting_primary(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_window_list_is_a_no_op() {
        let (ops, mut cmds) = desk(0);
        assert_eq!(cmds.primary_stacked(&[], Side::Left).await.unwrap(), None);
        assert!(ops.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stacked_left_focuses_each_and_refocuses_primary() {
        let (ops, mut cmds) = desk(3);
        let wins = cmds.ordered_windows();
        cmds.primary_stacked(&wins, Side::Left).await.unwrap();
        let focuses: Vec<WindowId> = ops
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Focus(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(
            focuses,
            vec![WindowId::new(1), WindowId::new(2), WindowId::new(3), WindowId::new(1)]
        );
        // Producer space: the bottom-most consumer slice is the lower half.
        assert_eq!(ops.frame(WindowId::new(1)), Some(Rect::new(0.0, 0.0, 600.0, 800.0)));
        assert_eq!(ops.frame(WindowId::new(2)), Some(Rect::new(600.0, 400.0, 600.0, 400.0)));
        assert_eq!(ops.frame(WindowId::new(3)), Some(Rect::new(600.0, 0.0, 600.0, 400.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn stacked_right_reanchors_wide_primary() {
        let (ops, mut cmds) = desk(2);
        ops.set_min_width(WindowId::new(1), 700.0);
        let wins = cmds.ordered_windows();
        let out = cmds.primary_stacked(&wins, Side::Right).await.unwrap().unwrap();
        assert_eq!(ops.frame(WindowId::new(1)), Some(Rect::new(500.0, 0.0, 700.0, 800.0)));
        assert_eq!(ops.frame(WindowId::new(2)), Some(Rect::new(0.0, 0.0, 500.0, 800.0)));
        assert_eq!(out.frames[0], (WindowId::new(1), Rect::new(500.0, 0.0, 700.0, 800.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn busy_gate_rejects_command() {
        let (ops, mut cmds) = desk(1);
        let _held = cmds.gate.clone().try_enter();
        let wins = cmds.ordered_windows();
        assert!(matches!(cmds.primary_only(&wins).await, Err(Error::Busy)));
        assert!(ops.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_screen_is_an_error() {
        let ops = Arc::new(MockWindowOps::new());
        let mut cmds = LayoutCommands::new(ops, EngineConfig::default(), ApplyGate::new());
        assert!(matches!(cmds.primary_only(&[]).await, Err(Error::NoScreen)));
    }
}
