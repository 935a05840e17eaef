//! Single-window commands on the focused window.

use std::sync::Arc;

use tile_geom::{CoordinateSpace, Nudge, Rect, Screen, approx_eq, screen_for_frame};
use tile_ids::WindowId;
use tile_layout::{
    Side,
    planner::{center_frame, full_frame, half_frame, right_anchor},
};
use tracing::{debug, info};

use crate::{
    Error, Result,
    apply::{animate_frame, measure_width, move_frame},
    config::EngineConfig,
    ops::WindowOps,
    reconcile::ApplyGate,
};

/// The focused window and where it lives.
struct Target {
    /// Focused window.
    id: WindowId,
    /// Its frame, producer space.
    frame: Rect,
    /// Its screen.
    screen: Screen,
    /// Conversion for the current screen set.
    space: CoordinateSpace,
}

/// Tiling commands that act on the focused window only.
pub struct TilingCommands {
    /// Window server seam.
    ops: Arc<dyn WindowOps>,
    /// Tuning.
    config: EngineConfig,
    /// Shared with the reconciler.
    gate: ApplyGate,
}

impl TilingCommands {
    /// Tiling commands sharing `gate` with the reconciler.
    pub fn new(ops: Arc<dyn WindowOps>, config: EngineConfig, gate: ApplyGate) -> Self {
        Self { ops, config, gate }
    }

    /// Left half of the focused window's screen.
    pub async fn left_half(&self) -> Result<Rect> {
        self.place(|v| half_frame(v, Side::Left)).await
    }

    /// Right half of the focused window's screen, re-anchored to the right
    /// edge if the window refused the requested width.
    pub async fn right_half(&self) -> Result<Rect> {
        let Some(_guard) = self.gate.try_enter() else {
            return Err(Error::Busy);
        };
        let t = self.focused_target()?;
        let settle = self.config.settle_delay();
        let visible = t.screen.visible_frame;
        let requested = half_frame(visible, Side::Right);
        self.glide(t.id, t.space.to_producer(requested)).await?;

        let width = measure_width(
            self.ops.as_ref(),
            t.id,
            requested.w,
            self.config.remeasure_attempts,
            settle,
        )
        .await;
        if approx_eq(width, requested.w, self.config.frame_tolerance) {
            return Ok(requested);
        }
        let anchored = right_anchor(visible, width);
        debug!(id = %t.id, width, "right half re-anchored");
        move_frame(self.ops.as_ref(), t.id, t.space.to_producer(anchored), settle).await?;
        Ok(anchored)
    }

    /// The visible frame inset by the configured padding.
    pub async fn center(&self) -> Result<Rect> {
        let padding = self.config.center_padding;
        self.place(move |v| center_frame(v, padding)).await
    }

    /// The whole visible frame.
    pub async fn fullscreen(&self) -> Result<Rect> {
        self.place(full_frame).await
    }

    /// Move one edge of the focused window by the configured step. Returns
    /// the requested frame in consumer space.
    pub async fn nudge(&self, nudge: Nudge) -> Result<Rect> {
        let step = self.config.nudge_step;
        let Some(_guard) = self.gate.try_enter() else {
            return Err(Error::Busy);
        };
        let t = self.focused_target()?;
        let target = nudge.apply(t.frame, step);
        info!(id = %t.id, ?nudge, step, "nudge");
        move_frame(self.ops.as_ref(), t.id, target, self.config.settle_delay()).await?;
        Ok(t.space.to_consumer(target))
    }

    /// Compute a consumer-space frame from the visible frame of the focused
    /// window's screen and apply it.
    async fn place(&self, frame: impl FnOnce(Rect) -> Rect) -> Result<Rect> {
        let Some(_guard) = self.gate.try_enter() else {
            return Err(Error::Busy);
        };
        let t = self.focused_target()?;
        let target = frame(t.screen.visible_frame);
        info!(id = %t.id, screen = %t.screen.id, target = %target, "place");
        self.glide(t.id, t.space.to_producer(target)).await?;
        Ok(target)
    }

    /// Move to a producer-space frame, animated when the config asks for it.
    async fn glide(&self, id: WindowId, target: Rect) -> Result<()> {
        let settle = self.config.settle_delay();
        match self.config.animation() {
            Some(duration) => {
                let frame = self.config.animation_frame();
                animate_frame(self.ops.as_ref(), id, target, duration, frame, settle).await
            }
            None => move_frame(self.ops.as_ref(), id, target, settle).await,
        }
    }

    /// Resolve the focused window, its current frame and its screen.
    fn focused_target(&self) -> Result<Target> {
        let w = self.ops.focused_window().ok_or(Error::NoFocusedWindow)?;
        let frame = self.ops.window_frame(w.id).unwrap_or(w.frame);
        let screens = self.ops.screens();
        let space = CoordinateSpace::from_screens(&screens);
        let screen = screens
            .iter()
            .find(|s| s.id == w.screen)
            .or_else(|| screen_for_frame(&screens, &space.to_consumer(frame)))
            .copied()
            .ok_or(Error::NoScreen)?;
        Ok(Target {
            id: w.id,
            frame,
            screen,
            space,
        })
    }
}

#[cfg(test)]
mod tests {
    use tile_ids::ScreenId;
    use tile_layout::WindowSnapshot;

    use super::*;
    use crate::ops::{MockCall, MockWindowOps};

    fn focused_desk() -> (Arc<MockWindowOps>, TilingCommands) {
        let ops = Arc::new(MockWindowOps::new());
        ops.set_screens(vec![Screen {
            id: ScreenId::new(1),
            frame: Rect::new(0.0, 0.0, 1000.0, 800.0),
            visible_frame: Rect::new(0.0, 0.0, 1000.0, 780.0),
        }]);
        ops.set_windows(vec![WindowSnapshot::new(
            WindowId::new(1),
            Rect::new(100.0, 100.0, 300.0, 300.0),
            ScreenId::new(1),
        )]);
        ops.set_focused(Some(WindowId::new(1)));
        let cmds = TilingCommands::new(ops.clone(), EngineConfig::default(), ApplyGate::new());
        (ops, cmds)
    }

    #[tokio::test(start_paused = true)]
    async fn halves_and_fullscreen_respect_visible_frame() {
        let (ops, cmds) = focused_desk();
        let id = WindowId::new(1);
        assert_eq!(cmds.left_half().await.unwrap(), Rect::new(0.0, 0.0, 500.0, 780.0));
        // The menu-bar strip is at the top, so producer y starts at 20.
        assert_eq!(ops.frame(id), Some(Rect::new(0.0, 20.0, 500.0, 780.0)));
        cmds.fullscreen().await.unwrap();
        assert_eq!(ops.frame(id), Some(Rect::new(0.0, 20.0, 1000.0, 780.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn right_half_reanchors_after_clamp() {
        let (ops, cmds) = focused_desk();
        let id = WindowId::new(1);
        ops.set_min_width(id, 600.0);
        assert_eq!(cmds.right_half().await.unwrap(), Rect::new(400.0, 0.0, 600.0, 780.0));
        assert_eq!(ops.frame(id), Some(Rect::new(400.0, 20.0, 600.0, 780.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn center_uses_padding() {
        let (ops, cmds) = focused_desk();
        cmds.center().await.unwrap();
        assert_eq!(ops.frame(WindowId::new(1)), Some(Rect::new(40.0, 60.0, 920.0, 700.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn nudges_move_one_edge() {
        let (ops, cmds) = focused_desk();
        let id = WindowId::new(1);
        cmds.nudge(Nudge::TopUp).await.unwrap();
        assert_eq!(ops.frame(id), Some(Rect::new(100.0, 90.0, 300.0, 310.0)));
        cmds.nudge(Nudge::TopDown).await.unwrap();
        assert_eq!(ops.frame(id), Some(Rect::new(100.0, 100.0, 300.0, 300.0)));
        cmds.nudge(Nudge::BottomDown).await.unwrap();
        assert_eq!(ops.frame(id), Some(Rect::new(100.0, 100.0, 300.0, 310.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn animated_placement_glides_into_place() {
        let (ops, _) = focused_desk();
        let config = EngineConfig {
            animate: true,
            ..EngineConfig::default()
        };
        let cmds = TilingCommands::new(ops.clone(), config, ApplyGate::new());
        let id = WindowId::new(1);
        assert_eq!(cmds.fullscreen().await.unwrap(), Rect::new(0.0, 0.0, 1000.0, 780.0));
        assert_eq!(ops.frame(id), Some(Rect::new(0.0, 20.0, 1000.0, 780.0)));
        let moves = ops
            .mutations()
            .iter()
            .filter(|c| matches!(c, MockCall::SetPosition(..)))
            .count();
        assert!(moves > 1);

        // Nudges never animate.
        ops.clear_calls();
        cmds.nudge(Nudge::BottomDown).await.unwrap();
        assert_eq!(ops.mutations().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_focused_is_an_error() {
        let (ops, cmds) = focused_desk();
        ops.set_focused(None);
        assert!(matches!(cmds.fullscreen().await, Err(Error::NoFocusedWindow)));
        assert!(ops.calls().is_empty());
    }
}
