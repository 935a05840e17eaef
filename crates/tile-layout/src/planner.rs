//! Primary/stack frame math and partition planning.
//!
//! The primary/stack functions only compute rectangles; sequencing the
//! mutations, the settle delays between them and the re-measure of the
//! applied primary width belong to the engine.

use serde::{Deserialize, Serialize};
use tile_geom::{Rect, Screen};
use tracing::debug;

use crate::{
    partition::aligned_layout,
    plan::{LayoutPlan, TargetFrame},
    snapshot::WindowSnapshot,
};

/// Which half of the screen the primary window takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left half; the stack goes right.
    Left,
    /// Right half; the stack goes left.
    Right,
}

/// Round-robin primary selection.
///
/// Each layout invocation advances the starting primary by one, so repeated
/// invocations cycle which window is primary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutPlanner {
    /// Index handed out by the previous call to [`LayoutPlanner::advance`].
    last_starting_primary: Option<usize>,
}

impl LayoutPlanner {
    /// A planner whose first [`advance`](Self::advance) yields index 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_starting_primary: None,
        }
    }

    /// Next primary index for a list of `count` windows, or `None` when the
    /// list is empty. Shrinking lists wrap modulo the new count.
    pub fn advance(&mut self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let next = self.last_starting_primary.map_or(0, |last| (last + 1) % count);
        self.last_starting_primary = Some(next);
        debug!("planner: primary index {} of {}", next, count);
        Some(next)
    }

    /// Index returned by the most recent advance.
    #[must_use]
    pub const fn last_starting_primary(&self) -> Option<usize> {
        self.last_starting_primary
    }
}

/// Frame for the primary window: half the visible width (all of it when it
/// is the only window), full height, against the `side` edge.
#[must_use]
pub fn primary_frame(visible: Rect, count: usize, side: Side) -> Rect {
    let v = visible.standardized();
    if count <= 1 {
        return v;
    }
    let w = v.w / 2.0;
    match side {
        Side::Left => Rect::new(v.x, v.y, w, v.h),
        Side::Right => Rect::new(v.x + w, v.y, w, v.h),
    }
}

/// Re-anchor a primary whose applied width differs from the request so its
/// trailing edge sits on the visible frame's right edge.
#[must_use]
pub fn right_anchor(visible: Rect, applied_width: f64) -> Rect {
    let v = visible.standardized();
    Rect::new(v.max_x() - applied_width, v.y, applied_width, v.h)
}

/// Frames for `count` stacked windows beside the applied primary frame.
///
/// Slices are equal in height and ascend from the bottom of the visible frame.
/// The stack fills whatever width the primary left: it starts at the
/// primary's trailing edge for a left primary, and at the visible frame's left
/// edge for a right primary.
#[must_use]
pub fn stack_frames(visible: Rect, primary_applied: Rect, side: Side, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let v = visible.standardized();
    let p = primary_applied.standardized();
    let h = v.h / count as f64;
    let w = v.w - p.w;
    let x = match side {
        Side::Left => p.max_x(),
        Side::Right => v.x,
    };
    (0..count)
        .map(|i| Rect::new(x, v.y + h * i as f64, w, h))
        .collect()
}

/// Indices of the non-primary windows in round-robin order starting just
/// after `primary`.
#[must_use]
pub fn stack_order(count: usize, primary: usize) -> Vec<usize> {
    (1..count).map(|i| (primary + i) % count).collect()
}

/// Left or right half of the visible frame.
#[must_use]
pub fn half_frame(visible: Rect, side: Side) -> Rect {
    primary_frame(visible, 2, side)
}

/// The visible frame inset by `padding` on every side. Falls back to the full
/// visible frame when the padding would leave nothing.
#[must_use]
pub fn center_frame(visible: Rect, padding: f64) -> Rect {
    let v = visible.standardized();
    v.inset(padding).unwrap_or(v)
}

/// The whole visible frame.
#[must_use]
pub fn full_frame(visible: Rect) -> Rect {
    visible.standardized()
}

/// Partition `screen`'s visible frame among the windows that belong to it.
///
/// Windows on other screens are ignored. The returned gaps only include
/// regions at least `min_gap_render` in both dimensions.
pub fn plan_partition(windows: &[WindowSnapshot], screen: &Screen, min_gap_render: f64) -> LayoutPlan {
    let on_screen: Vec<&WindowSnapshot> = windows.iter().filter(|w| w.screen == screen.id).collect();
    let frames: Vec<Rect> = on_screen.iter().map(|w| w.frame).collect();
    let layout = aligned_layout(&frames, screen.visible_frame);

    let assignments = layout
        .owners
        .iter()
        .filter_map(|(i, rect)| {
            on_screen.get(*i).map(|w| {
                (
                    w.id,
                    TargetFrame {
                        rect: *rect,
                        screen: *screen,
                    },
                )
            })
        })
        .collect();
    let gaps = layout
        .gaps
        .into_iter()
        .filter(|g| g.w >= min_gap_render && g.h >= min_gap_render)
        .collect();
    LayoutPlan { assignments, gaps }
}
