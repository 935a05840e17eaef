//! Planner output.

use std::collections::BTreeMap;

use serde::Serialize;
use tile_geom::{Rect, Screen};
use tile_ids::WindowId;

/// Where one window should end up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TargetFrame {
    /// Target rectangle, consumer space.
    pub rect: Rect,
    /// Screen the rectangle was computed on.
    pub screen: Screen,
}

/// Output of one planning pass. Recomputed on every use; never diffed
/// against an earlier plan.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LayoutPlan {
    /// Target frame per window.
    pub assignments: BTreeMap<WindowId, TargetFrame>,
    /// Unassigned regions large enough to be worth drawing.
    pub gaps: Vec<Rect>,
}

impl LayoutPlan {
    /// True when the plan neither assigns a frame nor reports a gap.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.gaps.is_empty()
    }

    /// Target rectangle for `id`, if it was assigned one.
    pub fn target(&self, id: WindowId) -> Option<Rect> {
        self.assignments.get(&id).map(|t| t.rect)
    }
}
