//! Displays and window-to-display assignment.

use serde::{Deserialize, Serialize};
use tile_ids::ScreenId;
use tracing::debug;

use crate::rect::{Point, Rect};

/// A display, in row-up (bottom-left origin) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    /// Display identifier.
    pub id: ScreenId,
    /// Full display frame.
    pub frame: Rect,
    /// Usable area: the frame minus menu bars, docks and similar reserved strips.
    pub visible_frame: Rect,
}

impl Screen {
    /// Construct a screen whose visible frame is the full frame.
    #[must_use]
    pub const fn full(id: ScreenId, frame: Rect) -> Self {
        Self {
            id,
            frame,
            visible_frame: frame,
        }
    }
}

/// Pick the screen a frame belongs to: the one whose visible frame shares the
/// largest area with it. Ties go to the earlier screen. Returns `None` when the
/// frame touches no screen at all.
pub fn screen_for_frame<'a>(screens: &'a [Screen], frame: &Rect) -> Option<&'a Screen> {
    let mut best: Option<(&Screen, f64)> = None;
    for s in screens {
        let area = s.visible_frame.intersection_area(frame);
        if area <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((s, area)),
        }
    }
    if best.is_none() {
        debug!("screen_for_frame: {} overlaps no screen", frame);
    }
    best.map(|(s, _)| s)
}

/// The first screen whose full frame contains `p`.
pub fn screen_at_point(screens: &[Screen], p: Point) -> Option<&Screen> {
    let hit = screens.iter().find(|s| s.frame.contains_point(p));
    if hit.is_none() {
        debug!("screen_at_point: no screen contains {}", p);
    }
    hit
}
