//! Single-edge frame adjustments.
//!
//! Nudges operate on producer-space frames (y grows downward), so the *top*
//! edge is `y` and the *bottom* edge is `y + h`. Each nudge moves exactly one
//! edge by `step` and leaves the other three where they were.

use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// One of the four edge nudges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nudge {
    /// Raise the top edge, growing the window.
    TopUp,
    /// Lower the top edge, shrinking the window.
    TopDown,
    /// Raise the bottom edge, shrinking the window.
    BottomUp,
    /// Lower the bottom edge, growing the window.
    BottomDown,
}

impl Nudge {
    /// Apply this nudge to `frame`.
    #[must_use]
    pub fn apply(self, frame: Rect, step: i32) -> Rect {
        match self {
            Self::TopUp => top_up(frame, step),
            Self::TopDown => top_down(frame, step),
            Self::BottomUp => bottom_up(frame, step),
            Self::BottomDown => bottom_down(frame, step),
        }
    }
}

/// Move the top edge up by `step`; the bottom edge stays put.
#[must_use]
pub fn top_up(frame: Rect, step: i32) -> Rect {
    let d = f64::from(step);
    Rect::new(frame.x, frame.y - d, frame.w, frame.h + d)
}

/// Move the top edge down by `step`; the bottom edge stays put.
#[must_use]
pub fn top_down(frame: Rect, step: i32) -> Rect {
    let d = f64::from(step);
    Rect::new(frame.x, frame.y + d, frame.w, frame.h - d)
}

/// Move the bottom edge up by `step`; the top edge stays put.
#[must_use]
pub fn bottom_up(frame: Rect, step: i32) -> Rect {
    Rect::new(frame.x, frame.y, frame.w, frame.h - f64::from(step))
}

/// Move the bottom edge down by `step`; the top edge stays put.
#[must_use]
pub fn bottom_down(frame: Rect, step: i32) -> Rect {
    Rect::new(frame.x, frame.y, frame.w, frame.h + f64::from(step))
}
