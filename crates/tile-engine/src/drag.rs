//! Drag target selection and the state carried between ticks.

use std::collections::HashMap;

use tile_geom::Rect;
use tile_ids::WindowId;
use tracing::debug;

/// The only state the reconciler carries from one tick to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragState {
    /// Window locked as the drag target, if any.
    pub locked: Option<WindowId>,
    /// Frames recorded at the end of the previous tick, consumer space.
    pub previous: HashMap<WindowId, Rect>,
}

impl DragState {
    /// Fresh state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the lock and all movement history.
    pub fn reset(&mut self) {
        self.locked = None;
        self.previous.clear();
    }
}

/// Decide which window the user is dragging this tick.
///
/// In order: a released button clears the lock and means no drag; a lock on a
/// window that is still present is kept; otherwise the window whose center
/// moved furthest since the previous tick is locked if it moved more than
/// `threshold`; otherwise the focused window is used if present. A lock on a
/// window that vanished is dropped silently.
pub fn resolve_dragged(
    state: &mut DragState,
    current: &HashMap<WindowId, Rect>,
    pressed: bool,
    focused: Option<WindowId>,
    threshold: f64,
) -> Option<WindowId> {
    if !pressed {
        state.locked = None;
        return None;
    }

    if let Some(id) = state.locked {
        if current.contains_key(&id) {
            return Some(id);
        }
        debug!(id = %id, "drag lock on vanished window cleared");
        state.locked = None;
    }

    if let Some((id, moved)) = most_moved(&state.previous, current)
        && moved > threshold
    {
        debug!(id = %id, moved, "drag lock acquired");
        state.locked = Some(id);
        return Some(id);
    }

    focused.filter(|id| current.contains_key(id))
}

/// The window with the largest center displacement relative to `previous`.
/// Ties go to the smaller id.
fn most_moved(
    previous: &HashMap<WindowId, Rect>,
    current: &HashMap<WindowId, Rect>,
) -> Option<(WindowId, f64)> {
    let mut ids: Vec<&WindowId> = current.keys().collect();
    ids.sort();
    let mut best: Option<(WindowId, f64)> = None;
    for id in ids {
        let (Some(prev), Some(cur)) = (previous.get(id), current.get(id)) else {
            continue;
        };
        let d = (cur.cx() - prev.cx()).hypot(cur.cy() - prev.cy());
        if best.is_none_or(|(_, b)| d > b) {
            best = Some((*id, d));
        }
    }
    best
}
