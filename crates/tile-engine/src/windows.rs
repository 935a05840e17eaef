//! Stable window ordering and frame change detection.

use std::collections::{HashMap, HashSet};

use tile_geom::{Rect, approx_eq};
use tile_ids::WindowId;
use tile_layout::WindowSnapshot;
use tracing::trace;

/// Merge a fresh enumeration into a previously known order.
///
/// Windows seen before keep their old relative order but carry the latest
/// snapshot data; windows seen for the first time are appended in snapshot
/// order; windows absent from `latest` are dropped.
pub fn merge_order(previous: &[WindowSnapshot], latest: &[WindowSnapshot]) -> Vec<WindowSnapshot> {
    let by_id: HashMap<WindowId, &WindowSnapshot> = latest.iter().map(|w| (w.id, w)).collect();
    let mut seen: HashSet<WindowId> = HashSet::with_capacity(latest.len());
    let mut merged = Vec::with_capacity(latest.len());

    for old in previous {
        if let Some(updated) = by_id.get(&old.id)
            && seen.insert(old.id)
        {
            merged.push((*updated).clone());
        }
    }
    for w in latest {
        if seen.insert(w.id) {
            merged.push(w.clone());
        }
    }
    merged
}

/// True when the tracked set differs: a count mismatch, an id missing from
/// `latest`, or any origin or size component off by more than `tolerance`.
pub fn frames_changed(
    previous: &HashMap<WindowId, Rect>,
    latest: &HashMap<WindowId, Rect>,
    tolerance: f64,
) -> bool {
    if previous.len() != latest.len() {
        return true;
    }
    previous.iter().any(|(id, prev)| match latest.get(id) {
        None => true,
        Some(cur) => {
            let changed = !(approx_eq(prev.x, cur.x, tolerance)
                && approx_eq(prev.y, cur.y, tolerance)
                && approx_eq(prev.w, cur.w, tolerance)
                && approx_eq(prev.h, cur.h, tolerance));
            if changed {
                trace!(id = %id, from = %prev, to = %cur, "frame changed");
            }
            changed
        }
    })
}

/// Ordered registry of known windows.
///
/// Refreshing it through [`merge_order`] keeps round-robin primary selection
/// stable while the window source re-enumerates windows in arbitrary order.
#[derive(Clone, Debug, Default)]
pub struct WindowOrder {
    /// Windows in their remembered order.
    windows: Vec<WindowSnapshot>,
}

impl WindowOrder {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fresh enumeration and return the resulting order.
    pub fn refresh(&mut self, latest: &[WindowSnapshot]) -> &[WindowSnapshot] {
        self.windows = merge_order(&self.windows, latest);
        &self.windows
    }
}
