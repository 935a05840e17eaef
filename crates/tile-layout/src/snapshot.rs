//! Point-in-time window records.

use serde::{Deserialize, Serialize};
use tile_geom::Rect;
use tile_ids::{ScreenId, WindowId};

/// A window as reported by the window source at one instant.
///
/// Snapshots are produced fresh on every poll and are never mutated by the
/// layout code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    /// Stable window identifier.
    pub id: WindowId,
    /// Current frame.
    pub frame: Rect,
    /// Screen the window belongs to.
    pub screen: ScreenId,
    /// Human-readable label for logs.
    #[serde(default)]
    pub label: String,
}

impl WindowSnapshot {
    /// Construct a snapshot with an empty label.
    pub fn new(id: WindowId, frame: Rect, screen: ScreenId) -> Self {
        Self {
            id,
            frame,
            screen,
            label: String::new(),
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
