//! Engine tuning parameters.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Pause after every frame mutation before the result can be trusted.
pub const SETTLE_MS: u64 = 50;
/// Reconciler poll cadence.
pub const POLL_MS: u64 = 60;
/// Minimum center-to-center movement between ticks that counts as a drag.
pub const MOVEMENT_THRESHOLD: f64 = 1.5;
/// Per-edge tolerance below which a window is considered already in place.
pub const FRAME_TOLERANCE: f64 = 1.0;
/// Per-edge tolerance for reporting that tracked frames changed.
pub const CHANGE_TOLERANCE: f64 = 0.5;
/// Gap regions smaller than this in either dimension are not reported.
pub const MIN_GAP_RENDER: f64 = 8.0;
/// Step for edge nudges.
pub const NUDGE_STEP: i32 = 10;
/// Padding on every side for the centered frame.
pub const CENTER_PADDING: f64 = 40.0;
/// Maximum re-reads of an applied width before trusting the last one.
pub const REMEASURE_ATTEMPTS: u32 = 3;
/// Length of an animated single-window move.
pub const ANIMATION_MS: u64 = 130;
/// Position updates per second during an animated move.
pub const ANIMATION_FPS: u32 = 60;

/// Engine configuration. Every field has a default, so a RON file only needs
/// to name the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Settle delay in milliseconds.
    pub settle_ms: u64,
    /// Poll interval in milliseconds.
    pub poll_ms: u64,
    /// Drag detection threshold.
    pub movement_threshold: f64,
    /// In-place tolerance for reconciliation.
    pub frame_tolerance: f64,
    /// Change-detection tolerance.
    pub change_tolerance: f64,
    /// Minimum gap size worth reporting.
    pub min_gap_render: f64,
    /// Nudge step.
    pub nudge_step: i32,
    /// Center padding.
    pub center_padding: f64,
    /// Bound on applied-width re-reads for right-anchored layouts.
    pub remeasure_attempts: u32,
    /// Glide single-window placements into position instead of jumping.
    pub animate: bool,
    /// Animated move length in milliseconds; zero disables the glide.
    pub animation_ms: u64,
    /// Animation frame rate.
    pub animation_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_ms: SETTLE_MS,
            poll_ms: POLL_MS,
            movement_threshold: MOVEMENT_THRESHOLD,
            frame_tolerance: FRAME_TOLERANCE,
            change_tolerance: CHANGE_TOLERANCE,
            min_gap_render: MIN_GAP_RENDER,
            nudge_step: NUDGE_STEP,
            center_padding: CENTER_PADDING,
            remeasure_attempts: REMEASURE_ATTEMPTS,
            animate: false,
            animation_ms: ANIMATION_MS,
            animation_fps: ANIMATION_FPS,
        }
    }
}

impl EngineConfig {
    /// Parse a RON document, filling unspecified fields with defaults.
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Read and parse a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_ron(&s)
    }

    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Poll interval as a duration. Zero is bumped to one millisecond since a
    /// zero-period interval is invalid.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }

    /// Length of an animated move, or `None` when placements should jump.
    pub fn animation(&self) -> Option<Duration> {
        (self.animate && self.animation_ms > 0).then(|| Duration::from_millis(self.animation_ms))
    }

    /// Time between animation frames.
    pub fn animation_frame(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.animation_fps.max(1)))
    }
}
