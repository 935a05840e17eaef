//! Shared identifiers for tiled windows and the screens they live on.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a window as reported by the window source.
///
/// Identifiers are stable for the lifetime of a window and are never reused
/// while the window is tracked, so they are safe to carry across poll ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u32);

impl WindowId {
    /// Wrap a raw window number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw window number.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for WindowId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<WindowId> for u32 {
    fn from(value: WindowId) -> Self {
        value.raw()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Opaque handle for a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(u32);

impl ScreenId {
    /// Wrap a raw display identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw display identifier.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ScreenId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
