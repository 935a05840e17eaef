//! Error types for the engine.

use std::{io, result::Result as StdResult};

use ron::error::SpannedError;
use thiserror::Error;
use tile_ids::WindowId;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by window operations and engine commands.
///
/// None of these are fatal to the reconciler: a failed mutation is logged and
/// the next tick retries.
#[derive(Debug, Error)]
pub enum Error {
    /// The window disappeared between enumeration and mutation.
    #[error("Window {0} is gone")]
    WindowGone(WindowId),

    /// The window server refused a request.
    #[error("Window {id} rejected request: {reason}")]
    Rejected {
        /// Target window.
        id: WindowId,
        /// Reason reported by the window source.
        reason: String,
    },

    /// Another frame update sequence holds the apply gate.
    #[error("Frame update already in progress")]
    Busy,

    /// No screen could be resolved for the operation.
    #[error("No screen available")]
    NoScreen,

    /// A focused-window command ran with nothing focused.
    #[error("No focused window")]
    NoFocusedWindow,

    /// I/O failure while loading configuration or scenarios.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration failed to parse.
    #[error("Config error: {0}")]
    Config(#[from] SpannedError),
}
