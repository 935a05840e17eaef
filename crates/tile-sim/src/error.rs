//! Error handling for the tile-sim crate.

use std::{io, result};

use ron::error::{Error as RonError, SpannedError};
use thiserror::Error;

/// Convenient result type for tile-sim operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A scenario or config file failed to parse.
    #[error("Parse error: {0}")]
    Ron(#[from] SpannedError),
    /// A report failed to serialize.
    #[error("Render error: {0}")]
    Render(#[from] RonError),
    /// Errors surfaced by the engine.
    #[error("Engine error: {0}")]
    Engine(#[from] tile_engine::Error),
    /// The scenario parsed but describes an impossible desktop.
    #[error("Invalid scenario: {0}")]
    Scenario(String),
    /// Generic error for unexpected conditions.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Helper to build a scenario validation error.
    pub fn scenario<M: Into<String>>(msg: M) -> Self {
        Self::Scenario(msg.into())
    }

    /// Helper for wrapping generic string errors.
    pub fn other<M: Into<String>>(msg: M) -> Self {
        Self::Other(msg.into())
    }
}
