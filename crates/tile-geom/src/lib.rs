//! tile-geom: geometry primitives for the tiler.
//!
//! Everything in this crate is pure arithmetic:
//! - [`Rect`], [`Point`], [`Size`] and the [`Axis`] helpers used by the partitioner
//! - [`Screen`] selection by intersection area or point containment
//! - [`coords`]: conversion between the row-up (bottom-left origin) space that
//!   screens and layouts are expressed in and the row-down space of the topmost
//!   screen that frame mutation consumes
//! - [`nudge`]: single-edge frame adjustments

pub mod coords;
pub mod nudge;
mod rect;
mod screen;


pub use coords::CoordinateSpace;
pub use nudge::Nudge;
pub use rect::{Axis, Point, Rect, Size, approx_eq, overlap_1d};
pub use screen::{Screen, screen_at_point, screen_for_frame};
pub use tile_ids::{ScreenId, WindowId};
