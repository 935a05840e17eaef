//! tile-layout: turning window frames into target frames.
//!
//! Two families of layout live here:
//! - [`aligned_layout`], a recursive binary-space partitioner that infers the
//!   user's implied arrangement from sloppy window frames and returns an exact,
//!   seam-free partition of the bounds
//! - the [`planner`] functions for deterministic primary/stack arrangements,
//!   with round-robin primary selection held by [`LayoutPlanner`]
//!
//! Everything here is pure and synchronous. Frames are in the row-up consumer
//! space used by [`tile_geom::Screen`].

pub mod partition;
mod plan;
pub mod planner;
mod snapshot;


pub use partition::{AlignedLayout, aligned_layout};
pub use plan::{LayoutPlan, TargetFrame};
pub use planner::{LayoutPlanner, Side, plan_partition};
pub use snapshot::WindowSnapshot;
