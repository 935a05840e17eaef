//! Binary-space partitioning of a bounding rectangle among window frames.
//!
//! Window frames reported by a window server are imprecise and rarely
//! adjacent. The partitioner reads the arrangement they imply (two frames
//! whose centers are far apart horizontally are side by side) and returns a
//! strict partition of the bounds: every surviving frame gets a region, the
//! regions never overlap, and together they cover the bounds exactly.
//!
//! The pipeline is:
//! 1. clip each frame to the bounds and drop what vanishes
//! 2. recursively split the region on the axis with the widest gap between
//!    window centers, falling back to even slices when no split is valid
//! 3. snap every region edge onto a shared integer grid so neighbours agree
//!    on their common edge

use std::collections::BTreeMap;

use tile_geom::{Axis, Rect};
use tracing::trace;

mod slices;
mod snap;
mod split;

/// Gaps, scores and edge dedup below this are treated as zero.
pub(crate) const TOLERANCE: f64 = 0.5;

/// Regions must be strictly larger than this along both axes to be split.
pub(crate) const MIN_PARTITION_EDGE: f64 = 1.0;

/// Result of [`aligned_layout`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignedLayout {
    /// Owner regions in ascending source-index order.
    pub occupied: Vec<Rect>,
    /// Unassigned regions. Only non-empty when no frame survived clipping.
    pub gaps: Vec<Rect>,
    /// Source index to assigned region. Indices of frames dropped during
    /// clipping never appear.
    pub owners: BTreeMap<usize, Rect>,
}

/// Partition `bounds` among `frames`.
///
/// Total for finite input: degenerate bounds yield an empty layout, and an
/// input with no surviving frames yields a single gap covering the bounds.
pub fn aligned_layout(frames: &[Rect], bounds: Rect) -> AlignedLayout {
    let bounds = bounds.standardized();
    if bounds.w <= MIN_PARTITION_EDGE || bounds.h <= MIN_PARTITION_EDGE {
        trace!("aligned_layout: degenerate bounds {}", bounds);
        return AlignedLayout::default();
    }

    // Keep source indices so owners map back to the caller's slice.
    let mut clipped: BTreeMap<usize, Rect> = BTreeMap::new();
    for (i, f) in frames.iter().enumerate() {
        if let Some(c) = f.standardized().intersection(&bounds).filter(|c| !c.is_empty()) {
            clipped.insert(i, c);
        }
    }
    if clipped.is_empty() {
        return AlignedLayout {
            occupied: Vec::new(),
            gaps: vec![bounds],
            owners: BTreeMap::new(),
        };
    }

    let indices: Vec<usize> = clipped.keys().copied().collect();
    let raw = assign_strict(&indices, &clipped, bounds);
    let owners = snap::snap_to_grid(&raw, bounds);
    trace!(
        "aligned_layout: {} frames -> {} owners in {}",
        frames.len(),
        owners.len(),
        bounds
    );

    AlignedLayout {
        occupied: owners.values().map(Rect::standardized).collect(),
        gaps: Vec::new(),
        owners,
    }
}

/// Assign every index in `indices` a region inside `region`.
fn assign_strict(
    indices: &[usize],
    frames: &BTreeMap<usize, Rect>,
    region: Rect,
) -> BTreeMap<usize, Rect> {
    let region = region.standardized();
    match indices {
        [] => BTreeMap::new(),
        _ if region.w <= MIN_PARTITION_EDGE || region.h <= MIN_PARTITION_EDGE => {
            slices::even_slices(indices, frames, region)
        }
        [only] => BTreeMap::from([(*only, region)]),
        _ => match split::choose_split(indices, frames, region) {
            Some(s) => {
                let (lo, hi) = region.split_at(s.axis, s.coordinate);
                let mut out = assign_strict(&s.lower, frames, lo);
                out.extend(assign_strict(&s.upper, frames, hi));
                out
            }
            None => slices::even_slices(indices, frames, region),
        },
    }
}

/// Center of `frames[i]` along `axis`; unknown indices sort first.
pub(crate) fn center_of(frames: &BTreeMap<usize, Rect>, i: usize, axis: Axis) -> f64 {
    frames.get(&i).map_or(f64::NEG_INFINITY, |r| r.center_along(axis))
}

/// Stable sort of `indices` by frame center along `axis`.
pub(crate) fn sorted_by_center(
    indices: &[usize],
    frames: &BTreeMap<usize, Rect>,
    axis: Axis,
) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_by(|a, b| center_of(frames, *a, axis).total_cmp(&center_of(frames, *b, axis)));
    sorted
}
