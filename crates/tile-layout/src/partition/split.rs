//! Split selection: where to cut a region so each side keeps its windows.

use std::collections::BTreeMap;

use tile_geom::{Axis, Rect};

use super::{MIN_PARTITION_EDGE, TOLERANCE, center_of, sorted_by_center};

/// A valid cut of a region into two non-degenerate halves.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct SplitCandidate {
    /// Axis the cut is made along.
    pub(super) axis: Axis,
    /// Integer coordinate of the cut.
    pub(super) coordinate: f64,
    /// Indices that go to the lower half (left, or bottom).
    pub(super) lower: Vec<usize>,
    /// Indices that go to the upper half (right, or top).
    pub(super) upper: Vec<usize>,
    /// Width of the center gap the cut falls in. Zero for median splits.
    pub(super) score: f64,
}

/// Pick the better of the x and y candidates.
///
/// A strictly larger score wins. Scores within tolerance of each other defer
/// to the region's long dimension, x when the region is at least as wide as
/// it is tall.
pub(super) fn choose_split(
    indices: &[usize],
    frames: &BTreeMap<usize, Rect>,
    region: Rect,
) -> Option<SplitCandidate> {
    let x = evaluate_split(indices, frames, region, Axis::X);
    let y = evaluate_split(indices, frames, region, Axis::Y);
    match (x, y) {
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (Some(x), Some(y)) => {
            if (x.score - y.score).abs() <= TOLERANCE {
                Some(if region.w >= region.h { x } else { y })
            } else if x.score > y.score {
                Some(x)
            } else {
                Some(y)
            }
        }
        (None, None) => None,
    }
}

/// Best cut of `region` along `axis`, or `None` if any cut would leave a side
/// no wider than the minimum partition edge.
///
/// A rounded cut that leaves such a sliver drops the candidate outright; it is
/// not retried as a median split.
fn evaluate_split(
    indices: &[usize],
    frames: &BTreeMap<usize, Rect>,
    region: Rect,
    axis: Axis,
) -> Option<SplitCandidate> {
    let sorted = sorted_by_center(indices, frames, axis);
    if sorted.len() < 2 {
        return None;
    }

    let mut split_at = sorted.len() / 2;
    let mut best_gap = -1.0;
    for (i, pair) in sorted.windows(2).enumerate() {
        let gap = center_of(frames, pair[1], axis) - center_of(frames, pair[0], axis);
        if gap > best_gap {
            best_gap = gap;
            split_at = i + 1;
        }
    }
    if best_gap < TOLERANCE {
        split_at = sorted.len() / 2;
        best_gap = 0.0;
    }

    let (lower, upper) = sorted.split_at(split_at);
    if lower.is_empty() || upper.is_empty() {
        return None;
    }

    let lower_max_edge = lower
        .iter()
        .filter_map(|i| frames.get(i))
        .map(|r| r.max_along(axis))
        .fold(f64::NEG_INFINITY, f64::max);
    let upper_min_edge = upper
        .iter()
        .filter_map(|i| frames.get(i))
        .map(|r| r.min_along(axis))
        .fold(f64::INFINITY, f64::min);
    let lower_max_center = lower
        .iter()
        .map(|i| center_of(frames, *i, axis))
        .fold(f64::NEG_INFINITY, f64::max);
    let upper_min_center = upper
        .iter()
        .map(|i| center_of(frames, *i, axis))
        .fold(f64::INFINITY, f64::min);

    let coordinate = if lower_max_edge + TOLERANCE < upper_min_edge {
        (lower_max_edge + upper_min_edge) / 2.0
    } else {
        (lower_max_center + upper_min_center) / 2.0
    };

    let min_coord = region.min_along(axis) + MIN_PARTITION_EDGE;
    let max_coord = region.max_along(axis) - MIN_PARTITION_EDGE;
    if min_coord >= max_coord {
        return None;
    }
    let coordinate = coordinate.clamp(min_coord, max_coord).round();

    let (lo, hi) = region.split_at(axis, coordinate);
    if lo.extent_along(axis) <= MIN_PARTITION_EDGE || hi.extent_along(axis) <= MIN_PARTITION_EDGE {
        return None;
    }

    Some(SplitCandidate {
        axis,
        coordinate,
        lower: lower.to_vec(),
        upper: upper.to_vec(),
        score: best_gap,
    })
}
