//! Equal-share fallback when no clean split exists.

use std::collections::BTreeMap;

use tile_geom::{Axis, Rect};

use super::sorted_by_center;

/// Divide `region` into one equal slice per index along its long dimension,
/// assigned in center order. Always succeeds for a non-empty index set.
pub(super) fn even_slices(
    indices: &[usize],
    frames: &BTreeMap<usize, Rect>,
    region: Rect,
) -> BTreeMap<usize, Rect> {
    let axis = if region.w >= region.h { Axis::X } else { Axis::Y };
    let sorted = sorted_by_center(indices, frames, axis);
    if sorted.is_empty() {
        return BTreeMap::new();
    }
    let edges = even_edges(
        region.min_along(axis),
        region.max_along(axis),
        sorted.len(),
    );
    sorted
        .iter()
        .zip(edges.windows(2))
        .map(|(idx, e)| {
            let r = match axis {
                Axis::X => Rect::new(e[0], region.min_y(), e[1] - e[0], region.h),
                Axis::Y => Rect::new(region.min_x(), e[0], region.w, e[1] - e[0]),
            };
            (*idx, r.standardized())
        })
        .collect()
}

/// `parts + 1` boundaries from `start` to `end`. Interior boundaries are
/// rounded, then clamped forward so the sequence never decreases.
pub(super) fn even_edges(start: f64, end: f64, parts: usize) -> Vec<f64> {
    if parts == 0 {
        return vec![start, end];
    }
    let mut edges = Vec::with_capacity(parts + 1);
    edges.push(start);
    for i in 1..parts {
        let ratio = i as f64 / parts as f64;
        edges.push((start + (end - start) * ratio).round());
    }
    edges.push(end);
    for i in 1..edges.len() {
        if edges[i] < edges[i - 1] {
            edges[i] = edges[i - 1];
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_rounded_and_pinned() {
        assert_eq!(even_edges(0.0, 100.0, 3), vec![0.0, 33.0, 67.0, 100.0]);
        assert_eq!(even_edges(0.5, 10.0, 1), vec![0.5, 10.0]);
    }

    #[test]
    fn edges_never_decrease() {
        // Rounding can push an interior edge past the end; the end follows it.
        assert_eq!(even_edges(0.4, 0.9, 2), vec![0.4, 1.0, 1.0]);
        let e = even_edges(0.6, 1.4, 4);
        assert!(e.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn slices_follow_center_order() {
        let frames: BTreeMap<usize, Rect> = [
            (0, Rect::new(700.0, 0.0, 10.0, 10.0)),
            (1, Rect::new(100.0, 0.0, 10.0, 10.0)),
        ]
        .into_iter()
        .collect();
        let out = even_slices(&[0, 1], &frames, Rect::new(0.0, 0.0, 1000.0, 1.0));
        assert_eq!(out[&1], Rect::new(0.0, 0.0, 500.0, 1.0));
        assert_eq!(out[&0], Rect::new(500.0, 0.0, 500.0, 1.0));
    }
}
