//! Whole-layout pixel-grid snapping.
//!
//! Regions are rounded through a shared boundary list per axis rather than
//! one at a time, so two regions that meet at an edge always land on the
//! same integer after snapping.

use std::collections::BTreeMap;

use tile_geom::Rect;

use super::TOLERANCE;

/// Snap every owner region's edges onto a shared integer grid inside `bounds`.
pub(super) fn snap_to_grid(
    owners: &BTreeMap<usize, Rect>,
    bounds: Rect,
) -> BTreeMap<usize, Rect> {
    if owners.is_empty() {
        return BTreeMap::new();
    }

    let xs = unique_sorted(
        [bounds.min_x(), bounds.max_x()]
            .into_iter()
            .chain(owners.values().flat_map(|r| [r.min_x(), r.max_x()])),
    );
    let ys = unique_sorted(
        [bounds.min_y(), bounds.max_y()]
            .into_iter()
            .chain(owners.values().flat_map(|r| [r.min_y(), r.max_y()])),
    );
    let snapped_x = snap_boundaries(&xs, bounds.min_x(), bounds.max_x());
    let snapped_y = snap_boundaries(&ys, bounds.min_y(), bounds.max_y());

    owners
        .iter()
        .map(|(owner, r)| {
            let min_x = snapped_x[nearest_index(r.min_x(), &xs)];
            let max_x = snapped_x[nearest_index(r.max_x(), &xs)];
            let min_y = snapped_y[nearest_index(r.min_y(), &ys)];
            let max_y = snapped_y[nearest_index(r.max_y(), &ys)];
            let rect = Rect::new(
                min_x.min(max_x),
                min_y.min(max_y),
                (max_x - min_x).max(0.0),
                (max_y - min_y).max(0.0),
            );
            (*owner, rect.standardized())
        })
        .collect()
}

/// Sort and drop values within tolerance of the last kept value.
pub(super) fn unique_sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    sorted.sort_by(f64::total_cmp);
    let mut unique: Vec<f64> = Vec::with_capacity(sorted.len());
    for v in sorted {
        match unique.last() {
            Some(last) if (last - v).abs() <= TOLERANCE => {}
            _ => unique.push(v),
        }
    }
    unique
}

/// Pin the ends to the bounds, round the interior, then force the sequence
/// monotonic with a forward pass followed by a backward pass. The output has
/// the same length as the input so boundary indices stay valid.
pub(super) fn snap_boundaries(boundaries: &[f64], lower: f64, upper: f64) -> Vec<f64> {
    if boundaries.len() < 2 {
        return boundaries.to_vec();
    }
    let last = boundaries.len() - 1;
    let mut snapped = boundaries.to_vec();
    snapped[0] = lower;
    snapped[last] = upper;

    for i in 1..last {
        snapped[i] = boundaries[i].round().max(snapped[i - 1]).min(upper);
    }
    for i in 1..snapped.len() {
        if snapped[i] < snapped[i - 1] {
            snapped[i] = snapped[i - 1];
        }
    }
    for i in (0..last).rev() {
        if snapped[i] > snapped[i + 1] {
            snapped[i] = snapped[i + 1];
        }
    }

    snapped[0] = lower;
    snapped[last] = upper;
    snapped
}

/// Index of the boundary closest to `value`; the first wins on ties.
fn nearest_index(value: f64, boundaries: &[f64]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::MAX;
    for (i, b) in boundaries.iter().enumerate() {
        let d = (b - value).abs();
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_duplicates_collapse() {
        assert_eq!(
            unique_sorted([10.0, 0.0, 10.4, 20.0, 9.8]),
            vec![0.0, 9.8, 10.4, 20.0]
        );
    }

    #[test]
    fn boundaries_pin_round_and_stay_monotonic() {
        let b = [0.2, 33.4, 66.6, 99.7];
        assert_eq!(snap_boundaries(&b, 0.0, 100.0), vec![0.0, 33.0, 67.0, 100.0]);
    }

    #[test]
    fn interior_never_exceeds_upper_bound() {
        // 9.6 rounds to 10, past the pinned upper bound.
        let b = [0.0, 9.6, 9.7];
        assert_eq!(snap_boundaries(&b, 0.0, 9.5), vec![0.0, 9.5, 9.5]);
    }

    #[test]
    fn neighbours_share_snapped_edge() {
        let owners: BTreeMap<usize, Rect> = [
            (0, Rect::new(0.0, 0.0, 333.4, 100.0)),
            (1, Rect::new(333.4, 0.0, 666.6, 100.0)),
        ]
        .into_iter()
        .collect();
        let out = snap_to_grid(&owners, Rect::new(0.0, 0.0, 1000.0, 100.0));
        assert_eq!(out[&0].max_x(), 333.0);
        assert_eq!(out[&1].min_x(), 333.0);
        assert_eq!(out[&1].max_x(), 1000.0);
    }
}
