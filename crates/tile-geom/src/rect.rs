//! Rectangle algebra shared by the partitioner, planner and reconciler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Absolute tolerance comparison.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Length of the overlap between `[a1, a2]` and `[b1, b2]`, zero when disjoint.
#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    let l = a1.max(b1);
    let r = a2.min(b2);
    (r - l).max(0.0)
}

/// A split or measurement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis; splitting on it yields left and right halves.
    X,
    /// Vertical axis; splitting on it yields lower and upper halves.
    Y,
}

/// A point in whichever coordinate space the caller is working in.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// A width/height pair.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Size {
    /// Construct a size.
    #[must_use]
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x{:.1}", self.w, self.h)
    }
}

/// Axis-aligned rectangle with an origin and a size.
///
/// A rectangle with negative width or height is legal input; call
/// [`Rect::standardized`] to normalize it before doing edge arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle spanning the given edges. Reversed edges are
    /// swapped so the result always has a non-negative size.
    #[must_use]
    pub fn from_edges(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Construct from a separate origin and size.
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    /// Origin point.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Size component.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Smallest x edge.
    #[inline]
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.x.min(self.x + self.w)
    }

    /// Largest x edge.
    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x.max(self.x + self.w)
    }

    /// Smallest y edge.
    #[inline]
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.y.min(self.y + self.h)
    }

    /// Largest y edge.
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y.max(self.y + self.h)
    }

    /// Horizontal center.
    #[inline]
    #[must_use]
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Vertical center.
    #[inline]
    #[must_use]
    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.cx(), self.cy())
    }

    /// Lower edge along `axis`.
    #[must_use]
    pub fn min_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min_x(),
            Axis::Y => self.min_y(),
        }
    }

    /// Upper edge along `axis`.
    #[must_use]
    pub fn max_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max_x(),
            Axis::Y => self.max_y(),
        }
    }

    /// Center coordinate along `axis`.
    #[must_use]
    pub fn center_along(&self, axis: Axis) -> f64 {
        (self.min_along(axis) + self.max_along(axis)) / 2.0
    }

    /// Extent along `axis`.
    #[must_use]
    pub fn extent_along(&self, axis: Axis) -> f64 {
        self.max_along(axis) - self.min_along(axis)
    }

    /// Split at `coord` along `axis`, returning the lower and upper halves.
    /// The coordinate is not clamped; callers keep it inside the rectangle.
    #[must_use]
    pub fn split_at(&self, axis: Axis, coord: f64) -> (Self, Self) {
        match axis {
            Axis::X => (
                Self::from_edges(self.min_x(), self.min_y(), coord, self.max_y()),
                Self::from_edges(coord, self.min_y(), self.max_x(), self.max_y()),
            ),
            Axis::Y => (
                Self::from_edges(self.min_x(), self.min_y(), self.max_x(), coord),
                Self::from_edges(self.min_x(), coord, self.max_x(), self.max_y()),
            ),
        }
    }

    /// Same rectangle with a non-negative width and height.
    #[must_use]
    pub fn standardized(&self) -> Self {
        Self::from_edges(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    /// True when the width or height is not positive. Negative and non-finite
    /// sizes count as empty; standardize first to measure a flipped rectangle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Area of the standardized rectangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        let s = self.standardized();
        s.w * s.h
    }

    /// Overlapping region of two rectangles, or `None` when they share no area.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min_x = self.min_x().max(other.min_x());
        let max_x = self.max_x().min(other.max_x());
        let min_y = self.min_y().max(other.min_y());
        let max_y = self.max_y().min(other.max_y());
        if max_x > min_x && max_y > min_y {
            Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
        } else {
            None
        }
    }

    /// Area shared with `other`.
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        overlap_1d(self.min_x(), self.max_x(), other.min_x(), other.max_x())
            * overlap_1d(self.min_y(), self.max_y(), other.min_y(), other.max_y())
    }

    /// Inclusive point containment test.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// True when every edge of `other` lies within `eps` of the matching edge.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        approx_eq(self.min_x(), other.min_x(), eps)
            && approx_eq(self.max_x(), other.max_x(), eps)
            && approx_eq(self.min_y(), other.min_y(), eps)
            && approx_eq(self.max_y(), other.max_y(), eps)
    }

    /// Largest absolute difference between matching edges.
    #[must_use]
    pub fn max_edge_delta(&self, other: &Self) -> f64 {
        (self.min_x() - other.min_x())
            .abs()
            .max((self.max_x() - other.max_x()).abs())
            .max((self.min_y() - other.min_y()).abs())
            .max((self.max_y() - other.max_y()).abs())
    }

    /// Round every edge to the nearest integer, so adjacent rectangles that
    /// share an edge keep sharing it.
    #[must_use]
    pub fn round(&self) -> Self {
        Self::from_edges(
            self.min_x().round(),
            self.min_y().round(),
            self.max_x().round(),
            self.max_y().round(),
        )
    }

    /// Shrink by `pad` on every side. Returns `None` when nothing would remain.
    #[must_use]
    pub fn inset(&self, pad: f64) -> Option<Self> {
        let s = self.standardized();
        let r = Self::new(s.x + pad, s.y + pad, s.w - 2.0 * pad, s.h - 2.0 * pad);
        if r.is_empty() { None } else { Some(r) }
    }

    /// Same size, new origin.
    #[must_use]
    pub const fn with_origin(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.w, self.h)
    }

    /// Same origin, new size.
    #[must_use]
    pub const fn with_size(&self, size: Size) -> Self {
        Self::new(self.x, self.y, size.w, size.h)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}) {:.1}x{:.1}",
            self.x, self.y, self.w, self.h
        )
    }
}
