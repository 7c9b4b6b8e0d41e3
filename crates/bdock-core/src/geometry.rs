#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are CSS pixels in the space of one document (origin at the
//! top-left of that document's viewport). Values are `f64` because
//! `getBoundingClientRect()` reports fractional pixels.

/// A point in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Translate by `offset`.
    #[inline]
    #[must_use]
    pub fn offset_by(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Translate by the negation of `offset`.
    #[inline]
    #[must_use]
    pub fn relative_to(self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A rectangle as reported by a bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Vertical midpoint.
    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// Edges follow the half-open convention: the left and top edges are
    /// inside, the right and bottom edges are not.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Translate by `offset`.
    #[inline]
    #[must_use]
    pub fn offset_by(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Absolute distance from `y` to the top edge.
    #[inline]
    pub fn distance_to_top(&self, y: f64) -> f64 {
        (y - self.top()).abs()
    }

    /// Absolute distance from `y` to the bottom edge.
    #[inline]
    pub fn distance_to_bottom(&self, y: f64) -> f64 {
        (y - self.bottom()).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 20.0, 10.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(29.9, 19.9)));
        assert!(!r.contains(Point::new(30.0, 15.0)));
        assert!(!r.contains(Point::new(15.0, 20.0)));
    }

    #[test]
    fn edge_distances() {
        let r = Rect::new(0.0, 100.0, 50.0, 40.0);
        assert_eq!(r.distance_to_top(98.0), 2.0);
        assert_eq!(r.distance_to_bottom(98.0), 42.0);
        assert_eq!(r.mid_y(), 120.0);
    }

    #[test]
    fn offset_and_relative_round_trip() {
        let p = Point::new(3.0, 4.0);
        let o = Point::new(100.0, 50.0);
        assert_eq!(p.offset_by(o).relative_to(o), p);
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }
}
