#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A point in container-local pixels (origin at the container's top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset of `self` relative to `origin` as `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        let (dx, dy) = self.delta_from(other);
        (dx * dx + dy * dy).sqrt()
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in container-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Geometric center.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Same size, moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Same size, top-left corner placed at `origin`.
    #[inline]
    #[must_use]
    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }
}
