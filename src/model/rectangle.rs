//! Normalized, self-correcting axis-aligned rectangle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A corner of a [`Rectangle`] in normalized image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

fn clamp_unit(value: f64) -> f64 {
    // NaN would poison every min/max below.
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Axis-aligned box in normalized `[0, 1]` coordinates.
///
/// Every setter clamps to `[0, 1]`. The raw edges may be inverted while a drag
/// is in progress (e.g. the pointer moved left of the anchor), but the getters
/// always report `left <= right` and `top <= bottom`. Call [`validate`] once
/// the drag ends to fold the corrected orientation back into the raw edges.
///
/// [`validate`]: Rectangle::validate
#[derive(Clone, Copy, Default)]
pub struct Rectangle {
    raw_left: f64,
    raw_top: f64,
    raw_right: f64,
    raw_bottom: f64,
}

impl Rectangle {
    /// Create a rectangle from its four edges, clamped and validated.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let mut rect = Self::default();
        rect.set_left(left);
        rect.set_top(top);
        rect.set_right(right);
        rect.set_bottom(bottom);
        rect.validate();
        rect
    }

    /// Zero-sized rectangle anchored at a point.
    pub fn at_point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// Axis-aligned bounding box of a point set. `None` for an empty set.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }
        Some(Self::new(left, top, right, bottom))
    }

    pub fn left(&self) -> f64 {
        self.raw_left.min(self.raw_right)
    }

    pub fn top(&self) -> f64 {
        self.raw_top.min(self.raw_bottom)
    }

    pub fn right(&self) -> f64 {
        self.raw_left.max(self.raw_right)
    }

    pub fn bottom(&self) -> f64 {
        self.raw_top.max(self.raw_bottom)
    }

    pub fn set_left(&mut self, value: f64) {
        self.raw_left = clamp_unit(value);
    }

    pub fn set_top(&mut self, value: f64) {
        self.raw_top = clamp_unit(value);
    }

    pub fn set_right(&mut self, value: f64) {
        self.raw_right = clamp_unit(value);
    }

    pub fn set_bottom(&mut self, value: f64) {
        self.raw_bottom = clamp_unit(value);
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    pub fn center_x(&self) -> f64 {
        self.left() + self.width() / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top() + self.height() / 2.0
    }

    /// Whether the raw edges are currently inverted on either axis.
    pub fn is_inverted(&self) -> bool {
        self.raw_left > self.raw_right || self.raw_top > self.raw_bottom
    }

    /// Normalize the raw edges so they match the corrected getters.
    pub fn validate(&mut self) {
        let (l, t, r, b) = (self.left(), self.top(), self.right(), self.bottom());
        self.raw_left = l;
        self.raw_top = t;
        self.raw_right = r;
        self.raw_bottom = b;
    }

    /// Four corners, clockwise from top-left.
    pub fn to_points(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    /// Copy with each edge shifted by the given delta and clamped to `[0, 1]`.
    ///
    /// The result is not validated, so shrinking past zero size yields an
    /// inverted raw rectangle, exactly as an interactive drag would.
    pub fn offset_edges(&self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let mut out = *self;
        out.set_left(self.left() + left);
        out.set_top(self.top() + top);
        out.set_right(self.right() + right);
        out.set_bottom(self.bottom() + bottom);
        out
    }
}

/// Equality is by corrected edges, so an inverted rectangle equals its
/// validated counterpart.
impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        self.left() == other.left()
            && self.top() == other.top()
            && self.right() == other.right()
            && self.bottom() == other.bottom()
    }
}

impl fmt::Debug for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rectangle")
            .field("left", &self.left())
            .field("top", &self.top())
            .field("right", &self.right())
            .field("bottom", &self.bottom())
            .finish()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left: {}, top: {}, right: {}, bottom: {}",
            self.left(),
            self.top(),
            self.right(),
            self.bottom()
        )
    }
}
