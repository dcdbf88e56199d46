//! Simple real-space geometric primitives: points, sizes, rectangles.
//!
//! These are the value types callers use to describe shape geometry and the
//! workspace rectangle. They carry no grid knowledge; mapping to grid nodes
//! lives in [`Workspace`](crate::workspace::Workspace).

/// A point in real-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A width/height extent in real-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in real-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its origin coordinates and extent.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Smallest x coordinate covered by the rectangle.
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    /// Largest x coordinate covered by the rectangle.
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Smallest y coordinate covered by the rectangle.
    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    /// Largest y coordinate covered by the rectangle.
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }
}
