//! Cohen–Sutherland line clipping against the workspace rectangle.
//!
//! Each endpoint gets a 4-bit outcode describing which side(s) of the
//! rectangle it falls on. Both codes zero means the segment is entirely
//! inside; a shared set bit means it is entirely outside one boundary and is
//! rejected. Otherwise the segment is intersected with one violated boundary
//! at a time, replacing the outside endpoint, until one of the two terminal
//! conditions holds.

use crate::geom::{Point, Rect};

const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

fn outcode(p: Point, rect: &Rect) -> u8 {
    let mut code = INSIDE;
    if p.x < rect.min_x() {
        code |= LEFT;
    } else if p.x > rect.max_x() {
        code |= RIGHT;
    }
    if p.y < rect.min_y() {
        code |= BOTTOM;
    } else if p.y > rect.max_y() {
        code |= TOP;
    }
    code
}

/// Clip the segment `start`–`end` to `rect`.
///
/// Returns the clipped endpoints, or `None` if the segment lies entirely
/// outside the rectangle.
pub fn clip_to_rect(start: Point, end: Point, rect: &Rect) -> Option<(Point, Point)> {
    let mut p0 = start;
    let mut p1 = end;
    let mut code0 = outcode(p0, rect);
    let mut code1 = outcode(p1, rect);

    loop {
        if code0 | code1 == INSIDE {
            // Trivial accept: both endpoints inside.
            return Some((p0, p1));
        }
        if code0 & code1 != INSIDE {
            // Trivial reject: both endpoints outside the same boundary.
            return None;
        }

        // Pick an endpoint that is outside and intersect with one boundary
        // it violates.
        let out = if code0 != INSIDE { code0 } else { code1 };
        let p = if out & TOP != INSIDE {
            Point::new(
                p0.x + (p1.x - p0.x) * (rect.max_y() - p0.y) / (p1.y - p0.y),
                rect.max_y(),
            )
        } else if out & BOTTOM != INSIDE {
            Point::new(
                p0.x + (p1.x - p0.x) * (rect.min_y() - p0.y) / (p1.y - p0.y),
                rect.min_y(),
            )
        } else if out & RIGHT != INSIDE {
            Point::new(
                rect.max_x(),
                p0.y + (p1.y - p0.y) * (rect.max_x() - p0.x) / (p1.x - p0.x),
            )
        } else {
            Point::new(
                rect.min_x(),
                p0.y + (p1.y - p0.y) * (rect.min_x() - p0.x) / (p1.x - p0.x),
            )
        };

        if out == code0 {
            p0 = p;
            code0 = outcode(p0, rect);
        } else {
            p1 = p;
            code1 = outcode(p1, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_rect() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_fully_inside_unchanged() {
        let r = unit_rect();
        let (a, b) = clip_to_rect(Point::new(1.0, 1.0), Point::new(8.0, 9.0), &r).unwrap();
        assert_eq!(a, Point::new(1.0, 1.0));
        assert_eq!(b, Point::new(8.0, 9.0));
    }

    #[test]
    fn test_fully_outside_rejected() {
        let r = unit_rect();
        // Both endpoints left of the rectangle.
        assert!(clip_to_rect(Point::new(-5.0, 1.0), Point::new(-1.0, 9.0), &r).is_none());
        // Both above.
        assert!(clip_to_rect(Point::new(2.0, 12.0), Point::new(8.0, 11.0), &r).is_none());
    }

    #[test]
    fn test_diagonal_miss_rejected() {
        let r = unit_rect();
        // Crosses the corner region but never enters the rectangle.
        assert!(clip_to_rect(Point::new(-2.0, 9.5), Point::new(0.5, 12.0), &r).is_none());
    }

    #[test]
    fn test_one_endpoint_outside() {
        let r = unit_rect();
        let (a, b) = clip_to_rect(Point::new(5.0, 5.0), Point::new(15.0, 5.0), &r).unwrap();
        assert_eq!(a, Point::new(5.0, 5.0));
        assert!((b.x - 10.0).abs() < 1e-12);
        assert!((b.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_crossing_two_boundaries() {
        let r = unit_rect();
        let (a, b) = clip_to_rect(Point::new(-5.0, 5.0), Point::new(15.0, 5.0), &r).unwrap();
        assert!((a.x - 0.0).abs() < 1e-12);
        assert!((b.x - 10.0).abs() < 1e-12);
        assert!((a.y - 5.0).abs() < 1e-12);
        assert!((b.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_clip() {
        let r = unit_rect();
        // Line y = x shifted below: from (-2,-2) to (12,12) clips to the
        // rectangle diagonal.
        let (a, b) = clip_to_rect(Point::new(-2.0, -2.0), Point::new(12.0, 12.0), &r).unwrap();
        assert!((a.x - 0.0).abs() < 1e-12 && (a.y - 0.0).abs() < 1e-12);
        assert!((b.x - 10.0).abs() < 1e-12 && (b.y - 10.0).abs() < 1e-12);
    }
}
