//! Rasterization of shape descriptors onto the workspace property grids.
//!
//! Each geometry variant is converted to the set of grid nodes it touches,
//! then the shape's role is applied to every touched node: conductors
//! overwrite the fixed voltage (marking the node conductor-dominant for the
//! solver), dielectrics and charge sheets accumulate. The node set is
//! collected before any write, so a rejected shape leaves the grids
//! untouched.

use crate::error::{PotentialsError, Result};
use crate::geom::{Point, Rect};
use crate::shapes::{clip_to_rect, Geometry, Role, Shape};
use crate::workspace::Workspace;

/// Rasterize `shape` onto `ws`.
///
/// A shape lying entirely outside the workspace rectangle touches zero
/// nodes, which is not an error. Invalid shape parameters (non-finite
/// coordinates, non-positive radius or size) are.
pub(crate) fn rasterize(shape: &Shape, ws: &mut Workspace) -> Result<()> {
    validate(shape)?;
    let nodes = touched_nodes(shape, ws);
    apply(shape.role, &nodes, ws);
    Ok(())
}

fn validate(shape: &Shape) -> Result<()> {
    match shape.geometry {
        Geometry::Point { center } => {
            if !center.is_finite() {
                return Err(PotentialsError::invalid_shape("point center is not finite"));
            }
        }
        Geometry::Line { start, end } => {
            if !start.is_finite() || !end.is_finite() {
                return Err(PotentialsError::invalid_shape("line endpoint is not finite"));
            }
        }
        Geometry::Circle { center, radius } => {
            if !center.is_finite() || !radius.is_finite() {
                return Err(PotentialsError::invalid_shape("circle is not finite"));
            }
            if radius <= 0.0 {
                return Err(PotentialsError::invalid_shape(format!(
                    "circle radius {radius} must be positive"
                )));
            }
        }
        Geometry::Rectangle { center, size } => {
            if !center.is_finite() || !size.width.is_finite() || !size.height.is_finite() {
                return Err(PotentialsError::invalid_shape("rectangle is not finite"));
            }
            if size.width <= 0.0 || size.height <= 0.0 {
                return Err(PotentialsError::invalid_shape(format!(
                    "rectangle size {}x{} must be positive",
                    size.width, size.height
                )));
            }
        }
    }
    Ok(())
}

fn touched_nodes(shape: &Shape, ws: &Workspace) -> Vec<(usize, usize)> {
    match shape.geometry {
        Geometry::Point { center } => ws.node_at(center).into_iter().collect(),
        Geometry::Line { start, end } => line_nodes(start, end, ws),
        Geometry::Circle { center, radius } => circle_nodes(center, radius, shape.solid, ws),
        Geometry::Rectangle { center, size } => {
            let bounds = Rect::new(
                center.x - size.width / 2.0,
                center.y - size.height / 2.0,
                size.width,
                size.height,
            );
            rectangle_nodes(&bounds, shape.solid, ws)
        }
    }
}

fn circle_nodes(center: Point, radius: f64, solid: bool, ws: &Workspace) -> Vec<(usize, usize)> {
    // A hollow circle keeps only nodes within half a grid spacing of the
    // radius; half of the larger spacing keeps the ring one node thick
    // without gaps on anisotropic grids.
    let ring_tolerance = 0.5 * ws.delta_x().max(ws.delta_y());
    let mut nodes = Vec::new();
    for r in 0..ws.rows() {
        for c in 0..ws.cols() {
            let d = ws.point_at(r, c).distance_to(center);
            let touched = if solid {
                d <= radius
            } else {
                (d - radius).abs() <= ring_tolerance
            };
            if touched {
                nodes.push((r, c));
            }
        }
    }
    nodes
}

fn rectangle_nodes(bounds: &Rect, solid: bool, ws: &Workspace) -> Vec<(usize, usize)> {
    // Index-space extent of the nodes inside the box.
    let mut row_range: Option<(usize, usize)> = None;
    let mut col_range: Option<(usize, usize)> = None;
    for r in 0..ws.rows() {
        let y = ws.y_for_row(r);
        if y >= bounds.min_y() && y <= bounds.max_y() {
            row_range = Some(match row_range {
                None => (r, r),
                Some((lo, _)) => (lo, r),
            });
        }
    }
    for c in 0..ws.cols() {
        let x = ws.x_for_col(c);
        if x >= bounds.min_x() && x <= bounds.max_x() {
            col_range = Some(match col_range {
                None => (c, c),
                Some((lo, _)) => (lo, c),
            });
        }
    }
    let (Some((r0, r1)), Some((c0, c1))) = (row_range, col_range) else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    for r in r0..=r1 {
        for c in c0..=c1 {
            let on_perimeter = r == r0 || r == r1 || c == c0 || c == c1;
            if solid || on_perimeter {
                nodes.push((r, c));
            }
        }
    }
    nodes
}

fn line_nodes(start: Point, end: Point, ws: &Workspace) -> Vec<(usize, usize)> {
    // Clip to the workspace rectangle first; an entirely outside segment
    // touches nothing.
    let Some((p0, p1)) = clip_to_rect(start, end, &ws.rect()) else {
        return Vec::new();
    };
    // Clipped endpoints are inside the rectangle, so they always map.
    let (Some((r0, c0)), Some((r1, c1))) = (ws.node_at(p0), ws.node_at(p1)) else {
        return Vec::new();
    };

    // Walk the segment in node space, one step per node along the dominant
    // axis.
    let steps = (r1 as isize - r0 as isize)
        .abs()
        .max((c1 as isize - c0 as isize).abs()) as usize;
    if steps == 0 {
        return vec![(r0, c0)];
    }
    let mut nodes = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let r = (r0 as f64 + t * (r1 as f64 - r0 as f64)).round() as usize;
        let c = (c0 as f64 + t * (c1 as f64 - c0 as f64)).round() as usize;
        nodes.push((r, c));
    }
    nodes
}

fn apply(role: Role, nodes: &[(usize, usize)], ws: &mut Workspace) {
    match role {
        Role::Conductor { voltage } => {
            for &(r, c) in nodes {
                ws.set_fixed_voltage(r, c, voltage);
            }
        }
        Role::Dielectric { epsilon_r } => {
            for &(r, c) in nodes {
                ws.add_epsilon_r(r, c, epsilon_r);
            }
        }
        Role::ChargeSheet { rho } => {
            for &(r, c) in nodes {
                ws.add_rho(r, c, rho);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size;

    fn ws_10x10() -> Workspace {
        Workspace::new(Rect::new(0.0, 0.0, 10.0, 10.0), 11, 11).unwrap()
    }

    fn conductor_nodes(ws: &Workspace) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 0..ws.rows() {
            for c in 0..ws.cols() {
                if ws.is_conductor(r, c) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    #[test]
    fn test_point_touches_nearest_node() {
        let mut ws = ws_10x10();
        let shape = Shape::conductor(
            2.0,
            Geometry::Point {
                center: Point::new(3.4, 6.6),
            },
        );
        ws.add_shape(&shape).unwrap();
        assert_eq!(conductor_nodes(&ws), vec![(7, 3)]);
        assert_eq!(ws.fixed_voltage_at(7, 3), Some(2.0));
    }

    #[test]
    fn test_point_outside_touches_nothing() {
        let mut ws = ws_10x10();
        let shape = Shape::conductor(
            2.0,
            Geometry::Point {
                center: Point::new(50.0, 50.0),
            },
        );
        ws.add_shape(&shape).unwrap();
        assert!(conductor_nodes(&ws).is_empty());
    }

    #[test]
    fn test_solid_circle_node_set() {
        let mut ws = ws_10x10();
        let shape = Shape::charge_sheet(
            1.0,
            Geometry::Circle {
                center: Point::new(5.0, 5.0),
                radius: 1.5,
            },
        );
        ws.add_shape(&shape).unwrap();
        // Radius 1.5 on a unit grid: the center plus the 4-neighborhood at
        // distance 1 and the diagonals at sqrt(2).
        assert_eq!(ws.rho_at(5, 5), 1.0);
        assert_eq!(ws.rho_at(5, 6), 1.0);
        assert_eq!(ws.rho_at(4, 4), 1.0);
        assert_eq!(ws.rho_at(5, 7), 0.0); // distance 2
        assert_eq!(ws.rho_at(3, 4), 0.0); // distance sqrt(5)
    }

    #[test]
    fn test_hollow_circle_is_one_node_ring() {
        let mut ws = ws_10x10();
        let mut shape = Shape::charge_sheet(
            1.0,
            Geometry::Circle {
                center: Point::new(5.0, 5.0),
                radius: 2.0,
            },
        );
        shape.make_hollow();
        ws.add_shape(&shape).unwrap();
        // Ring nodes at distance within 0.5 of 2.0; center stays empty.
        assert_eq!(ws.rho_at(5, 5), 0.0);
        assert_eq!(ws.rho_at(5, 6), 0.0); // distance 1
        assert_eq!(ws.rho_at(5, 7), 1.0); // distance 2
        assert_eq!(ws.rho_at(3, 5), 1.0); // distance 2
        assert_eq!(ws.rho_at(4, 4), 0.0); // distance sqrt(2) ~ 1.41
        assert_eq!(ws.rho_at(4, 7), 1.0); // distance sqrt(5) ~ 2.24
    }

    #[test]
    fn test_solid_rectangle() {
        let mut ws = ws_10x10();
        let shape = Shape::dielectric(
            4.0,
            Geometry::Rectangle {
                center: Point::new(5.0, 5.0),
                size: Size::new(4.0, 2.0),
            },
        );
        ws.add_shape(&shape).unwrap();
        // Box spans x in [3,7], y in [4,6]: 5 cols x 3 rows.
        let mut count = 0;
        for r in 0..ws.rows() {
            for c in 0..ws.cols() {
                if ws.epsilon_r().is_set(r, c) {
                    count += 1;
                    assert!((4..=6).contains(&r) && (3..=7).contains(&c));
                    assert_eq!(ws.epsilon_r_at(r, c), 4.0);
                }
            }
        }
        assert_eq!(count, 15);
    }

    #[test]
    fn test_hollow_rectangle_perimeter_only() {
        let mut ws = ws_10x10();
        let mut shape = Shape::dielectric(
            4.0,
            Geometry::Rectangle {
                center: Point::new(5.0, 5.0),
                size: Size::new(4.0, 4.0),
            },
        );
        shape.make_hollow();
        ws.add_shape(&shape).unwrap();
        // Box spans rows/cols 3..=7: the 5x5 block minus the 3x3 interior.
        let mut count = 0;
        for r in 0..ws.rows() {
            for c in 0..ws.cols() {
                if ws.epsilon_r().is_set(r, c) {
                    count += 1;
                }
            }
        }
        assert_eq!(count, 25 - 9);
        assert!(!ws.epsilon_r().is_set(5, 5));
        assert!(ws.epsilon_r().is_set(3, 5));
        assert!(ws.epsilon_r().is_set(7, 7));
    }

    #[test]
    fn test_line_fully_inside() {
        let mut ws = ws_10x10();
        let shape = Shape::conductor(
            1.0,
            Geometry::Line {
                start: Point::new(2.0, 3.0),
                end: Point::new(6.0, 3.0),
            },
        );
        ws.add_shape(&shape).unwrap();
        assert_eq!(
            conductor_nodes(&ws),
            vec![(3, 2), (3, 3), (3, 4), (3, 5), (3, 6)]
        );
    }

    #[test]
    fn test_line_fully_outside_touches_nothing() {
        let mut ws = ws_10x10();
        let shape = Shape::conductor(
            1.0,
            Geometry::Line {
                start: Point::new(-5.0, -5.0),
                end: Point::new(-1.0, -2.0),
            },
        );
        ws.add_shape(&shape).unwrap();
        assert!(conductor_nodes(&ws).is_empty());
    }

    #[test]
    fn test_line_clipped_to_inside_portion() {
        let mut ws = ws_10x10();
        let shape = Shape::conductor(
            1.0,
            Geometry::Line {
                start: Point::new(7.0, 5.0),
                end: Point::new(13.0, 5.0),
            },
        );
        ws.add_shape(&shape).unwrap();
        assert_eq!(conductor_nodes(&ws), vec![(5, 7), (5, 8), (5, 9), (5, 10)]);
    }

    #[test]
    fn test_diagonal_line_one_node_wide() {
        let mut ws = ws_10x10();
        let shape = Shape::conductor(
            1.0,
            Geometry::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(4.0, 4.0),
            },
        );
        ws.add_shape(&shape).unwrap();
        assert_eq!(conductor_nodes(&ws), vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
    }

    #[test]
    fn test_hollow_line_same_as_solid() {
        let mut solid_ws = ws_10x10();
        let mut hollow_ws = ws_10x10();
        let mut shape = Shape::conductor(
            1.0,
            Geometry::Line {
                start: Point::new(1.0, 1.0),
                end: Point::new(8.0, 4.0),
            },
        );
        solid_ws.add_shape(&shape).unwrap();
        shape.make_hollow();
        hollow_ws.add_shape(&shape).unwrap();
        assert_eq!(conductor_nodes(&solid_ws), conductor_nodes(&hollow_ws));
    }

    #[test]
    fn test_conductor_last_writer_wins() {
        let mut ws = ws_10x10();
        let p = Geometry::Point {
            center: Point::new(5.0, 5.0),
        };
        ws.add_shape(&Shape::conductor(3.0, p)).unwrap();
        ws.add_shape(&Shape::conductor(-8.0, p)).unwrap();
        assert_eq!(ws.fixed_voltage_at(5, 5), Some(-8.0));
    }

    #[test]
    fn test_overlapping_dielectrics_sum() {
        let mut ws = ws_10x10();
        let p = Geometry::Point {
            center: Point::new(5.0, 5.0),
        };
        ws.add_shape(&Shape::dielectric(3.0, p)).unwrap();
        ws.add_shape(&Shape::dielectric(2.5, p)).unwrap();
        assert!((ws.epsilon_r_at(5, 5) - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_shapes_rejected_without_writes() {
        let mut ws = ws_10x10();
        let bad_circle = Shape::conductor(
            1.0,
            Geometry::Circle {
                center: Point::new(5.0, 5.0),
                radius: -2.0,
            },
        );
        assert!(ws.add_shape(&bad_circle).is_err());
        let bad_rect = Shape::conductor(
            1.0,
            Geometry::Rectangle {
                center: Point::new(5.0, 5.0),
                size: Size::new(0.0, 2.0),
            },
        );
        assert!(ws.add_shape(&bad_rect).is_err());
        let bad_point = Shape::conductor(
            1.0,
            Geometry::Point {
                center: Point::new(f64::NAN, 0.0),
            },
        );
        assert!(ws.add_shape(&bad_point).is_err());
        assert!(conductor_nodes(&ws).is_empty());
    }
}
