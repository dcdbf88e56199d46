//! Shape descriptors placed on the workspace.
//!
//! The material of an object is a parameter ([`Role`]) while its outline is a
//! variant ([`Geometry`]): a conductor ring and a dielectric ring differ only
//! in their role, and changing a shape's electrical properties never means
//! building a different type. Rasterization dispatches on the geometry
//! variant by `match`.
//!
//! A [`Shape`] is a plain value. Adding it to a workspace takes a one-time
//! snapshot of its parameters; mutating the shape afterwards has no effect on
//! nodes already written.

mod clip;
mod raster;

pub use clip::clip_to_rect;
pub(crate) use raster::rasterize;

use crate::geom::{Point, Size};

/// The electrical role a shape plays in the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// An ideal conductor clamped to a fixed voltage.
    Conductor { voltage: f64 },
    /// A dielectric region contributing additively to relative permittivity.
    Dielectric { epsilon_r: f64 },
    /// A charge sheet contributing additively to fixed charge density.
    ChargeSheet { rho: f64 },
}

/// The outline of a shape in real-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A single point, touching exactly the nearest grid node.
    Point { center: Point },
    /// A straight segment, always one node wide. Clipped to the workspace
    /// rectangle before rasterizing.
    Line { start: Point, end: Point },
    /// A circle; hollow gives a one-node-thick ring.
    Circle { center: Point, radius: f64 },
    /// An axis-aligned box; hollow gives a one-node-thick perimeter.
    Rectangle { center: Point, size: Size },
}

/// A shape descriptor: role, outline, and whether the interior is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub role: Role,
    pub geometry: Geometry,
    pub solid: bool,
}

impl Shape {
    /// Create a solid shape with the given role and geometry.
    pub fn new(role: Role, geometry: Geometry) -> Self {
        Self {
            role,
            geometry,
            solid: true,
        }
    }

    /// Create a solid conductor at the given voltage.
    pub fn conductor(voltage: f64, geometry: Geometry) -> Self {
        Self::new(Role::Conductor { voltage }, geometry)
    }

    /// Create a solid dielectric with the given relative permittivity.
    pub fn dielectric(epsilon_r: f64, geometry: Geometry) -> Self {
        Self::new(Role::Dielectric { epsilon_r }, geometry)
    }

    /// Create a solid charge sheet with the given charge density.
    pub fn charge_sheet(rho: f64, geometry: Geometry) -> Self {
        Self::new(Role::ChargeSheet { rho }, geometry)
    }

    /// Make the shape a one-node-thick shell.
    pub fn make_hollow(&mut self) {
        self.solid = false;
    }

    /// Make the shape filled throughout its boundary.
    pub fn make_solid(&mut self) {
        self.solid = true;
    }

    /// The shape's reference point: the center for points, circles, and
    /// rectangles, and the start endpoint for lines.
    pub fn center(&self) -> Point {
        match self.geometry {
            Geometry::Point { center } => center,
            Geometry::Line { start, .. } => start,
            Geometry::Circle { center, .. } => center,
            Geometry::Rectangle { center, .. } => center,
        }
    }

    /// Move the shape so its reference point lands on `loc`. For a line,
    /// both endpoints translate together.
    pub fn move_to(&mut self, loc: Point) {
        let cur = self.center();
        self.move_by(loc.x - cur.x, loc.y - cur.y);
    }

    /// Translate the shape by the given offsets.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        match &mut self.geometry {
            Geometry::Point { center } => {
                center.x += dx;
                center.y += dy;
            }
            Geometry::Line { start, end } => {
                start.x += dx;
                start.y += dy;
                end.x += dx;
                end.y += dy;
            }
            Geometry::Circle { center, .. } => {
                center.x += dx;
                center.y += dy;
            }
            Geometry::Rectangle { center, .. } => {
                center.x += dx;
                center.y += dy;
            }
        }
    }
}
