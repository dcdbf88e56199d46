//! # Potentials Core
//!
//! A 2D electrostatic potential and field solver for sketched arrangements
//! of conductors, dielectrics, and charge sheets.
//!
//! This library provides:
//! - Masked property grids that distinguish "unset" from "zero"
//! - Rasterization of geometric shapes (points, lines, circles, rectangles)
//!   onto a finite-difference grid, with Cohen–Sutherland line clipping
//! - An iterative Gauss–Seidel relaxation solver for the
//!   variable-coefficient Poisson equation
//! - Electric field magnitude and direction derived from the solved
//!   potential
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geom`] - Real-space points, sizes, and rectangles
//! - [`masked`] - The masked value grid underlying every property
//! - [`workspace`] - Grid geometry, property storage, and coordinate mapping
//! - [`shapes`] - Shape descriptors and their rasterization
//! - [`solver`] - The relaxation engine
//!
//! ## Usage
//!
//! ```
//! use potentials_core::{Geometry, Point, Rect, Shape, Workspace};
//!
//! let mut ws = Workspace::new(Rect::new(0.0, 0.0, 10.0, 10.0), 33, 33)?;
//! ws.add_shape(&Shape::conductor(
//!     5.0,
//!     Geometry::Line {
//!         start: Point::new(0.0, 10.0),
//!         end: Point::new(10.0, 10.0),
//!     },
//! ))?;
//! ws.add_shape(&Shape::conductor(
//!     -5.0,
//!     Geometry::Line {
//!         start: Point::new(0.0, 0.0),
//!         end: Point::new(10.0, 0.0),
//!     },
//! ))?;
//! let report = ws.solve()?;
//! println!("{} sweeps, residual {:.2e}", report.iterations, report.residual);
//! let v = ws.voltage_at_point(Point::new(5.0, 5.0));
//! # assert!(v.is_some());
//! # Ok::<(), potentials_core::PotentialsError>(())
//! ```
//!
//! ## Simulation Method
//!
//! The workspace lays a uniform `rows x cols` node grid over a real-space
//! rectangle. Shapes write node properties in insertion order: conductors
//! clamp nodes to a fixed voltage (last writer wins), dielectrics and charge
//! sheets accumulate. The solver relaxes the finite-difference form of
//! `div(eps_r * grad V) = -rho / eps_0` with Gauss–Seidel sweeps until the
//! maximum nodal change drops below tolerance, then the field `E = -grad V`
//! is derived per node. Non-convergence at the iteration cap is a reported
//! status, not an error; best-effort results remain available.

pub mod error;
mod field;
pub mod geom;
pub mod masked;
pub mod shapes;
pub mod solver;
pub mod workspace;

// Re-export main types for convenience
pub use error::{PotentialsError, Result};
pub use geom::{Point, Rect, Size};
pub use masked::MaskedGrid;
pub use shapes::{Geometry, Role, Shape};
pub use solver::{Relaxation, SolveReport, SolveStatus, SolverConfig};
pub use workspace::Workspace;

/// Permittivity of free space in F/m.
pub const EPSILON_ZERO: f64 = 8.854187817e-12;
