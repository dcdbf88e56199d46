//! Relaxation solver for the variable-coefficient Poisson equation.
//!
//! The electrostatic potential over the workspace satisfies
//!
//! ```text
//! div( eps_r * grad V ) = -rho / eps_0
//! ```
//!
//! discretized on the uniform grid with a five-point stencil whose face
//! coefficients are the arithmetic mean of the relative permittivity of the
//! two adjacent nodes. The system is relaxed with Gauss–Seidel sweeps in
//! fixed row-major order:
//!
//! - conductor-dominant nodes stay clamped to their fixed voltage,
//! - domain-boundary nodes not claimed by a conductor are 0 V Dirichlet,
//! - every other node is updated in place from its four neighbors.
//!
//! A sweep's maximum nodal change is the residual; iteration stops when it
//! drops below the tolerance or the iteration cap is reached. The cap is not
//! an error: the run reports [`SolveStatus::NotConverged`] and the voltages
//! computed so far are still usable. The sweep order is deterministic, so a
//! given configuration reproduces bit-identical results.

mod relaxation;

pub use relaxation::{Relaxation, SolveReport, SolveStatus, SolverConfig};

/// Default convergence tolerance: maximum nodal voltage change per sweep.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default maximum number of Gauss–Seidel sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
