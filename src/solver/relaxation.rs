//! Gauss–Seidel relaxation over a snapshot of the workspace inputs.

use crate::error::{PotentialsError, Result};
use crate::workspace::Workspace;
use crate::EPSILON_ZERO;

use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// Configuration for the relaxation solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of full Gauss–Seidel sweeps.
    pub max_iterations: usize,
    /// Convergence tolerance on the maximum nodal voltage change per sweep
    /// (volts).
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance (in volts).
    ///
    /// Tighter tolerance means more sweeps. 1e-6 (the default) is precise
    /// for typical sketch-scale voltages; 1e-3 converges quickly when only a
    /// qualitative picture is needed.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// How a relaxation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The residual dropped below the tolerance.
    Solved,
    /// The iteration cap was reached first. Results are best-effort but
    /// present for every node.
    NotConverged,
}

/// Summary of a finished relaxation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub status: SolveStatus,
    /// Number of sweeps performed.
    pub iterations: usize,
    /// Maximum nodal voltage change of the final sweep.
    pub residual: f64,
}

/// A steppable relaxation run.
///
/// Construction snapshots the workspace inputs into dense buffers; later
/// changes to the workspace do not affect a run in progress. Callers either
/// drive it to completion with [`run`](Relaxation::run) or call
/// [`step`](Relaxation::step) a sweep at a time, polling
/// [`iteration`](Relaxation::iteration) and [`residual`](Relaxation::residual)
/// for progress reporting. There is no cancellation primitive; to abort,
/// simply stop stepping.
#[derive(Debug)]
pub struct Relaxation {
    config: SolverConfig,
    rows: usize,
    cols: usize,
    inv_dx2: f64,
    inv_dy2: f64,
    /// Current potential estimate, row-major.
    voltage: Vec<f64>,
    /// Conductor clamp mask; clamped nodes never relax.
    clamped: Vec<bool>,
    /// Relative permittivity per node (1.0 where unset).
    eps: Vec<f64>,
    /// Charge source term rho / eps_0 per node.
    source: Vec<f64>,
    iteration: usize,
    residual: f64,
}

impl Relaxation {
    /// Snapshot the workspace inputs and prepare a run.
    pub fn new(ws: &Workspace, config: SolverConfig) -> Result<Self> {
        if config.max_iterations == 0 {
            return Err(PotentialsError::invalid_solver_param(
                "max_iterations must be at least 1",
            ));
        }
        if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
            return Err(PotentialsError::invalid_solver_param(format!(
                "tolerance {} must be positive and finite",
                config.tolerance
            )));
        }

        let rows = ws.rows();
        let cols = ws.cols();
        let n = rows * cols;
        let mut voltage = vec![0.0; n];
        let mut clamped = vec![false; n];
        let mut eps = vec![0.0; n];
        let mut source = vec![0.0; n];
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                eps[i] = ws.epsilon_r_at(r, c);
                source[i] = ws.rho_at(r, c) / EPSILON_ZERO;
                if let Some(v) = ws.fixed_voltage_at(r, c) {
                    voltage[i] = v;
                    clamped[i] = true;
                }
                // Free boundary nodes stay at their initial 0 V Dirichlet
                // value because the sweep only visits interior nodes.
            }
        }

        Ok(Self {
            config,
            rows,
            cols,
            inv_dx2: 1.0 / (ws.delta_x() * ws.delta_x()),
            inv_dy2: 1.0 / (ws.delta_y() * ws.delta_y()),
            voltage,
            clamped,
            eps,
            source,
            iteration: 0,
            residual: f64::INFINITY,
        })
    }

    /// Number of sweeps performed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Maximum nodal voltage change of the most recent sweep, or infinity
    /// before the first sweep.
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Whether the run has met its tolerance.
    pub fn converged(&self) -> bool {
        self.iteration > 0 && self.residual < self.config.tolerance
    }

    /// The current potential estimate, row-major.
    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    /// Perform one full Gauss–Seidel sweep in row-major order and return the
    /// maximum nodal voltage change.
    pub fn step(&mut self) -> f64 {
        let cols = self.cols;
        let mut max_delta = 0.0f64;

        for r in 1..self.rows - 1 {
            for c in 1..cols - 1 {
                let i = r * cols + c;
                if self.clamped[i] {
                    continue;
                }

                // Face coefficients: arithmetic mean of the permittivity of
                // the two nodes sharing each face.
                let e = self.eps[i];
                let a_east = 0.5 * (e + self.eps[i + 1]);
                let a_west = 0.5 * (e + self.eps[i - 1]);
                let a_north = 0.5 * (e + self.eps[i + cols]);
                let a_south = 0.5 * (e + self.eps[i - cols]);

                let numerator = (a_east * self.voltage[i + 1] + a_west * self.voltage[i - 1])
                    * self.inv_dx2
                    + (a_north * self.voltage[i + cols] + a_south * self.voltage[i - cols])
                        * self.inv_dy2
                    + self.source[i];
                let denominator =
                    (a_east + a_west) * self.inv_dx2 + (a_north + a_south) * self.inv_dy2;

                let updated = numerator / denominator;
                let delta = (updated - self.voltage[i]).abs();
                if delta > max_delta {
                    max_delta = delta;
                }
                self.voltage[i] = updated;
            }
        }

        self.iteration += 1;
        self.residual = max_delta;
        max_delta
    }

    /// Sweep until convergence or the iteration cap and report the outcome.
    pub fn run(&mut self) -> SolveReport {
        while self.iteration < self.config.max_iterations {
            self.step();
            if self.converged() {
                break;
            }
        }
        SolveReport {
            status: if self.converged() {
                SolveStatus::Solved
            } else {
                SolveStatus::NotConverged
            },
            iterations: self.iteration,
            residual: self.residual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point, Rect, Size};
    use crate::shapes::{Geometry, Shape};
    use approx::assert_abs_diff_eq;

    fn plate_workspace() -> Workspace {
        // Two full-width conductor plates on the top and bottom edges.
        let mut ws = Workspace::new(Rect::new(0.0, 0.0, 10.0, 10.0), 11, 11).unwrap();
        ws.add_shape(&Shape::conductor(
            -5.0,
            Geometry::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(10.0, 0.0),
            },
        ))
        .unwrap();
        ws.add_shape(&Shape::conductor(
            5.0,
            Geometry::Line {
                start: Point::new(0.0, 10.0),
                end: Point::new(10.0, 10.0),
            },
        ))
        .unwrap();
        ws
    }

    #[test]
    fn test_config_validation() {
        let ws = plate_workspace();
        assert!(Relaxation::new(&ws, SolverConfig::new().with_max_iterations(0)).is_err());
        assert!(Relaxation::new(&ws, SolverConfig::new().with_tolerance(0.0)).is_err());
        assert!(Relaxation::new(&ws, SolverConfig::new().with_tolerance(f64::NAN)).is_err());
    }

    #[test]
    fn test_parallel_plates_linear_profile() {
        let mut ws = plate_workspace();
        let report = ws.solve().unwrap();
        assert_eq!(report.status, SolveStatus::Solved);

        // Closed-form 1-D solution: V varies linearly from -5 at y=0 to +5
        // at y=10. Interior columns only; the side boundaries are held at
        // 0 V and pull the profile near the edges.
        for r in 0..11 {
            let expected = -5.0 + r as f64;
            let got = ws.voltage_at(r, 5).unwrap();
            assert_abs_diff_eq!(got, expected, epsilon = 0.4);
        }
        // The plates themselves are exact.
        assert_eq!(ws.voltage_at(0, 5), Some(-5.0));
        assert_eq!(ws.voltage_at(10, 5), Some(5.0));
    }

    #[test]
    fn test_conductor_dominance_either_order() {
        let geom = Geometry::Point {
            center: Point::new(5.0, 5.0),
        };
        for conductor_first in [true, false] {
            let mut ws = Workspace::new(Rect::new(0.0, 0.0, 10.0, 10.0), 11, 11).unwrap();
            let conductor = Shape::conductor(3.0, geom);
            let dielectric = Shape::dielectric(10.0, geom);
            if conductor_first {
                ws.add_shape(&conductor).unwrap();
                ws.add_shape(&dielectric).unwrap();
            } else {
                ws.add_shape(&dielectric).unwrap();
                ws.add_shape(&conductor).unwrap();
            }
            ws.solve().unwrap();
            assert_eq!(ws.voltage_at(5, 5), Some(3.0));
        }
    }

    #[test]
    fn test_iteration_cap_reports_not_converged() {
        let mut ws = plate_workspace();
        let report = ws
            .solve_with(SolverConfig::new().with_max_iterations(3))
            .unwrap();
        assert_eq!(report.status, SolveStatus::NotConverged);
        assert_eq!(report.iterations, 3);
        assert!(report.residual.is_finite());
        // Best-effort results are still present for every node.
        assert!(ws.voltage_at(5, 5).is_some());
    }

    #[test]
    fn test_solve_is_idempotent() {
        let mut ws = plate_workspace();
        ws.add_shape(&Shape::dielectric(
            4.0,
            Geometry::Circle {
                center: Point::new(5.0, 5.0),
                radius: 2.0,
            },
        ))
        .unwrap();
        ws.solve().unwrap();
        let first: Vec<f64> = (0..11)
            .flat_map(|r| (0..11).map(move |c| (r, c)))
            .map(|(r, c)| ws.voltage_at(r, c).unwrap())
            .collect();
        let first_mag: Vec<f64> = (0..11)
            .flat_map(|r| (0..11).map(move |c| (r, c)))
            .map(|(r, c)| ws.field_magnitude_at(r, c).unwrap())
            .collect();
        let first_dir: Vec<f64> = (0..11)
            .flat_map(|r| (0..11).map(move |c| (r, c)))
            .map(|(r, c)| ws.field_direction_at(r, c).unwrap())
            .collect();

        ws.solve().unwrap();
        for (i, (r, c)) in (0..11)
            .flat_map(|r| (0..11).map(move |c| (r, c)))
            .enumerate()
        {
            assert_eq!(ws.voltage_at(r, c).unwrap().to_bits(), first[i].to_bits());
            assert_eq!(
                ws.field_magnitude_at(r, c).unwrap().to_bits(),
                first_mag[i].to_bits()
            );
            assert_eq!(
                ws.field_direction_at(r, c).unwrap().to_bits(),
                first_dir[i].to_bits()
            );
        }
    }

    #[test]
    fn test_charge_sheet_raises_local_potential() {
        let mut ws = Workspace::new(Rect::new(0.0, 0.0, 10.0, 10.0), 11, 11).unwrap();
        ws.add_shape(&Shape::charge_sheet(
            1e-10,
            Geometry::Point {
                center: Point::new(5.0, 5.0),
            },
        ))
        .unwrap();
        ws.solve().unwrap();
        // Positive charge with grounded boundaries: potential peaks at the
        // sheet and decays outward.
        let center = ws.voltage_at(5, 5).unwrap();
        assert!(center > 0.0);
        assert!(center > ws.voltage_at(5, 8).unwrap());
        assert!(ws.voltage_at(5, 8).unwrap() > 0.0);
    }

    #[test]
    fn test_steppable_progress_polling() {
        let ws = plate_workspace();
        let mut relax = Relaxation::new(&ws, SolverConfig::default()).unwrap();
        assert_eq!(relax.iteration(), 0);
        assert!(relax.residual().is_infinite());
        let r1 = relax.step();
        assert_eq!(relax.iteration(), 1);
        assert_eq!(relax.residual(), r1);
        let r2 = relax.step();
        assert!(r2 <= r1);
        assert!(!relax.converged());
    }

    #[test]
    fn test_dielectric_shifts_profile() {
        // A dielectric slab in the lower half pulls the midplane potential
        // toward the lower plate's value.
        let mut uniform = plate_workspace();
        uniform.solve().unwrap();
        let mut slab = plate_workspace();
        slab.add_shape(&Shape::dielectric(
            9.0,
            Geometry::Rectangle {
                center: Point::new(5.0, 2.5),
                size: Size::new(10.0, 5.0),
            },
        ))
        .unwrap();
        slab.solve().unwrap();
        // More of the voltage drop moves into the vacuum (upper) half, so
        // the midplane potential sits below the uniform case.
        assert!(slab.voltage_at(5, 5).unwrap() < uniform.voltage_at(5, 5).unwrap());
    }
}
