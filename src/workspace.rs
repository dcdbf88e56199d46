//! The simulation workspace: grid geometry, property grids, and results.
//!
//! A [`Workspace`] owns everything a solve needs: the real-space rectangle,
//! the row/column grid laid over it, the three input property grids (fixed
//! charge density `rho`, relative permittivity `epsilon_r`, conductor
//! `fixed_voltage`), and after a solve the three output grids (resultant
//! voltage, field magnitude, field direction).
//!
//! Node `(r, c)` maps to the real point
//! `(origin.x + c * delta_x, origin.y + r * delta_y)`, so columns run along
//! the x-axis and rows along the y-axis.
//!
//! The workspace is exclusively owned: all mutation goes through `&mut self`
//! and there is no shared aliasing of the property grids. Independent
//! workspaces can be solved in parallel by independent callers.

use crate::error::{PotentialsError, Result};
use crate::field;
use crate::geom::{Point, Rect};
use crate::masked::MaskedGrid;
use crate::shapes::{self, Shape};
use crate::solver::{Relaxation, SolveReport, SolverConfig};
use tracing::warn;

/// Relative permittivity assumed at nodes no dielectric has touched.
pub const DEFAULT_EPSILON_R: f64 = 1.0;

/// A 2D finite-difference workspace for electrostatic simulation.
#[derive(Debug, Clone)]
pub struct Workspace {
    rows: usize,
    cols: usize,
    rect: Rect,
    // Input properties
    rho: MaskedGrid,
    epsilon_r: MaskedGrid,
    fixed_voltage: MaskedGrid,
    // Results (populated by solve)
    resultant_voltage: MaskedGrid,
    field_magnitude: MaskedGrid,
    field_direction: MaskedGrid,
}

impl Workspace {
    /// Create a workspace covering `rect` with a `rows` x `cols` node grid.
    ///
    /// Fails with [`PotentialsError::InvalidGrid`] when either count is
    /// below 2, or [`PotentialsError::InvalidRect`] when the rectangle's
    /// extent is not positive and finite.
    pub fn new(rect: Rect, rows: usize, cols: usize) -> Result<Self> {
        Self::validate(&rect, rows, cols)?;
        Ok(Self {
            rows,
            cols,
            rect,
            rho: MaskedGrid::new(rows, cols),
            epsilon_r: MaskedGrid::new(rows, cols),
            fixed_voltage: MaskedGrid::new(rows, cols),
            resultant_voltage: MaskedGrid::new(rows, cols),
            field_magnitude: MaskedGrid::new(rows, cols),
            field_direction: MaskedGrid::new(rows, cols),
        })
    }

    fn validate(rect: &Rect, rows: usize, cols: usize) -> Result<()> {
        if rows < 2 || cols < 2 {
            return Err(PotentialsError::InvalidGrid { rows, cols });
        }
        let w = rect.size.width;
        let h = rect.size.height;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0)
            || !rect.origin.is_finite()
        {
            return Err(PotentialsError::InvalidRect {
                width: w,
                height: h,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Grid geometry
    // ========================================================================

    /// Number of grid rows (y-direction).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns (x-direction).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The real-space rectangle the grid spans.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Real-space distance between adjacent columns.
    pub fn delta_x(&self) -> f64 {
        self.rect.size.width / (self.cols - 1) as f64
    }

    /// Real-space distance between adjacent rows.
    pub fn delta_y(&self) -> f64 {
        self.rect.size.height / (self.rows - 1) as f64
    }

    /// Nearest grid column to the real x coordinate, or `None` when the
    /// rounded column falls outside the grid.
    pub fn col_for_x(&self, x: f64) -> Option<usize> {
        let c = ((x - self.rect.origin.x) / self.delta_x()).round();
        if c >= 0.0 && c <= (self.cols - 1) as f64 {
            Some(c as usize)
        } else {
            None
        }
    }

    /// Nearest grid row to the real y coordinate, or `None` when the rounded
    /// row falls outside the grid.
    pub fn row_for_y(&self, y: f64) -> Option<usize> {
        let r = ((y - self.rect.origin.y) / self.delta_y()).round();
        if r >= 0.0 && r <= (self.rows - 1) as f64 {
            Some(r as usize)
        } else {
            None
        }
    }

    /// Real x coordinate of the given column, or NaN when the column is
    /// outside the grid.
    pub fn x_for_col(&self, c: usize) -> f64 {
        if c < self.cols {
            self.rect.origin.x + c as f64 * self.delta_x()
        } else {
            warn!(col = c, cols = self.cols, "column outside grid");
            f64::NAN
        }
    }

    /// Real y coordinate of the given row, or NaN when the row is outside
    /// the grid.
    pub fn y_for_row(&self, r: usize) -> f64 {
        if r < self.rows {
            self.rect.origin.y + r as f64 * self.delta_y()
        } else {
            warn!(row = r, rows = self.rows, "row outside grid");
            f64::NAN
        }
    }

    /// The grid node nearest the real point, or `None` when either axis
    /// falls outside the grid.
    pub fn node_at(&self, p: Point) -> Option<(usize, usize)> {
        Some((self.row_for_y(p.y)?, self.col_for_x(p.x)?))
    }

    /// Real-space point of the grid node `(r, c)`. Components are NaN when
    /// the node is outside the grid.
    pub fn point_at(&self, r: usize, c: usize) -> Point {
        Point::new(self.x_for_col(c), self.y_for_row(r))
    }

    // ========================================================================
    // Input properties
    // ========================================================================

    /// Set the fixed charge density at a node.
    pub fn set_rho(&mut self, r: usize, c: usize, rho: f64) {
        self.rho.set(r, c, rho);
    }

    /// Accumulate fixed charge density at a node, as overlapping charge
    /// sheets sum their contributions.
    pub fn add_rho(&mut self, r: usize, c: usize, rho: f64) {
        self.rho.add(r, c, rho);
    }

    /// Fixed charge density at a node; 0.0 where nothing has been placed.
    pub fn rho_at(&self, r: usize, c: usize) -> f64 {
        self.rho.get(r, c).unwrap_or(0.0)
    }

    /// Fixed charge density at the node nearest a real point.
    pub fn rho_at_point(&self, p: Point) -> f64 {
        match self.node_at(p) {
            Some((r, c)) => self.rho_at(r, c),
            None => 0.0,
        }
    }

    /// Set the relative permittivity at a node.
    pub fn set_epsilon_r(&mut self, r: usize, c: usize, er: f64) {
        self.epsilon_r.set(r, c, er);
    }

    /// Accumulate relative permittivity at a node, as overlapping
    /// dielectrics sum their contributions.
    pub fn add_epsilon_r(&mut self, r: usize, c: usize, er: f64) {
        self.epsilon_r.add(r, c, er);
    }

    /// Relative permittivity at a node; 1.0 (vacuum) where no dielectric
    /// has been placed.
    pub fn epsilon_r_at(&self, r: usize, c: usize) -> f64 {
        self.epsilon_r.get(r, c).unwrap_or(DEFAULT_EPSILON_R)
    }

    /// Relative permittivity at the node nearest a real point.
    pub fn epsilon_r_at_point(&self, p: Point) -> f64 {
        match self.node_at(p) {
            Some((r, c)) => self.epsilon_r_at(r, c),
            None => DEFAULT_EPSILON_R,
        }
    }

    /// Clamp a node to a conductor voltage. Later writers win, and the node
    /// is held at this voltage for every solver iteration.
    pub fn set_fixed_voltage(&mut self, r: usize, c: usize, v: f64) {
        self.fixed_voltage.set(r, c, v);
    }

    /// The conductor voltage a node is clamped to, or `None` for a free
    /// node. A free node is *not* 0 V; it is solved for.
    pub fn fixed_voltage_at(&self, r: usize, c: usize) -> Option<f64> {
        self.fixed_voltage.get(r, c)
    }

    /// Whether a node is clamped by a conductor.
    pub fn is_conductor(&self, r: usize, c: usize) -> bool {
        self.fixed_voltage.is_set(r, c)
    }

    /// The fixed charge density grid, for bulk scans.
    pub fn rho(&self) -> &MaskedGrid {
        &self.rho
    }

    /// The relative permittivity grid, for bulk scans.
    pub fn epsilon_r(&self) -> &MaskedGrid {
        &self.epsilon_r
    }

    /// The conductor voltage grid, for bulk scans.
    pub fn fixed_voltage(&self) -> &MaskedGrid {
        &self.fixed_voltage
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    /// Rasterize a shape onto the property grids.
    ///
    /// Takes a one-time snapshot of the shape: mutating it afterwards has no
    /// effect on nodes already written. Shapes are applied in insertion
    /// order; conductors overwrite earlier conductor voltages node by node,
    /// dielectrics and charge sheets accumulate. On error the workspace is
    /// left untouched.
    pub fn add_shape(&mut self, shape: &Shape) -> Result<()> {
        shapes::rasterize(shape, self)
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Solve the workspace with the default solver configuration.
    pub fn solve(&mut self) -> Result<SolveReport> {
        self.solve_with(SolverConfig::default())
    }

    /// Solve the workspace, relaxing the variable-coefficient Poisson
    /// equation until convergence or the iteration cap.
    ///
    /// Overwrites all output grids, so re-solving an unchanged workspace is
    /// idempotent. Non-convergence is reported through the returned
    /// [`SolveReport`], with best-effort results still stored.
    pub fn solve_with(&mut self, config: SolverConfig) -> Result<SolveReport> {
        let mut relaxation = Relaxation::new(self, config)?;
        let report = relaxation.run();
        self.store_results(relaxation.voltage());
        Ok(report)
    }

    /// Store a solved voltage grid and derive the field from it.
    pub(crate) fn store_results(&mut self, voltage: &[f64]) {
        self.resultant_voltage.discard_all();
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.resultant_voltage.set(r, c, voltage[r * self.cols + c]);
            }
        }
        let (magnitude, direction) = field::derive(
            voltage,
            self.rows,
            self.cols,
            self.delta_x(),
            self.delta_y(),
        );
        self.field_magnitude.discard_all();
        self.field_direction.discard_all();
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.field_magnitude.set(r, c, magnitude[r * self.cols + c]);
                self.field_direction.set(r, c, direction[r * self.cols + c]);
            }
        }
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Whether solve results are currently available.
    pub fn has_results(&self) -> bool {
        !self.resultant_voltage.max().is_nan()
    }

    /// Solved potential at a node, or `None` before a solve.
    pub fn voltage_at(&self, r: usize, c: usize) -> Option<f64> {
        self.resultant_voltage.get(r, c)
    }

    /// Solved potential at the node nearest a real point.
    pub fn voltage_at_point(&self, p: Point) -> Option<f64> {
        let (r, c) = self.node_at(p)?;
        self.voltage_at(r, c)
    }

    /// Electric field magnitude at a node, or `None` before a solve.
    pub fn field_magnitude_at(&self, r: usize, c: usize) -> Option<f64> {
        self.field_magnitude.get(r, c)
    }

    /// Electric field magnitude at the node nearest a real point.
    pub fn field_magnitude_at_point(&self, p: Point) -> Option<f64> {
        let (r, c) = self.node_at(p)?;
        self.field_magnitude_at(r, c)
    }

    /// Electric field direction at a node in radians on the unit circle,
    /// or `None` before a solve.
    pub fn field_direction_at(&self, r: usize, c: usize) -> Option<f64> {
        self.field_direction.get(r, c)
    }

    /// Electric field direction in radians at the node nearest a real point.
    pub fn field_direction_at_point(&self, p: Point) -> Option<f64> {
        let (r, c) = self.node_at(p)?;
        self.field_direction_at(r, c)
    }

    /// The solved potential grid, for bulk scans.
    pub fn resultant_voltage(&self) -> &MaskedGrid {
        &self.resultant_voltage
    }

    /// The field magnitude grid, for bulk scans.
    pub fn field_magnitude(&self) -> &MaskedGrid {
        &self.field_magnitude
    }

    /// The field direction grid (radians), for bulk scans.
    pub fn field_direction(&self) -> &MaskedGrid {
        &self.field_direction
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Clear every property and result grid, leaving the geometry intact.
    /// The Big Shake on the Etch-A-Sketch.
    pub fn clear(&mut self) {
        self.rho.discard_all();
        self.epsilon_r.discard_all();
        self.fixed_voltage.discard_all();
        self.resultant_voltage.discard_all();
        self.field_magnitude.discard_all();
        self.field_direction.discard_all();
    }

    /// Reconfigure the workspace geometry, discarding every grid value.
    pub fn reconfigure(&mut self, rect: Rect, rows: usize, cols: usize) -> Result<()> {
        Self::validate(&rect, rows, cols)?;
        self.rect = rect;
        self.rows = rows;
        self.cols = cols;
        self.rho.resize(rows, cols);
        self.epsilon_r.resize(rows, cols);
        self.fixed_voltage.resize(rows, cols);
        self.resultant_voltage.resize(rows, cols);
        self.field_magnitude.resize(rows, cols);
        self.field_direction.resize(rows, cols);
        Ok(())
    }
}
