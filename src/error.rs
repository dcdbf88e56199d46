//! Error types for the Potentials field solver.
//!
//! This module provides a unified error type [`PotentialsError`] that covers
//! all error conditions that can occur during workspace construction and
//! shape rasterization.
//!
//! Note that solver non-convergence is deliberately *not* an error: it is a
//! non-fatal terminal state reported through
//! [`SolveStatus`](crate::solver::SolveStatus) alongside best-effort results.
//! Out-of-range grid accesses are likewise not errors; they log a warning and
//! return sentinel values (`None` / NaN).

use thiserror::Error;

/// Result type alias using [`PotentialsError`].
pub type Result<T> = std::result::Result<T, PotentialsError>;

/// Unified error type for all Potentials operations.
#[derive(Error, Debug)]
pub enum PotentialsError {
    // ============ Construction Errors ============
    /// Simulation grid dimensions are too small
    #[error("Invalid grid dimensions {rows}x{cols}: at least 2 rows and 2 columns are required")]
    InvalidGrid { rows: usize, cols: usize },

    /// Workspace rectangle has a non-positive or non-finite extent
    #[error("Invalid workspace rectangle: width {width} and height {height} must be positive and finite")]
    InvalidRect { width: f64, height: f64 },

    // ============ Rasterization Errors ============
    /// Shape parameters cannot be rasterized onto the grid
    #[error("Invalid shape: {message}")]
    InvalidShape { message: String },

    // ============ Solver Errors ============
    /// Solver configuration that cannot produce a meaningful run
    #[error("Invalid solver parameter: {message}")]
    InvalidSolverParam { message: String },
}

impl PotentialsError {
    /// Create an invalid-shape error.
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }

    /// Create an invalid-solver-parameter error.
    pub fn invalid_solver_param(message: impl Into<String>) -> Self {
        Self::InvalidSolverParam {
            message: message.into(),
        }
    }
}
