//! Masked grid storage: a 2D matrix of values that may individually be unset.
//!
//! Floating-point values have no natural "not set yet" state, so every
//! property grid in the workspace pairs a row-major value matrix with a
//! parallel validity mask. Readers get `Option<f64>` and can always tell an
//! unset cell from a genuine 0.0.
//!
//! Out-of-range access is a caller error but never a panic: reads return
//! `None`, writes are no-ops, and both log a warning.

use tracing::warn;

/// A 2D grid of `f64` values with a per-cell validity mask.
///
/// Storage is flat row-major: cell `(r, c)` lives at index `r * cols + c`.
#[derive(Debug, Clone)]
pub struct MaskedGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    mask: Vec<bool>,
}

impl MaskedGrid {
    /// Create a grid of the given dimensions with every cell unset.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
            mask: vec![false; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, r: usize, c: usize) -> Option<usize> {
        if r < self.rows && c < self.cols {
            Some(r * self.cols + c)
        } else {
            warn!(
                row = r,
                col = c,
                rows = self.rows,
                cols = self.cols,
                "masked grid access out of range"
            );
            None
        }
    }

    /// Get the value at `(r, c)`, or `None` if the cell is unset or the
    /// indices are out of range.
    pub fn get(&self, r: usize, c: usize) -> Option<f64> {
        let i = self.index(r, c)?;
        if self.mask[i] {
            Some(self.data[i])
        } else {
            None
        }
    }

    /// Whether the cell at `(r, c)` holds a valid value.
    pub fn is_set(&self, r: usize, c: usize) -> bool {
        match self.index(r, c) {
            Some(i) => self.mask[i],
            None => false,
        }
    }

    /// Store `value` at `(r, c)` and mark the cell valid.
    /// Out of range is a logged no-op.
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        if let Some(i) = self.index(r, c) {
            self.data[i] = value;
            self.mask[i] = true;
        }
    }

    /// Accumulate `delta` onto the cell at `(r, c)`, treating an unset cell
    /// as 0.0, and mark the cell valid. Out of range is a logged no-op.
    pub fn add(&mut self, r: usize, c: usize, delta: f64) {
        if let Some(i) = self.index(r, c) {
            let base = if self.mask[i] { self.data[i] } else { 0.0 };
            self.data[i] = base + delta;
            self.mask[i] = true;
        }
    }

    /// Mark the cell at `(r, c)` unset without touching its stored value.
    pub fn discard(&mut self, r: usize, c: usize) {
        if let Some(i) = self.index(r, c) {
            self.mask[i] = false;
        }
    }

    /// Mark every cell unset.
    pub fn discard_all(&mut self) {
        self.mask.fill(false);
    }

    /// Minimum over all valid cells, or NaN if no cell is valid.
    pub fn min(&self) -> f64 {
        self.fold_valid(f64::min)
    }

    /// Maximum over all valid cells, or NaN if no cell is valid.
    pub fn max(&self) -> f64 {
        self.fold_valid(f64::max)
    }

    fn fold_valid(&self, f: fn(f64, f64) -> f64) -> f64 {
        let mut acc = f64::NAN;
        for (i, &set) in self.mask.iter().enumerate() {
            if set {
                acc = if acc.is_nan() {
                    self.data[i]
                } else {
                    f(acc, self.data[i])
                };
            }
        }
        acc
    }

    /// Reallocate to the given dimensions, discarding all prior values.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.data = vec![0.0; rows * cols];
        self.mask = vec![false; rows * cols];
    }
}
