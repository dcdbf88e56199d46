//! Electric field derivation from the solved potential.
//!
//! Modeling the potential along one axis as a local parabola
//! `V(x) = a*x^2 + b*x + c` through three neighboring nodes gives the slope
//! at the middle node as `b = (v_right - v_left) / (2*h)` on a uniform mesh,
//! i.e. the familiar second-order central difference. At boundary nodes the
//! same parabola is fit one-sided, giving the three-point forward/backward
//! difference. The field is the negative gradient, `E = -grad V`.
//!
//! Direction values are radians on the unit circle, uniformly for every
//! accessor.

/// Compute per-node field magnitude and direction from a row-major voltage
/// grid.
///
/// Returns `(magnitude, direction)` as row-major vectors of `rows * cols`
/// elements, direction in radians from `atan2(Ey, Ex)`.
pub(crate) fn derive(
    voltage: &[f64],
    rows: usize,
    cols: usize,
    dx: f64,
    dy: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = rows * cols;
    let mut magnitude = vec![0.0; n];
    let mut direction = vec![0.0; n];

    for r in 0..rows {
        for c in 0..cols {
            let i = r * cols + c;
            let at = |rr: usize, cc: usize| voltage[rr * cols + cc];
            let ex = -slope(|k| at(r, k), c, cols, dx);
            let ey = -slope(|k| at(k, c), r, rows, dy);
            magnitude[i] = ex.hypot(ey);
            direction[i] = ey.atan2(ex);
        }
    }

    (magnitude, direction)
}

/// Second-order slope estimate along one axis at index `i` of `count` nodes
/// spaced `h` apart.
fn slope(v: impl Fn(usize) -> f64, i: usize, count: usize, h: f64) -> f64 {
    if count == 2 {
        // Only two nodes on this axis; a plain difference is all there is.
        return (v(1) - v(0)) / h;
    }
    if i == 0 {
        (-3.0 * v(0) + 4.0 * v(1) - v(2)) / (2.0 * h)
    } else if i == count - 1 {
        (3.0 * v(count - 1) - 4.0 * v(count - 2) + v(count - 3)) / (2.0 * h)
    } else {
        (v(i + 1) - v(i - 1)) / (2.0 * h)
    }
}
