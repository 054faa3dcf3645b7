//! Polynomial trend primitives.
//!
//! The forecaster relies on two primitive operations:
//! - fit polynomial coefficients to an (index, total) series (least squares)
//! - evaluate the fitted polynomial at a time index (for the forecast itself
//!   and for chart overlays)
//!
//! Coefficients are stored in ascending order: `coeffs[k]` multiplies `x^k`,
//! so the value at the target index 0 is `coeffs[0]`.

use nalgebra::{DMatrix, DVector};

use crate::math::solve_least_squares;

/// Fit polynomial coefficients of the given degree by least squares.
///
/// Returns `None` when there are fewer points than coefficients or the
/// Vandermonde matrix is too ill-conditioned to solve.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    let n = xs.len();
    let p = degree + 1;
    if n < p || n != ys.len() {
        return None;
    }

    let mut design = DMatrix::<f64>::zeros(n, p);
    for (i, &x) in xs.iter().enumerate() {
        let mut term = 1.0;
        for j in 0..p {
            design[(i, j)] = term;
            term *= x;
        }
    }
    let y = DVector::from_column_slice(ys);

    let beta = solve_least_squares(&design, &y)?;
    Some(beta.iter().copied().collect())
}

/// Evaluate a polynomial with ascending coefficients at `x` (Horner).
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
