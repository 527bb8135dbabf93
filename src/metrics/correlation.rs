//! metrics::correlation — pairwise correlation across target flux rows.
//!
//! Purpose
//! -------
//! Build the target-by-target correlation matrix used by the underfit
//! metric to measure how much variability a corrected light curve still
//! shares with its neighbors.
//!
//! Key behaviors
//! -------------
//! - Rows are targets, columns are time samples.
//! - Pairwise-complete policy: entry `(i, j)` uses only the samples where
//!   both rows are finite.
//! - The coefficient is taken about zero,
//!   `Σ xᵢ xⱼ / sqrt(Σ xᵢ² Σ xⱼ²)`; callers centre each row beforehand
//!   (median-normalized flux minus one).
//!
//! Invariants & assumptions
//! ------------------------
//! - The output is symmetric and clamped to [-1, 1].
//! - The diagonal is exactly 1.0 for every row with a finite non-zero
//!   sample and NaN otherwise.
//! - Degenerate pairs (no jointly finite samples, or zero energy on either
//!   side) are NaN, never an error.

use ndarray::{Array2, ArrayView2};

/// Correlation matrix of the rows of `flux_matrix`.
///
/// Parameters
/// ----------
/// - `flux_matrix`: `ArrayView2<f64>`
///   `(n_targets, n_samples)`; NaN marks a missing sample.
///
/// Returns
/// -------
/// `Array2<f64>`
///   `(n_targets, n_targets)` symmetric matrix.
pub fn compute_correlation(flux_matrix: ArrayView2<f64>) -> Array2<f64> {
    let n_targets = flux_matrix.nrows();
    let mut corr = Array2::from_elem((n_targets, n_targets), f64::NAN);

    for i in 0..n_targets {
        let row_i = flux_matrix.row(i);
        if row_i.iter().any(|v| v.is_finite() && *v != 0.0) {
            corr[[i, i]] = 1.0;
        }
        for j in (i + 1)..n_targets {
            let row_j = flux_matrix.row(j);
            let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
            for (&x, &y) in row_i.iter().zip(row_j.iter()) {
                if x.is_finite() && y.is_finite() {
                    sxy += x * y;
                    sxx += x * x;
                    syy += y * y;
                }
            }
            let denom = (sxx * syy).sqrt();
            let value = if denom > 0.0 { (sxy / denom).clamp(-1.0, 1.0) } else { f64::NAN };
            corr[[i, j]] = value;
            corr[[j, i]] = value;
        }
    }
    corr
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact ±1 / ±0.5 structure for sign-pattern rows.
    // - All-ones input.
    // - NaN handling (pairwise-complete) and degenerate rows.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Co- and anti-correlated sign patterns give the exact expected matrix.
    //
    // Given
    // -----
    // - Four targets with ±1 samples: rows 0/1 and 2/3 are anti-correlated,
    //   rows 0 and 2 agree on three of four samples.
    //
    // Expect
    // ------
    // - [[1, -1, .5, -.5], [-1, 1, -.5, .5], [.5, -.5, 1, -1], [-.5, .5, -1, 1]].
    fn sign_patterns_give_exact_matrix() {
        let flux = array![
            [1.0, -1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0, 1.0],
        ];
        let expected = array![
            [1.0, -1.0, 0.5, -0.5],
            [-1.0, 1.0, -0.5, 0.5],
            [0.5, -0.5, 1.0, -1.0],
            [-0.5, 0.5, -1.0, 1.0],
        ];

        let corr = compute_correlation(flux.view());

        for (got, want) in corr.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn all_ones_matrix_is_all_ones() {
        let corr = compute_correlation(Array2::from_elem((4, 4), 1.0).view());
        assert!(corr.iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // Missing samples are excluded per pair; empty rows give NaN cells.
    //
    // Given
    // -----
    // - row 0 = [1, 2, NaN, 4], row 1 = [2, 4, 100, 8], row 2 all NaN,
    //   row 3 all zero.
    //
    // Expect
    // ------
    // - corr[0][1] = 1 (the NaN column is skipped).
    // - rows 2 and 3 have NaN diagonals and NaN off-diagonal cells.
    fn missing_and_degenerate_rows() {
        let nan = f64::NAN;
        let flux = array![
            [1.0, 2.0, nan, 4.0],
            [2.0, 4.0, 100.0, 8.0],
            [nan, nan, nan, nan],
            [0.0, 0.0, 0.0, 0.0],
        ];

        let corr = compute_correlation(flux.view());

        assert_abs_diff_eq!(corr[[0, 1]], 1.0, epsilon = 1e-12);
        assert_eq!(corr[[0, 1]], corr[[1, 0]]);
        for k in [2, 3] {
            assert!(corr[[k, k]].is_nan());
            assert!(corr[[0, k]].is_nan() && corr[[k, 0]].is_nan());
        }
    }
}
