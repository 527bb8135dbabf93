//! utils — NaN-aware numeric helpers shared across the crate.
//!
//! Purpose
//! -------
//! Collect the small numerical kernels that every subsystem needs: NaN-aware
//! location and scale estimates, median time steps, stable arg-sorting, and
//! piecewise-linear interpolation. Keeping them here avoids each transform
//! growing its own slightly different copy.
//!
//! Conventions
//! -----------
//! - NaN marks a missing sample; helpers named `nan_*` ignore non-finite
//!   values and return `f64::NAN` when nothing finite remains.
//! - Means and population standard deviations go through
//!   `statrs::statistics::Statistics`; medians are computed locally because
//!   they need a sorted scratch copy anyway.
//! - Interpolation helpers expect `xp` sorted ascending and of equal length
//!   to `fp`; callers filter out non-finite pairs first.
//!
//! Testing notes
//! -------------
//! - Unit tests cover even/odd medians, all-NaN inputs, the MAD scale
//!   constant against the standard normal quantile, and interpolation edge
//!   behaviour (NaN fill and clamping).

use statrs::statistics::Statistics;

/// Scale factor turning a median absolute deviation into a Gaussian sigma,
/// i.e. `1 / Φ⁻¹(0.75)`.
pub const MAD_TO_SIGMA: f64 = 1.482_602_218_505_602;

/// Collect the finite entries of `values` into a new vector.
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Median of the finite entries of `values` (NaN when none are finite).
pub fn nan_median(values: &[f64]) -> f64 {
    let mut scratch = finite_values(values);
    median_in_place(&mut scratch)
}

/// Median of `scratch`, reordering it in place.
///
/// Returns NaN for an empty slice. Entries must already be finite.
pub fn median_in_place(scratch: &mut [f64]) -> f64 {
    let n = scratch.len();
    if n == 0 {
        return f64::NAN;
    }
    scratch.sort_unstable_by(|a, b| a.total_cmp(b));
    if n % 2 == 1 {
        scratch[n / 2]
    } else {
        0.5 * (scratch[n / 2 - 1] + scratch[n / 2])
    }
}

/// Mean of the finite entries of `values` (NaN when none are finite).
pub fn nan_mean(values: &[f64]) -> f64 {
    let finite = finite_values(values);
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.iter().mean()
}

/// Population standard deviation of the finite entries of `values`.
pub fn nan_population_std(values: &[f64]) -> f64 {
    let finite = finite_values(values);
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.iter().population_std_dev()
}

/// Median absolute deviation about the median, ignoring non-finite values.
pub fn nan_median_abs_deviation(values: &[f64]) -> f64 {
    let mut finite = finite_values(values);
    let center = median_in_place(&mut finite);
    if !center.is_finite() {
        return f64::NAN;
    }
    for v in finite.iter_mut() {
        *v = (*v - center).abs();
    }
    median_in_place(&mut finite)
}

/// Median of the strictly positive consecutive differences of `time`.
///
/// Returns `None` when fewer than two samples exist or no positive step is
/// found (e.g. all timestamps equal).
pub fn median_positive_step(time: &[f64]) -> Option<f64> {
    let mut steps: Vec<f64> =
        time.windows(2).map(|w| w[1] - w[0]).filter(|d| d.is_finite() && *d > 0.0).collect();
    let step = median_in_place(&mut steps);
    step.is_finite().then_some(step)
}

/// Express `values` as fractional deviations from their NaN-median,
/// `v / median - 1`.
///
/// Returns the rescaled values and the divisor used. When the median is zero
/// or non-finite the values are returned unchanged with divisor `None`.
pub fn relative_to_median(values: &[f64]) -> (Vec<f64>, Option<f64>) {
    let median = nan_median(values);
    if !median.is_finite() || median == 0.0 {
        return (values.to_vec(), None);
    }
    (values.iter().map(|v| v / median - 1.0).collect(), Some(median))
}

/// Indices that sort `keys` ascending; ties keep their original order.
pub fn stable_argsort(keys: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    order
}

/// Split `(x, y)` pairs into sorted, finite-only abscissa/ordinate vectors.
pub fn finite_sorted_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs.into_iter().unzip()
}

/// Piecewise-linear interpolation at `x`.
///
/// Parameters
/// ----------
/// - `x`: `f64`
///   Abscissa to evaluate.
/// - `xp`, `fp`: `&[f64]`
///   Knots sorted ascending by `xp`, equal length, all finite.
/// - `outside`: `Outside`
///   What to return for `x` beyond the first/last knot.
///
/// Returns
/// -------
/// `f64`
///   The interpolated value, or NaN when `xp` is empty.
pub fn interp(x: f64, xp: &[f64], fp: &[f64], outside: Outside) -> f64 {
    let n = xp.len();
    if n == 0 || !x.is_finite() {
        return f64::NAN;
    }
    if n == 1 {
        return match outside {
            Outside::Nan if x != xp[0] => f64::NAN,
            _ => fp[0],
        };
    }
    if x < xp[0] || x > xp[n - 1] {
        return match outside {
            Outside::Nan => f64::NAN,
            Outside::Clamp => {
                if x < xp[0] {
                    fp[0]
                } else {
                    fp[n - 1]
                }
            }
        };
    }
    let upper = xp.partition_point(|&v| v < x);
    if upper == 0 {
        return fp[0];
    }
    if xp[upper.min(n - 1)] == x {
        return fp[upper.min(n - 1)];
    }
    line_through(x, xp[upper - 1], fp[upper - 1], xp[upper], fp[upper])
}

fn line_through(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Out-of-range behaviour for [`interp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outside {
    /// Return NaN beyond the knots.
    Nan,
    /// Repeat the edge value.
    Clamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - NaN-aware medians, means and MAD on small hand-checked inputs.
    // - The MAD-to-sigma constant against the standard normal quantile.
    // - Interpolation inside the knots and each out-of-range policy.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that medians skip NaNs and handle even-length inputs.
    //
    // Given
    // -----
    // - [3, NaN, 1, 2, 10] and [4, 1, 3, 2].
    //
    // Expect
    // ------
    // - Medians 2.5 and 2.5; an all-NaN slice yields NaN.
    fn nan_median_skips_nans_and_averages_middle_pair() {
        assert_relative_eq!(nan_median(&[3.0, f64::NAN, 1.0, 2.0, 10.0]), 2.5);
        assert_relative_eq!(nan_median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(nan_median(&[f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Cross-check the hard-coded MAD scale factor with statrs.
    //
    // Given
    // -----
    // - The standard normal distribution.
    //
    // Expect
    // ------
    // - `MAD_TO_SIGMA == 1 / Φ⁻¹(0.75)` to 1e-9.
    fn mad_to_sigma_matches_normal_quantile() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        assert_relative_eq!(MAD_TO_SIGMA, 1.0 / normal.inverse_cdf(0.75), epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify MAD and population std on a tiny sample.
    //
    // Given
    // -----
    // - [1, 2, 3, 4, 100].
    //
    // Expect
    // ------
    // - MAD = 1 (deviations 2,1,0,1,97); std of [1,1] is 0.
    fn mad_and_std_on_small_inputs() {
        assert_relative_eq!(nan_median_abs_deviation(&[1.0, 2.0, 3.0, 4.0, 100.0]), 1.0);
        assert_relative_eq!(nan_population_std(&[1.0, f64::NAN, 1.0]), 0.0);
        assert_relative_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Exercise interpolation inside and outside the knot range.
    //
    // Given
    // -----
    // - Knots (0,0), (1,10), (3,30).
    //
    // Expect
    // ------
    // - Interior values are linear; outside values follow the policy.
    fn interp_respects_outside_policy() {
        let xp = [0.0, 1.0, 3.0];
        let fp = [0.0, 10.0, 30.0];
        assert_relative_eq!(interp(2.0, &xp, &fp, Outside::Nan), 20.0);
        assert_relative_eq!(interp(1.0, &xp, &fp, Outside::Nan), 10.0);
        assert!(interp(4.0, &xp, &fp, Outside::Nan).is_nan());
        assert_relative_eq!(interp(4.0, &xp, &fp, Outside::Clamp), 30.0);
        assert_relative_eq!(interp(-1.0, &xp, &fp, Outside::Clamp), 0.0);
    }

    #[test]
    fn median_positive_step_ignores_repeats() {
        assert_eq!(median_positive_step(&[0.0, 1.0, 1.0, 2.0, 3.0]), Some(1.0));
        assert_eq!(median_positive_step(&[5.0]), None);
    }

    #[test]
    fn relative_to_median_skips_zero_median() {
        let (scaled, divisor) = relative_to_median(&[1.0, 2.0, f64::NAN, 4.0]);
        assert_eq!(divisor, Some(2.0));
        assert_relative_eq!(scaled[0], -0.5);
        assert_relative_eq!(scaled[3], 1.0);
        assert!(scaled[2].is_nan());

        let (unchanged, divisor) = relative_to_median(&[-1.0, 0.0, 1.0]);
        assert_eq!(divisor, None);
        assert_eq!(unchanged, vec![-1.0, 0.0, 1.0]);
    }
}
