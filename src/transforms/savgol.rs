//! transforms::savgol — Savitzky–Golay smoothing with polynomial-fit edges.
//!
//! Purpose
//! -------
//! Provide the local-polynomial smoother used by detrending and CDPP. Each
//! output sample is the value at the window center of a least-squares
//! polynomial of degree `polyorder` fitted to `window_length` neighbours.
//!
//! Key behaviors
//! -------------
//! - Coefficients come from the pseudo-inverse of the centered Vandermonde
//!   matrix (`nalgebra`), so every output is a dot product with one row of
//!   that pseudo-inverse.
//! - The first and last `window_length / 2` samples are evaluated from a
//!   polynomial fitted to the first/last full window instead of padding the
//!   signal, so a polynomial of degree ≤ `polyorder` is reproduced exactly
//!   everywhere.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite and `window_length` is odd, `≤ y.len()`, with
//!   `polyorder < window_length`. [`savgol_filter`] reports violations as
//!   errors; adaptive shrinking happens in the callers.

use nalgebra::DMatrix;

use crate::transforms::errors::{TransformError, TransformResult};
use crate::transforms::validation::validate_window_length;

const PINV_EPS: f64 = 1.0e-12;

/// Least-squares projector for a centered window.
///
/// Returns the `(polyorder + 1) × window_length` pseudo-inverse of the
/// Vandermonde matrix built on offsets `-half..=half`.
fn window_projector(window_length: usize, polyorder: usize) -> TransformResult<DMatrix<f64>> {
    let half = (window_length / 2) as f64;
    let vandermonde =
        DMatrix::from_fn(window_length, polyorder + 1, |i, j| (i as f64 - half).powi(j as i32));
    vandermonde.pseudo_inverse(PINV_EPS).map_err(TransformError::IllConditionedFit)
}

/// Convolution weights that evaluate the fitted polynomial at the center.
///
/// Errors
/// ------
/// - `InvalidWindowLength` for even or zero windows.
/// - `IllConditionedFit` when `polyorder >= window_length` or the SVD fails.
pub fn savgol_coefficients(window_length: usize, polyorder: usize) -> TransformResult<Vec<f64>> {
    validate_window_length(window_length)?;
    if polyorder >= window_length {
        return Err(TransformError::IllConditionedFit("polyorder must be below window_length"));
    }
    let projector = window_projector(window_length, polyorder)?;
    Ok(projector.row(0).iter().copied().collect())
}

/// Smooth `y` with a Savitzky–Golay filter.
///
/// Parameters
/// ----------
/// - `y`: `&[f64]`
///   Finite samples, assumed evenly spaced.
/// - `window_length`: `usize`
///   Odd window, at most `y.len()`.
/// - `polyorder`: `usize`
///   Polynomial degree, strictly below `window_length`.
///
/// Returns
/// -------
/// `TransformResult<Vec<f64>>`
///   Smoothed values, same length as `y`.
///
/// Errors
/// ------
/// - Same as [`savgol_coefficients`], plus `InsufficientSamples` when the
///   window is longer than the input.
pub fn savgol_filter(y: &[f64], window_length: usize, polyorder: usize) -> TransformResult<Vec<f64>> {
    let n = y.len();
    validate_window_length(window_length)?;
    if window_length > n {
        return Err(TransformError::InsufficientSamples {
            operation: "savgol_filter",
            required: window_length,
            found: n,
        });
    }
    if polyorder >= window_length {
        return Err(TransformError::IllConditionedFit("polyorder must be below window_length"));
    }
    if window_length == 1 {
        return Ok(y.to_vec());
    }

    let projector = window_projector(window_length, polyorder)?;
    let half = window_length / 2;
    let mut out = vec![0.0; n];

    for k in half..n - half {
        let window = &y[k - half..=k + half];
        out[k] = projector.row(0).iter().zip(window).map(|(c, v)| c * v).sum();
    }

    let poly_at = |beta: &[f64], x: f64| -> f64 {
        beta.iter().rev().fold(0.0, |acc, b| acc * x + b)
    };
    let fit = |window: &[f64]| -> Vec<f64> {
        (0..=polyorder)
            .map(|j| projector.row(j).iter().zip(window).map(|(c, v)| c * v).sum())
            .collect()
    };

    let left = fit(&y[..window_length]);
    for (k, slot) in out.iter_mut().enumerate().take(half) {
        *slot = poly_at(&left, k as f64 - half as f64);
    }
    let right = fit(&y[n - window_length..]);
    for k in n - half..n {
        let offset = (k - (n - window_length)) as f64 - half as f64;
        out[k] = poly_at(&right, offset);
    }
    Ok(out)
}
