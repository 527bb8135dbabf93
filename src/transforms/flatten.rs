//! transforms::flatten — iterative Savitzky–Golay detrending.
//!
//! Purpose
//! -------
//! Remove low-frequency trends from a light curve by fitting a local
//! polynomial (Savitzky–Golay) trend, dividing it out, and repeating the fit
//! after sigma-clipping the residual outliers from the fit set.
//!
//! Key behaviors
//! -------------
//! - Samples with NaN flux and samples excluded by the caller's mask never
//!   enter the fit, but they still receive a trend value (linear
//!   interpolation, clamped at the edges) so NaN flux stays NaN and masked
//!   samples are divided by a sensible trend.
//! - The fit set is split into segments wherever consecutive timestamps are
//!   more than `break_tolerance × median dt` apart; windows never cross a
//!   segment boundary.
//! - Per segment the window shrinks to the number of available samples
//!   (kept odd) and `polyorder` follows it down.
//! - A `polyorder` that is not strictly below `window_length` is clamped to
//!   `window_length - 1` with an advisory.
//!
//! Invariants & assumptions
//! ------------------------
//! - The flat light curve is dimensionless and flagged `NORMALIZED=true`;
//!   the trend light curve keeps the original flux unit and carries NaN
//!   uncertainties.
//!
//! Downstream usage
//! ----------------
//! - Called through [`crate::lightcurve::LightCurveLike::flatten`], which
//!   re-wraps the outputs in the caller's variant.

use ndarray::Array1;

use crate::advisory::{self, Advisory};
use crate::lightcurve::data::LightCurve;
use crate::lightcurve::meta::keys;
use crate::lightcurve::units::Unit;
use crate::transforms::errors::{TransformError, TransformResult};
use crate::transforms::outliers::sigma_clip;
use crate::transforms::savgol::savgol_filter;
use crate::transforms::validation::{
    validate_iterations, validate_mask_length, validate_sigma, validate_window_length,
};
use crate::utils::{finite_sorted_pairs, interp, median_positive_step, Outside};

const CLIP_MAXITERS: usize = 5;

/// FlattenOptions — configuration for [`flatten_lightcurve`].
///
/// Fields
/// ------
/// - `window_length`: odd number of samples in each local fit (default 101).
/// - `polyorder`: degree of the local polynomial (default 2).
/// - `break_tolerance`: segment split threshold in multiples of the median
///   time step; `None` disables splitting (default `Some(5)`).
/// - `niters`: fit / clip rounds (default 3).
/// - `sigma`: clipping threshold for residual outliers (default 3).
/// - `mask`: samples to exclude from the fit (`true` = exclude).
/// - `return_trend`: also return the trend light curve.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOptions {
    pub window_length: usize,
    pub polyorder: usize,
    pub break_tolerance: Option<usize>,
    pub niters: usize,
    pub sigma: f64,
    pub mask: Option<Vec<bool>>,
    pub return_trend: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions {
            window_length: 101,
            polyorder: 2,
            break_tolerance: Some(5),
            niters: 3,
            sigma: 3.0,
            mask: None,
            return_trend: false,
        }
    }
}

impl FlattenOptions {
    pub fn new() -> Self {
        FlattenOptions::default()
    }

    pub fn with_window_length(mut self, window_length: usize) -> TransformResult<Self> {
        self.window_length = validate_window_length(window_length)?;
        Ok(self)
    }

    /// Set the polynomial degree; values `>= window_length` are clamped at
    /// run time with an advisory.
    pub fn with_polyorder(mut self, polyorder: usize) -> Self {
        self.polyorder = polyorder;
        self
    }

    pub fn with_break_tolerance(mut self, break_tolerance: Option<usize>) -> TransformResult<Self> {
        if break_tolerance == Some(0) {
            return Err(TransformError::InvalidBreakTolerance(0));
        }
        self.break_tolerance = break_tolerance;
        Ok(self)
    }

    pub fn with_niters(mut self, niters: usize) -> TransformResult<Self> {
        self.niters = validate_iterations("niters", niters)?;
        Ok(self)
    }

    pub fn with_sigma(mut self, sigma: f64) -> TransformResult<Self> {
        self.sigma = validate_sigma("sigma", sigma)?;
        Ok(self)
    }

    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_return_trend(mut self, return_trend: bool) -> Self {
        self.return_trend = return_trend;
        self
    }

    fn validate(&self, n: usize) -> TransformResult<()> {
        validate_window_length(self.window_length)?;
        validate_iterations("niters", self.niters)?;
        validate_sigma("sigma", self.sigma)?;
        if self.break_tolerance == Some(0) {
            return Err(TransformError::InvalidBreakTolerance(0));
        }
        validate_mask_length(self.mask.as_deref(), n)
    }
}

/// Result of detrending a light-curve variant `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOutput<T> {
    pub flat: T,
    /// Present when `return_trend` was requested.
    pub trend: Option<T>,
}

/// Detrend `lc`; see the module docs for the algorithm.
///
/// Returns
/// -------
/// `TransformResult<(LightCurve, Option<LightCurve>)>`
///   The flattened light curve and, when requested, the trend.
///
/// Errors
/// ------
/// - Option validation errors (`InvalidWindowLength`, `InvalidSigma`,
///   `InvalidIterations`, `InvalidBreakTolerance`, `MaskLengthMismatch`).
/// - `Advisory` when a clamped `polyorder` is escalated by the policy.
pub fn flatten_lightcurve(
    lc: &LightCurve, opts: &FlattenOptions,
) -> TransformResult<(LightCurve, Option<LightCurve>)> {
    let n = lc.len();
    opts.validate(n)?;

    let mut polyorder = opts.polyorder;
    if polyorder >= opts.window_length {
        let used = opts.window_length - 1;
        advisory::emit(Advisory::PolyorderAdjusted { requested: polyorder, used })?;
        polyorder = used;
    }

    let time = lc.time_values().to_vec();
    let flux = lc.flux().to_vec();
    let trend = fit_trend(&time, &flux, opts, polyorder)?;

    let flat = {
        let mut out = lc.clone();
        out.flux_mut().iter_mut().zip(&trend).for_each(|(f, t)| *f /= t);
        out.flux_err_mut().iter_mut().zip(&trend).for_each(|(e, t)| *e /= t);
        let mut parts = out.into_parts();
        parts.flux_unit = Unit::Dimensionless;
        parts.meta.insert(keys::NORMALIZED, true);
        LightCurve::from_parts(parts)?
    };

    let trend_lc = if opts.return_trend {
        let mut parts = lc.clone().into_parts();
        parts.flux = Array1::from(trend);
        parts.flux_err = Array1::from_elem(n, f64::NAN);
        Some(LightCurve::from_parts(parts)?)
    } else {
        None
    };
    Ok((flat, trend_lc))
}

/// Iteratively fit the trend over the fit set and evaluate it at every time.
fn fit_trend(
    time: &[f64], flux: &[f64], opts: &FlattenOptions, polyorder: usize,
) -> TransformResult<Vec<f64>> {
    let n = time.len();
    let mut in_fit: Vec<bool> = match &opts.mask {
        Some(mask) => flux.iter().zip(mask).map(|(f, &m)| f.is_finite() && !m).collect(),
        None => flux.iter().map(|f| f.is_finite()).collect(),
    };
    let segments = split_segments(time, &in_fit, opts.break_tolerance);

    let mut knots_t: Vec<f64> = Vec::with_capacity(n);
    let mut knots_y: Vec<f64> = Vec::with_capacity(n);
    for iteration in 0..opts.niters {
        knots_t.clear();
        knots_y.clear();
        let mut fit_rows: Vec<usize> = Vec::with_capacity(n);
        for segment in &segments {
            let rows: Vec<usize> = segment.iter().copied().filter(|&i| in_fit[i]).collect();
            if rows.is_empty() {
                continue;
            }
            let values: Vec<f64> = rows.iter().map(|&i| flux[i]).collect();
            let smoothed = smooth_segment(&values, opts.window_length, polyorder)?;
            for (&i, s) in rows.iter().zip(smoothed) {
                knots_t.push(time[i]);
                knots_y.push(s);
                fit_rows.push(i);
            }
        }

        let residuals: Vec<f64> =
            fit_rows.iter().zip(&knots_y).map(|(&i, t)| flux[i] - t).collect();
        let clipped = sigma_clip(&residuals, opts.sigma, opts.sigma, CLIP_MAXITERS);
        let mut removed = 0usize;
        for (&i, c) in fit_rows.iter().zip(clipped) {
            if c {
                in_fit[i] = false;
                removed += 1;
            }
        }
        tracing::debug!(iteration, fit_samples = fit_rows.len(), removed, "flatten iteration");
    }

    let (xp, fp) = finite_sorted_pairs(&knots_t, &knots_y);
    Ok(time.iter().map(|&t| interp(t, &xp, &fp, Outside::Clamp)).collect())
}

/// Savitzky–Golay over one segment with the window shrunk to fit.
fn smooth_segment(values: &[f64], window_length: usize, polyorder: usize) -> TransformResult<Vec<f64>> {
    let count = values.len();
    let mut window = window_length.min(count);
    if window % 2 == 0 {
        window -= 1;
    }
    if window < window_length {
        tracing::debug!(requested = window_length, used = window, "shrinking savgol window");
    }
    savgol_filter(values, window, polyorder.min(window - 1))
}

/// Group the initially fittable rows into contiguous segments split at gaps.
fn split_segments(time: &[f64], in_fit: &[bool], break_tolerance: Option<usize>) -> Vec<Vec<usize>> {
    let rows: Vec<usize> = (0..time.len()).filter(|&i| in_fit[i]).collect();
    let fit_times: Vec<f64> = rows.iter().map(|&i| time[i]).collect();
    let threshold = match (break_tolerance, median_positive_step(&fit_times)) {
        (Some(tol), Some(step)) => tol as f64 * step,
        _ => f64::INFINITY,
    };

    let mut segments: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut previous: Option<f64> = None;
    for (&i, &t) in rows.iter().zip(&fit_times) {
        if let Some(p) = previous {
            if t - p > threshold {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(i);
        previous = Some(t);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
