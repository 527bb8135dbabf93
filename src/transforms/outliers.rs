//! transforms::outliers — iterative sigma clipping and outlier removal.
//!
//! Purpose
//! -------
//! Flag samples that deviate from the bulk of a series by more than a
//! configurable number of standard deviations, and drop them from a light
//! curve.
//!
//! Key behaviors
//! -------------
//! - Clipping is iterative: the center (median) and scale (population
//!   standard deviation) are recomputed over the surviving samples until no
//!   new sample is clipped or `maxiters` rounds have run.
//! - Lower and upper thresholds are independent; both comparisons are
//!   strict, so a zero-scale series never clips anything.
//! - NaN samples are excluded from the statistics and reported as masked, so
//!   they are never mistaken for extreme values.
//!
//! Conventions
//! -----------
//! - Masks use `true` = clipped / removed.

use ndarray::Array1;

use crate::lightcurve::data::LightCurve;
use crate::transforms::errors::TransformResult;
use crate::transforms::validation::{validate_clip_threshold, validate_iterations, validate_sigma};
use crate::utils::{median_in_place, nan_population_std};

/// Options for [`remove_outliers_lightcurve`] and [`sigma_clip`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierOptions {
    pub sigma_lower: f64,
    pub sigma_upper: f64,
    pub maxiters: usize,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        OutlierOptions { sigma_lower: 5.0, sigma_upper: 5.0, maxiters: 5 }
    }
}

impl OutlierOptions {
    /// Symmetric clipping at `sigma` standard deviations.
    ///
    /// Errors
    /// ------
    /// - `TransformError::InvalidSigma` when `sigma` is not finite and > 0.
    pub fn new(sigma: f64) -> TransformResult<Self> {
        let sigma = validate_sigma("sigma", sigma)?;
        Ok(OutlierOptions { sigma_lower: sigma, sigma_upper: sigma, ..Default::default() })
    }

    /// Override the lower threshold (samples below the center);
    /// `f64::INFINITY` keeps every dip.
    pub fn with_sigma_lower(mut self, sigma_lower: f64) -> TransformResult<Self> {
        self.sigma_lower = validate_clip_threshold("sigma_lower", sigma_lower)?;
        Ok(self)
    }

    /// Override the upper threshold (samples above the center);
    /// `f64::INFINITY` keeps every spike.
    pub fn with_sigma_upper(mut self, sigma_upper: f64) -> TransformResult<Self> {
        self.sigma_upper = validate_clip_threshold("sigma_upper", sigma_upper)?;
        Ok(self)
    }

    pub fn with_maxiters(mut self, maxiters: usize) -> TransformResult<Self> {
        self.maxiters = validate_iterations("maxiters", maxiters)?;
        Ok(self)
    }
}

/// Result of outlier removal on a light-curve variant `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveOutliersOutput<T> {
    /// Rows that survived clipping.
    pub lc: T,
    /// `true` for every input row that was removed.
    pub mask: Array1<bool>,
}

/// Iteratively sigma-clip `values`.
///
/// Parameters
/// ----------
/// - `values`: `&[f64]`
///   Samples to clip; NaN entries are masked up front.
/// - `sigma_lower`, `sigma_upper`: `f64`
///   Thresholds in units of the population standard deviation.
/// - `maxiters`: `usize`
///   Upper bound on clipping rounds.
///
/// Returns
/// -------
/// `Vec<bool>`
///   `true` for clipped (or non-finite) samples.
pub fn sigma_clip(values: &[f64], sigma_lower: f64, sigma_upper: f64, maxiters: usize) -> Vec<bool> {
    let mut clipped: Vec<bool> = values.iter().map(|v| !v.is_finite()).collect();
    let mut scratch: Vec<f64> = Vec::with_capacity(values.len());
    for iteration in 0..maxiters {
        scratch.clear();
        scratch.extend(values.iter().zip(&clipped).filter(|(_, &c)| !c).map(|(v, _)| *v));
        if scratch.is_empty() {
            break;
        }
        let std = nan_population_std(&scratch);
        let center = median_in_place(&mut scratch);
        // inf * 0 is NaN for a zero-scale series; NaN bounds clip nothing.
        let lo = center - sigma_lower * std;
        let hi = center + sigma_upper * std;

        let mut newly_clipped = 0usize;
        for (v, c) in values.iter().zip(clipped.iter_mut()) {
            if !*c && (*v < lo || *v > hi) {
                *c = true;
                newly_clipped += 1;
            }
        }
        tracing::debug!(iteration, newly_clipped, "sigma clip round");
        if newly_clipped == 0 {
            break;
        }
    }
    clipped
}

/// Drop flux outliers from `lc`.
///
/// Returns
/// -------
/// `TransformResult<(LightCurve, Array1<bool>)>`
///   The surviving rows and the removal mask over the input rows.
pub fn remove_outliers_lightcurve(
    lc: &LightCurve, opts: &OutlierOptions,
) -> TransformResult<(LightCurve, Array1<bool>)> {
    let flux = lc.flux().to_vec();
    let clipped = sigma_clip(&flux, opts.sigma_lower, opts.sigma_upper, opts.maxiters);
    let keep: Vec<bool> = clipped.iter().map(|c| !c).collect();
    let out = lc.mask(&keep)?;
    Ok((out, Array1::from(clipped)))
}
