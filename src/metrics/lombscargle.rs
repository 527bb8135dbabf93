//! metrics::lombscargle — classical Lomb–Scargle spectra for uneven sampling.
//!
//! Purpose
//! -------
//! Compute power and amplitude spectra of irregularly sampled series on a
//! frequency grid tied to the series' duration and sampling rate.
//!
//! Key behaviors
//! -------------
//! - [`frequency_grid`]: spacing `1 / (span × oversample_factor)` starting
//!   one step above zero, up to (excluding) `nyquist_factor × 0.5 / median dt`.
//! - [`lomb_scargle_power`]: the classical floating-mean periodogram with
//!   the time offset τ (`tan 2ωτ = Σ sin 2ωt / Σ cos 2ωt`) on mean-centred
//!   data, in PSD units.
//! - [`lomb_scargle_amplitude`]: `sqrt(4 P / N)`, so a unit-amplitude sine
//!   peaks at ≈ 1.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite and of equal length; callers drop NaN samples first.
//! - Cost is O(N × F) with no allocation beyond the output.

use std::f64::consts::PI;

use crate::utils::median_positive_step;

/// Regular frequency grid (cycles per day) for a sampled time axis.
///
/// Returns an empty grid when fewer than two distinct times exist.
pub fn frequency_grid(time: &[f64], oversample_factor: f64, nyquist_factor: f64) -> Vec<f64> {
    let Some(step) = median_positive_step(time) else {
        return Vec::new();
    };
    let tmin = time.iter().copied().fold(f64::INFINITY, f64::min);
    let tmax = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = tmax - tmin;
    if span <= 0.0 {
        return Vec::new();
    }
    let df = 1.0 / (span * oversample_factor);
    let fmax = nyquist_factor * 0.5 / step;
    (1..).map(|k| k as f64 * df).take_while(|&f| f < fmax).collect()
}

/// Classical Lomb–Scargle power (PSD normalization) at each frequency.
pub fn lomb_scargle_power(time: &[f64], y: &[f64], frequency: &[f64]) -> Vec<f64> {
    let n = time.len().min(y.len());
    if n == 0 {
        return vec![0.0; frequency.len()];
    }
    let mean = y[..n].iter().sum::<f64>() / n as f64;

    frequency
        .iter()
        .map(|&f| {
            let omega = 2.0 * PI * f;
            let (s2, c2) = time[..n].iter().fold((0.0, 0.0), |(s, c), &t| {
                let arg = 2.0 * omega * t;
                (s + arg.sin(), c + arg.cos())
            });
            let tau = 0.5 * s2.atan2(c2) / omega;

            let (mut yc, mut ys, mut cc, mut ss) = (0.0, 0.0, 0.0, 0.0);
            for (&t, &v) in time[..n].iter().zip(&y[..n]) {
                let arg = omega * (t - tau);
                let (sin, cos) = arg.sin_cos();
                let dy = v - mean;
                yc += dy * cos;
                ys += dy * sin;
                cc += cos * cos;
                ss += sin * sin;
            }
            let cos_term = if cc > 0.0 { yc * yc / cc } else { 0.0 };
            let sin_term = if ss > 0.0 { ys * ys / ss } else { 0.0 };
            0.5 * (cos_term + sin_term)
        })
        .collect()
}

/// Amplitude spectrum `sqrt(4 P / N)`.
pub fn lomb_scargle_amplitude(time: &[f64], y: &[f64], frequency: &[f64]) -> Vec<f64> {
    let n = time.len().min(y.len());
    if n == 0 {
        return vec![0.0; frequency.len()];
    }
    lomb_scargle_power(time, y, frequency)
        .into_iter()
        .map(|p| (4.0 * p / n as f64).sqrt())
        .collect()
}
