//! transforms::validation — shared parameter checks for transform options.
//!
//! Purpose
//! -------
//! Keep the small finiteness/positivity checks used by several option
//! builders in one place so each one reports the same error variants.
//!
//! Conventions
//! -----------
//! - Helpers return the validated value on success so builders can write
//!   `self.sigma = validate_sigma("sigma", sigma)?;`.
//! - No logging happens here; callers decide whether a clamped value
//!   deserves an advisory.

use crate::transforms::errors::{TransformError, TransformResult};

/// Require a finite, strictly positive sigma-like threshold.
pub fn validate_sigma(name: &'static str, value: f64) -> TransformResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TransformError::InvalidSigma { name, value });
    }
    Ok(value)
}

/// Require a strictly positive clipping threshold; `+inf` disables that
/// side of the clip.
pub fn validate_clip_threshold(name: &'static str, value: f64) -> TransformResult<f64> {
    if value.is_nan() || value <= 0.0 {
        return Err(TransformError::InvalidSigma { name, value });
    }
    Ok(value)
}

/// Require an iteration count of at least one.
pub fn validate_iterations(name: &'static str, value: usize) -> TransformResult<usize> {
    if value == 0 {
        return Err(TransformError::InvalidIterations { name, value });
    }
    Ok(value)
}

/// Require a finite, strictly positive period in days.
pub fn validate_period(period: f64) -> TransformResult<f64> {
    if !period.is_finite() || period <= 0.0 {
        return Err(TransformError::InvalidPeriod(period));
    }
    Ok(period)
}

/// Require a finite, strictly positive duration-like quantity.
pub fn validate_duration(name: &'static str, value: f64) -> TransformResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TransformError::InvalidDuration { name, value });
    }
    Ok(value)
}

/// Require a positive odd smoothing window.
pub fn validate_window_length(window_length: usize) -> TransformResult<usize> {
    if window_length == 0 || window_length % 2 == 0 {
        return Err(TransformError::InvalidWindowLength(window_length));
    }
    Ok(window_length)
}

/// Require an optional exclusion mask to match the sample count.
pub fn validate_mask_length(mask: Option<&[bool]>, expected: usize) -> TransformResult<()> {
    match mask {
        Some(m) if m.len() != expected => {
            Err(TransformError::MaskLengthMismatch { expected, found: m.len() })
        }
        _ => Ok(()),
    }
}
