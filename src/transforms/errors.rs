//! transforms::errors — error type for the time-series transform layer.
//!
//! Purpose
//! -------
//! Report invalid transform parameters (periods, windows, sigmas, bin
//! specifications, transit signals) and degenerate inputs, while passing
//! through data-model errors from the underlying light curve.
//!
//! Conventions
//! -----------
//! - Parameter variants name the offending argument so messages read like
//!   "`bins` must be an integer, got 2.5".
//! - Light-curve failures are wrapped in [`TransformError::LightCurve`];
//!   escalated advisories use [`TransformError::Advisory`].

use crate::advisory::Advisory;
use crate::lightcurve::errors::LightCurveError;

pub type TransformResult<T> = Result<T, TransformError>;

/// TransformError — failures raised by fold/flatten/bin/fill/clip/cdpp.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    // ---- Fold ----
    InvalidPeriod(f64),
    InvalidEpoch { name: &'static str, value: f64 },
    InvalidWrapPhase { value: f64, max: f64 },

    // ---- Flatten / smoothing ----
    InvalidWindowLength(usize),
    InvalidBreakTolerance(usize),
    InvalidIterations { name: &'static str, value: usize },
    InvalidSigma { name: &'static str, value: f64 },
    MaskLengthMismatch { expected: usize, found: usize },
    IllConditionedFit(&'static str),

    // ---- Bin ----
    InvalidBinSize(f64),
    InvalidBinCount { name: &'static str, value: usize },
    NonIntegerCount { name: &'static str, value: f64 },
    InvalidBinEdges(String),
    UnsupportedMethod { name: &'static str, value: String },

    // ---- Transit mask / CDPP ----
    InvalidDuration { name: &'static str, value: f64 },
    SignalLengthMismatch { periods: usize, durations: usize, transit_times: usize },
    InsufficientSamples { operation: &'static str, required: usize, found: usize },

    // ---- Wrapped ----
    LightCurve(LightCurveError),
    Advisory(Advisory),
}

impl std::error::Error for TransformError {}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::InvalidPeriod(p) => {
                write!(f, "Invalid period: {p}. Must be finite and strictly positive.")
            }
            TransformError::InvalidEpoch { name, value } => {
                write!(f, "Invalid {name}: {value}. Must be finite.")
            }
            TransformError::InvalidWrapPhase { value, max } => {
                write!(f, "Invalid wrap_phase: {value}. Must be finite and in (0, {max}].")
            }
            TransformError::InvalidWindowLength(w) => {
                write!(f, "Invalid window_length: {w}. Must be a positive odd integer.")
            }
            TransformError::InvalidBreakTolerance(b) => {
                write!(f, "Invalid break_tolerance: {b}. Must be at least 1.")
            }
            TransformError::InvalidIterations { name, value } => {
                write!(f, "Invalid {name}: {value}. Must be at least 1.")
            }
            TransformError::InvalidSigma { name, value } => {
                write!(f, "Invalid {name}: {value}. Must be finite and strictly positive.")
            }
            TransformError::MaskLengthMismatch { expected, found } => {
                write!(f, "mask has length {found}, expected {expected}.")
            }
            TransformError::IllConditionedFit(reason) => {
                write!(f, "Local polynomial fit is ill-conditioned: {reason}.")
            }
            TransformError::InvalidBinSize(size) => {
                write!(
                    f,
                    "Invalid time_bin_size: {size}. Must be finite, strictly positive \
                     and coarse enough for a bounded bin grid."
                )
            }
            TransformError::InvalidBinCount { name, value } => {
                write!(f, "Invalid {name}: {value}. Must be at least 1.")
            }
            TransformError::NonIntegerCount { name, value } => {
                write!(f, "`{name}` must be an integer, got {value}.")
            }
            TransformError::InvalidBinEdges(reason) => write!(f, "Invalid bin edges: {reason}."),
            TransformError::UnsupportedMethod { name, value } => {
                write!(f, "Unsupported {name} `{value}`; expected 'mean' or 'median'.")
            }
            TransformError::InvalidDuration { name, value } => {
                write!(f, "Invalid {name}: {value}. Must be finite and strictly positive.")
            }
            TransformError::SignalLengthMismatch { periods, durations, transit_times } => write!(
                f,
                "period, duration and transit_time must have equal lengths \
                 (got {periods}, {durations}, {transit_times})."
            ),
            TransformError::InsufficientSamples { operation, required, found } => write!(
                f,
                "{operation} needs at least {required} samples, got {found}."
            ),
            TransformError::LightCurve(err) => write!(f, "{err}"),
            TransformError::Advisory(advisory) => write!(f, "{advisory}"),
        }
    }
}

impl From<LightCurveError> for TransformError {
    fn from(err: LightCurveError) -> Self {
        match err {
            LightCurveError::Advisory(advisory) => TransformError::Advisory(advisory),
            other => TransformError::LightCurve(other),
        }
    }
}

impl From<Advisory> for TransformError {
    fn from(advisory: Advisory) -> Self {
        TransformError::Advisory(advisory)
    }
}
