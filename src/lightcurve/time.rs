//! lightcurve::time — time axis, time formats, and duration quantities.
//!
//! Purpose
//! -------
//! Give the time column of a light curve an explicit format (Julian Date or
//! one of the mission-reduced variants) and scale, so that light curves from
//! different missions can be concatenated without silently mixing epochs.
//!
//! Key behaviors
//! -------------
//! - [`TimeFormat::jd_offset`] maps each absolute format to its zero point in
//!   JD; [`TimeAxis::to_format`] converts all values between absolute formats.
//! - [`TimeFormat::Relative`] marks axes with no absolute zero point (phase
//!   after folding, synthetic test data); it only converts to itself.
//! - [`TimeSpan`] is the duration quantity accepted wherever a period,
//!   transit duration, or bin width is expected. Bare `f64` values convert
//!   as days.
//!
//! Invariants & assumptions
//! ------------------------
//! - Finiteness of time values is enforced by the owning
//!   [`LightCurve`](crate::lightcurve::LightCurve) at construction, not here.
//! - Scale conversions (TDB ↔ UTC) are not modelled; the scale is carried as
//!   metadata and must match for conversions to be meaningful.

use ndarray::Array1;

use crate::lightcurve::errors::{LightCurveError, LightCurveResult};

/// Representation of time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeFormat {
    /// Julian Date.
    Jd,
    /// Modified Julian Date (JD − 2400000.5).
    Mjd,
    /// Kepler/K2 Barycentric JD (BJD − 2454833).
    Bkjd,
    /// TESS Barycentric JD (BJD − 2457000).
    Btjd,
    /// Values without an absolute zero point (phase, synthetic data).
    #[default]
    Relative,
}

impl TimeFormat {
    /// Zero point of this format expressed in JD, `None` for `Relative`.
    pub fn jd_offset(self) -> Option<f64> {
        match self {
            TimeFormat::Jd => Some(0.0),
            TimeFormat::Mjd => Some(2_400_000.5),
            TimeFormat::Bkjd => Some(2_454_833.0),
            TimeFormat::Btjd => Some(2_457_000.0),
            TimeFormat::Relative => None,
        }
    }
}

impl std::fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeFormat::Jd => "jd",
            TimeFormat::Mjd => "mjd",
            TimeFormat::Bkjd => "bkjd",
            TimeFormat::Btjd => "btjd",
            TimeFormat::Relative => "relative",
        };
        write!(f, "{name}")
    }
}

/// Time scale tag carried alongside the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeScale {
    #[default]
    Tdb,
    Utc,
    Tt,
}

/// Time values plus their format and scale.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    values: Array1<f64>,
    format: TimeFormat,
    scale: TimeScale,
}

impl TimeAxis {
    pub fn new(values: impl Into<Array1<f64>>, format: TimeFormat) -> Self {
        TimeAxis { values: values.into(), format, scale: TimeScale::default() }
    }

    pub fn with_scale(mut self, scale: TimeScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn format(&self) -> TimeFormat {
        self.format
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert every value to `format`.
    ///
    /// Errors
    /// ------
    /// - `LightCurveError::IncompatibleTimeFormat` when exactly one of the
    ///   two formats is `Relative`.
    pub fn to_format(&self, format: TimeFormat) -> LightCurveResult<TimeAxis> {
        if format == self.format {
            return Ok(self.clone());
        }
        let shift = time_shift(self.format, format)?;
        Ok(TimeAxis { values: self.values.mapv(|t| t + shift), format, scale: self.scale })
    }

    /// Replace the values, keeping format and scale.
    pub fn with_values(&self, values: impl Into<Array1<f64>>) -> TimeAxis {
        TimeAxis { values: values.into(), format: self.format, scale: self.scale }
    }

    pub(crate) fn take(&self, indices: &[usize]) -> TimeAxis {
        self.with_values(indices.iter().map(|&i| self.values[i]).collect::<Array1<f64>>())
    }
}

/// Additive shift converting values in `from` into values in `to`.
pub fn time_shift(from: TimeFormat, to: TimeFormat) -> LightCurveResult<f64> {
    if from == to {
        return Ok(0.0);
    }
    match (from.jd_offset(), to.jd_offset()) {
        (Some(a), Some(b)) => Ok(a - b),
        _ => Err(LightCurveError::IncompatibleTimeFormat { from, to }),
    }
}

/// A duration, stored in days.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct TimeSpan(f64);

impl TimeSpan {
    pub fn days(value: f64) -> Self {
        TimeSpan(value)
    }

    pub fn hours(value: f64) -> Self {
        TimeSpan(value / 24.0)
    }

    pub fn minutes(value: f64) -> Self {
        TimeSpan(value / 1_440.0)
    }

    pub fn seconds(value: f64) -> Self {
        TimeSpan(value / 86_400.0)
    }

    pub fn as_days(self) -> f64 {
        self.0
    }

    pub fn is_positive_finite(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl From<f64> for TimeSpan {
    fn from(days: f64) -> Self {
        TimeSpan(days)
    }
}
