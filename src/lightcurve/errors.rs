//! lightcurve::errors — error type for light-curve construction and access.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the data model: builder
//! validation, row selection, column lookup, unit handling, concatenation,
//! and arithmetic between light curves.
//!
//! Key behaviors
//! -------------
//! - Structural violations (unequal column lengths, non-finite time values)
//!   are reported at construction time; nothing is truncated or coerced.
//! - Parameter errors name the offending argument or column so the message
//!   is actionable without a backtrace.
//! - Advisories escalated by [`AdvisoryPolicy::Error`] surface as
//!   [`LightCurveError::Advisory`].
//!
//! Conventions
//! -----------
//! - Transform-, alignment-, and metric-specific failures live in their own
//!   `errors` modules and wrap this type.
//!
//! [`AdvisoryPolicy::Error`]: crate::advisory::AdvisoryPolicy::Error

use crate::advisory::Advisory;
use crate::lightcurve::time::TimeFormat;
use crate::lightcurve::units::Unit;

pub type LightCurveResult<T> = Result<T, LightCurveError>;

/// LightCurveError — failures raised by the light-curve data model.
///
/// Variants
/// --------
/// - `InconsistentColumnLengths { column, expected, found }`
///   A column's length differs from the time axis length.
/// - `NonFiniteTime { index }`
///   The time value at `index` is NaN or infinite.
/// - `UnrecognizedUnit(unit)` / `NotRelativeUnit(unit)`
///   A unit string could not be parsed, or is not a relative flux unit
///   where one is required.
/// - `UnknownMission(name)`
///   A mission name could not be parsed.
/// - `MissingColumn(name)` / `ColumnTypeMismatch { .. }`
///   A named column is absent or has the wrong storage kind.
/// - `UnitMismatch { expected, found }`
///   Two quantities that must share a unit do not.
/// - `LengthMismatch { left, right }`
///   Element-wise operation between light curves of different lengths.
/// - `IncompatibleTimeFormat { from, to }`
///   Time values cannot be converted between the two formats.
/// - `IndexOutOfBounds { index, len }` / `MaskLengthMismatch { expected, found }`
///   Row selection arguments do not fit the light curve.
/// - `ReadOnlyName(name)`
///   The generic setter was asked to overwrite a structural field in a way
///   that would break invariants.
/// - `Advisory(advisory)`
///   A non-fatal condition escalated by the process-wide policy.
#[derive(Debug, Clone, PartialEq)]
pub enum LightCurveError {
    // ---- Structure ----
    InconsistentColumnLengths { column: String, expected: usize, found: usize },
    NonFiniteTime { index: usize },

    // ---- Units / parameters ----
    UnrecognizedUnit(String),
    NotRelativeUnit(String),
    UnknownMission(String),

    // ---- Columns ----
    MissingColumn(String),
    ColumnTypeMismatch { column: String, expected: &'static str, found: &'static str },
    UnitMismatch { expected: Unit, found: Unit },
    ReadOnlyName(String),

    // ---- Row selection / combination ----
    LengthMismatch { left: usize, right: usize },
    IncompatibleTimeFormat { from: TimeFormat, to: TimeFormat },
    IndexOutOfBounds { index: usize, len: usize },
    MaskLengthMismatch { expected: usize, found: usize },

    // ---- Advisories ----
    Advisory(Advisory),
}

impl std::error::Error for LightCurveError {}

impl std::fmt::Display for LightCurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightCurveError::InconsistentColumnLengths { column, expected, found } => write!(
                f,
                "Inconsistent data column lengths: column `{column}` has {found} rows, \
                 expected {expected}."
            ),
            LightCurveError::NonFiniteTime { index } => {
                write!(f, "Time value at index {index} is not finite; time must not be NaN.")
            }
            LightCurveError::UnrecognizedUnit(unit) => write!(
                f,
                "Unrecognized unit `{unit}`; expected one of 'unscaled', 'percent', \
                 'ppt', 'ppm'."
            ),
            LightCurveError::NotRelativeUnit(unit) => {
                write!(f, "Unit `{unit}` is not a relative flux unit.")
            }
            LightCurveError::UnknownMission(name) => write!(f, "Unknown mission `{name}`."),
            LightCurveError::MissingColumn(name) => {
                write!(f, "Column `{name}` does not exist.")
            }
            LightCurveError::ColumnTypeMismatch { column, expected, found } => write!(
                f,
                "Column `{column}` has type {found}, expected {expected}."
            ),
            LightCurveError::UnitMismatch { expected, found } => {
                write!(f, "Unit mismatch: expected `{expected}`, found `{found}`.")
            }
            LightCurveError::ReadOnlyName(name) => {
                write!(f, "`{name}` cannot be reassigned through the generic setter.")
            }
            LightCurveError::LengthMismatch { left, right } => write!(
                f,
                "Light curves have different lengths ({left} vs {right})."
            ),
            LightCurveError::IncompatibleTimeFormat { from, to } => {
                write!(f, "Cannot convert time format `{from}` to `{to}`.")
            }
            LightCurveError::IndexOutOfBounds { index, len } => {
                write!(f, "Row index {index} out of bounds for length {len}.")
            }
            LightCurveError::MaskLengthMismatch { expected, found } => {
                write!(f, "Mask has length {found}, expected {expected}.")
            }
            LightCurveError::Advisory(advisory) => write!(f, "{advisory}"),
        }
    }
}

impl From<Advisory> for LightCurveError {
    fn from(advisory: Advisory) -> Self {
        LightCurveError::Advisory(advisory)
    }
}
