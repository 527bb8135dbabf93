//! metrics::errors — error type for correction-quality metrics.
//!
//! Purpose
//! -------
//! Report invalid metric parameters and neighbor-resolution failures, and
//! wrap the errors of the subsystems a metric calls into (alignment,
//! transforms, the data model).
//!
//! Conventions
//! -----------
//! - Failures of the external neighbor service arrive as `anyhow::Error` and
//!   are flattened into [`MetricsError::Anyhow`] with their full context
//!   chain, keeping the enum `Clone + PartialEq` like every other error type
//!   in the crate.

use crate::advisory::Advisory;
use crate::alignment::errors::AlignError;
use crate::lightcurve::errors::LightCurveError;
use crate::transforms::errors::TransformError;

pub type MetricsResult<T> = Result<T, MetricsError>;

/// MetricsError — failures raised by the metrics engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    // ---- Parameters ----
    InvalidTargetBounds { min_targets: usize, max_targets: usize },
    InvalidRadius(f64),
    InvalidOversampleFactor(f64),
    InvalidNyquistFactor(f64),

    // ---- Neighbor resolution ----
    InsufficientNeighbors { found: usize, required: usize },
    Anyhow(String),

    // ---- Wrapped ----
    Align(AlignError),
    Transform(TransformError),
    LightCurve(LightCurveError),
    Advisory(Advisory),
}

impl std::error::Error for MetricsError {}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::InvalidTargetBounds { min_targets, max_targets } => write!(
                f,
                "Invalid neighbor bounds: min_targets={min_targets}, max_targets={max_targets}. \
                 Need 1 <= min_targets <= max_targets."
            ),
            MetricsError::InvalidRadius(r) => {
                write!(f, "Invalid search radius: {r} arcsec. Must be finite and strictly positive.")
            }
            MetricsError::InvalidOversampleFactor(v) => {
                write!(f, "Invalid oversample_factor: {v}. Must be finite and strictly positive.")
            }
            MetricsError::InvalidNyquistFactor(v) => {
                write!(f, "Invalid nyquist_factor: {v}. Must be finite and strictly positive.")
            }
            MetricsError::InsufficientNeighbors { found, required } => write!(
                f,
                "Only {found} neighboring light curves were found, {required} are required. \
                 Try increasing the search radius or lowering min_targets."
            ),
            MetricsError::Anyhow(msg) => write!(f, "Neighbor resolution failed: {msg}"),
            MetricsError::Align(err) => write!(f, "{err}"),
            MetricsError::Transform(err) => write!(f, "{err}"),
            MetricsError::LightCurve(err) => write!(f, "{err}"),
            MetricsError::Advisory(advisory) => write!(f, "{advisory}"),
        }
    }
}

impl From<anyhow::Error> for MetricsError {
    fn from(err: anyhow::Error) -> Self {
        MetricsError::Anyhow(format!("{err:#}"))
    }
}

impl From<AlignError> for MetricsError {
    fn from(err: AlignError) -> Self {
        match err {
            AlignError::Advisory(advisory) => MetricsError::Advisory(advisory),
            other => MetricsError::Align(other),
        }
    }
}

impl From<TransformError> for MetricsError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Advisory(advisory) => MetricsError::Advisory(advisory),
            other => MetricsError::Transform(other),
        }
    }
}

impl From<LightCurveError> for MetricsError {
    fn from(err: LightCurveError) -> Self {
        match err {
            LightCurveError::Advisory(advisory) => MetricsError::Advisory(advisory),
            other => MetricsError::LightCurve(other),
        }
    }
}

impl From<Advisory> for MetricsError {
    fn from(advisory: Advisory) -> Self {
        MetricsError::Advisory(advisory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    // Purpose
    // -------
    // Collaborator failures keep their context chain in the message.
    //
    // Given
    // -----
    // - An anyhow error with an added context layer.
    //
    // Expect
    // ------
    // - Both the context and the root cause appear in the converted message.
    fn anyhow_errors_keep_context() {
        let root: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let err: MetricsError = root.context("querying neighbors").unwrap_err().into();
        let msg = err.to_string();
        assert!(msg.contains("querying neighbors") && msg.contains("connection refused"), "{msg}");
    }
}
