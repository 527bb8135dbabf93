//! alignment::errors — error type for re-indexing light curves.

use crate::advisory::Advisory;
use crate::lightcurve::errors::LightCurveError;

pub type AlignResult<T> = Result<T, AlignError>;

/// AlignError — failures while mapping one light curve onto another's index.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignError {
    /// The ordering key (`cadenceno`) is absent on one side.
    MissingKeyColumn { role: &'static str, column: &'static str },
    LightCurve(LightCurveError),
    Advisory(Advisory),
}

impl std::error::Error for AlignError {}

impl std::fmt::Display for AlignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignError::MissingKeyColumn { role, column } => write!(
                f,
                "The {role} light curve has no `{column}` column to align on."
            ),
            AlignError::LightCurve(err) => write!(f, "{err}"),
            AlignError::Advisory(advisory) => write!(f, "{advisory}"),
        }
    }
}

impl From<LightCurveError> for AlignError {
    fn from(err: LightCurveError) -> Self {
        match err {
            LightCurveError::Advisory(advisory) => AlignError::Advisory(advisory),
            other => AlignError::LightCurve(other),
        }
    }
}

impl From<Advisory> for AlignError {
    fn from(advisory: Advisory) -> Self {
        AlignError::Advisory(advisory)
    }
}
