//! lightcurve::units — physical units attached to flux and auxiliary columns.
//!
//! Only the handful of units light-curve products actually carry are modelled
//! explicitly; anything else parses into an error rather than a guess, and
//! [`Unit::Custom`] exists for callers that build columns programmatically.

use std::str::FromStr;

use crate::lightcurve::errors::LightCurveError;

/// Unit of a flux or auxiliary column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Unitless quantity (normalized flux, counts of things).
    #[default]
    Dimensionless,
    /// Relative flux in percent.
    Percent,
    /// Relative flux in parts per thousand.
    PartsPerThousand,
    /// Relative flux in parts per million.
    PartsPerMillion,
    /// Photo-electrons per second (SAP/PDCSAP flux).
    ElectronPerSecond,
    /// Days (time-like auxiliary columns).
    Day,
    /// Detector pixels (centroids).
    Pixel,
    /// Arbitrary caller-supplied unit label.
    Custom(String),
}

impl Unit {
    /// Multiplier turning a unit-normalized ratio into this relative unit.
    ///
    /// Returns `None` for units that are not relative flux units.
    pub fn relative_scale(&self) -> Option<f64> {
        match self {
            Unit::Dimensionless => Some(1.0),
            Unit::Percent => Some(1e2),
            Unit::PartsPerThousand => Some(1e3),
            Unit::PartsPerMillion => Some(1e6),
            _ => None,
        }
    }

    /// Whether this unit expresses a flux relative to a baseline.
    pub fn is_relative(&self) -> bool {
        self.relative_scale().is_some()
    }
}

impl FromStr for Unit {
    type Err = LightCurveError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unit = match raw.trim().to_ascii_lowercase().as_str() {
            "" | "dimensionless" | "unscaled" => Unit::Dimensionless,
            "percent" | "%" => Unit::Percent,
            "ppt" => Unit::PartsPerThousand,
            "ppm" => Unit::PartsPerMillion,
            "electron/s" | "e-/s" | "electron / s" => Unit::ElectronPerSecond,
            "d" | "day" | "days" => Unit::Day,
            "pix" | "pixel" | "pixels" => Unit::Pixel,
            _ => return Err(LightCurveError::UnrecognizedUnit(raw.to_string())),
        };
        Ok(unit)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Dimensionless => write!(f, "dimensionless"),
            Unit::Percent => write!(f, "%"),
            Unit::PartsPerThousand => write!(f, "ppt"),
            Unit::PartsPerMillion => write!(f, "ppm"),
            Unit::ElectronPerSecond => write!(f, "electron / s"),
            Unit::Day => write!(f, "d"),
            Unit::Pixel => write!(f, "pix"),
            Unit::Custom(label) => write!(f, "{label}"),
        }
    }
}
