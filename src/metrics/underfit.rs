//! metrics::underfit — shared-systematics score against neighboring targets.
//!
//! Purpose
//! -------
//! Score whether a corrected light curve still carries instrumental trends
//! common to nearby stars. Neighbors share the detector systematics but not
//! the subject's astrophysical signal, so residual correlation with them
//! indicates an under-fitted correction.
//!
//! Key behaviors
//! -------------
//! - Neighbors come from a [`NeighborSource`]; fewer than `min_targets` is an
//!   error, more than `max_targets` are truncated (nearest kept).
//! - Every neighbor is aligned onto the subject's rows, by cadence number
//!   (default) or by time interpolation.
//! - Each row of the resulting flux matrix is rescaled to
//!   `flux / median - 1` before [`compute_correlation`].
//! - Score = `1 − reduce(|ρ₀ⱼ|)` over the finite subject/neighbor
//!   correlations, `reduce` being the median (default) or mean, clamped to
//!   [0, 1].
//!
//! Invariants & assumptions
//! ------------------------
//! - A flat subject (zero after rescaling) has no finite correlations and
//!   scores 1.0.
//! - Memory is O(neighbors × subject samples).

use ndarray::{Array1, Array2};

use crate::alignment::{align_to_lc, interpolate_to_lc};
use crate::lightcurve::data::LightCurve;
use crate::metrics::correlation::compute_correlation;
use crate::metrics::errors::{MetricsError, MetricsResult};
use crate::metrics::neighbors::{NeighborQuery, NeighborSource};
use crate::utils::{median_in_place, nan_mean, relative_to_median};

/// How neighbors are put onto the subject's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborAlignment {
    /// Exact matching on cadence numbers.
    #[default]
    Cadence,
    /// Linear interpolation at the subject's times.
    Interpolate { extrapolate: bool },
}

/// Reduction of the subject's absolute correlations to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationReduction {
    #[default]
    Median,
    Mean,
}

/// Parameters for [`underfit_metric_neighbors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderfitOptions {
    pub radius_arcsec: f64,
    pub min_targets: usize,
    pub max_targets: usize,
    pub alignment: NeighborAlignment,
    pub reduction: CorrelationReduction,
}

impl Default for UnderfitOptions {
    fn default() -> Self {
        UnderfitOptions {
            radius_arcsec: 6000.0,
            min_targets: 30,
            max_targets: 50,
            alignment: NeighborAlignment::Cadence,
            reduction: CorrelationReduction::Median,
        }
    }
}

impl UnderfitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both neighbor-count bounds.
    ///
    /// Errors
    /// ------
    /// - `MetricsError::InvalidTargetBounds` unless `1 <= min <= max`.
    pub fn with_targets(mut self, min_targets: usize, max_targets: usize) -> MetricsResult<Self> {
        validate_bounds(min_targets, max_targets)?;
        self.min_targets = min_targets;
        self.max_targets = max_targets;
        Ok(self)
    }

    pub fn with_radius(mut self, radius_arcsec: f64) -> MetricsResult<Self> {
        validate_radius(radius_arcsec)?;
        self.radius_arcsec = radius_arcsec;
        Ok(self)
    }

    pub fn with_alignment(mut self, alignment: NeighborAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_reduction(mut self, reduction: CorrelationReduction) -> Self {
        self.reduction = reduction;
        self
    }

    fn validate(&self) -> MetricsResult<()> {
        validate_bounds(self.min_targets, self.max_targets)?;
        validate_radius(self.radius_arcsec)
    }
}

fn validate_bounds(min_targets: usize, max_targets: usize) -> MetricsResult<()> {
    if min_targets == 0 || min_targets > max_targets {
        return Err(MetricsError::InvalidTargetBounds { min_targets, max_targets });
    }
    Ok(())
}

fn validate_radius(radius_arcsec: f64) -> MetricsResult<()> {
    if !radius_arcsec.is_finite() || radius_arcsec <= 0.0 {
        return Err(MetricsError::InvalidRadius(radius_arcsec));
    }
    Ok(())
}

/// Underfit score of `lc` against its neighbors, in [0, 1].
///
/// Parameters
/// ----------
/// - `lc`: `&LightCurve`
///   Corrected subject light curve; its rows define the comparison grid.
/// - `source`: `&dyn NeighborSource`
///   Collaborator resolving nearby targets.
/// - `options`: `&UnderfitOptions`
///
/// Returns
/// -------
/// `MetricsResult<f64>`
///   1.0 means no shared variability with the neighbors.
///
/// Errors
/// ------
/// - `MetricsError::InvalidTargetBounds` / `InvalidRadius` for bad options.
/// - `MetricsError::Anyhow` when the source fails.
/// - `MetricsError::InsufficientNeighbors` when fewer than `min_targets`
///   light curves come back.
/// - `MetricsError::Align` when a neighbor cannot be aligned (e.g. missing
///   cadence numbers under cadence alignment).
pub fn underfit_metric_neighbors(
    lc: &LightCurve, source: &dyn NeighborSource, options: &UnderfitOptions,
) -> MetricsResult<f64> {
    options.validate()?;

    let query =
        NeighborQuery { radius_arcsec: options.radius_arcsec, max_targets: options.max_targets };
    let mut neighbors = source.neighbors(lc, &query)?;
    if neighbors.len() < options.min_targets {
        return Err(MetricsError::InsufficientNeighbors {
            found: neighbors.len(),
            required: options.min_targets,
        });
    }
    neighbors.truncate(options.max_targets);

    let n_samples = lc.len();
    let mut matrix = Array2::from_elem((neighbors.len() + 1, n_samples), f64::NAN);
    let (subject_row, _) = relative_to_median(&lc.flux().to_vec());
    matrix.row_mut(0).assign(&Array1::from(subject_row));
    for (k, neighbor) in neighbors.iter().enumerate() {
        let aligned = match options.alignment {
            NeighborAlignment::Cadence => align_to_lc(neighbor, lc)?,
            NeighborAlignment::Interpolate { extrapolate } => {
                interpolate_to_lc(neighbor, lc, extrapolate)?
            }
        };
        let (row, _) = relative_to_median(&aligned.flux().to_vec());
        matrix.row_mut(k + 1).assign(&Array1::from(row));
    }

    let corr = compute_correlation(matrix.view());
    let mut subject_corr: Vec<f64> =
        corr.row(0).iter().skip(1).filter(|v| v.is_finite()).map(|v| v.abs()).collect();
    if subject_corr.is_empty() {
        tracing::debug!(neighbors = neighbors.len(), "no finite neighbor correlations");
        return Ok(1.0);
    }
    let reduced = match options.reduction {
        CorrelationReduction::Median => median_in_place(&mut subject_corr),
        CorrelationReduction::Mean => nan_mean(&subject_corr),
    };
    let score = (1.0 - reduced).clamp(0.0, 1.0);
    tracing::debug!(
        neighbors = neighbors.len(),
        finite = subject_corr.len(),
        reduced,
        score,
        "underfit metric"
    );
    Ok(score)
}
