//! lightcurve::folded — light curves whose time axis is orbital phase.
//!
//! Purpose
//! -------
//! Represent the result of folding a light curve on a period. The wrapped
//! [`LightCurve`] keeps every column; its time axis holds phase values
//! (format `Relative`) sorted ascending, and two bookkeeping columns ride
//! along through every row operation:
//!
//! - `time_original` (float, days): the unfolded timestamp of each sample;
//! - `cycle` (int): the number of periods elapsed since the epoch, shifted so
//!   the earliest sample is cycle 0.
//!
//! Key behaviors
//! -------------
//! - Odd/even masks derive from `cycle % 2`; they depend only on period and
//!   epoch time, never on `epoch_phase`.
//! - Binning drops the integer `cycle` column (bins mix cycles), so the
//!   accessors below return `Option`.

use ndarray::{Array1, ArrayView1};

use crate::lightcurve::column::ColumnData;
use crate::lightcurve::data::LightCurve;

/// Column holding the unfolded time of each sample.
pub const TIME_ORIGINAL_COLUMN: &str = "time_original";
/// Column holding the cycle index of each sample.
pub const CYCLE_COLUMN: &str = "cycle";

/// Parameters a light curve was folded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldParameters {
    pub period: f64,
    pub epoch_time: f64,
    pub epoch_phase: f64,
    /// Upper end of the phase range, in the units of the folded axis.
    pub wrap_phase: f64,
    pub normalize_phase: bool,
}

/// A phase-folded light curve.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedLightCurve {
    inner: LightCurve,
    params: FoldParameters,
}

impl FoldedLightCurve {
    pub(crate) fn from_inner(inner: LightCurve, params: FoldParameters) -> Self {
        FoldedLightCurve { inner, params }
    }

    /// The underlying light curve (time axis = phase).
    pub fn inner(&self) -> &LightCurve {
        &self.inner
    }

    pub fn into_inner(self) -> LightCurve {
        self.inner
    }

    pub fn params(&self) -> FoldParameters {
        self.params
    }

    pub fn period(&self) -> f64 {
        self.params.period
    }

    pub fn epoch_time(&self) -> f64 {
        self.params.epoch_time
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Phase of each sample: in units of the period when `normalize_phase`,
    /// otherwise in days.
    pub fn phase(&self) -> &Array1<f64> {
        self.inner.time_values()
    }

    pub fn time_original(&self) -> Option<ArrayView1<'_, f64>> {
        self.inner.column(TIME_ORIGINAL_COLUMN).and_then(|c| c.data.as_float()).map(|a| a.view())
    }

    pub fn cycle(&self) -> Option<ArrayView1<'_, i64>> {
        match self.inner.column(CYCLE_COLUMN).map(|c| &c.data) {
            Some(ColumnData::Int(values)) => Some(values.view()),
            _ => None,
        }
    }

    /// `true` for samples in odd cycles.
    pub fn odd_mask(&self) -> Option<Array1<bool>> {
        self.cycle().map(|c| c.mapv(|k| k.rem_euclid(2) == 1))
    }

    /// `true` for samples in even cycles.
    pub fn even_mask(&self) -> Option<Array1<bool>> {
        self.cycle().map(|c| c.mapv(|k| k.rem_euclid(2) == 0))
    }
}
