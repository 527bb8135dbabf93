//! transforms::fold — phase-folding a light curve on a period.
//!
//! Purpose
//! -------
//! Map absolute time onto orbital/rotational phase and return a
//! [`FoldedLightCurve`] sorted by phase, carrying the unfolded time and the
//! cycle index of each sample.
//!
//! Key behaviors
//! -------------
//! - `phase = (t - epoch_time) / period - epoch_phase` in periods. With
//!   `normalize_phase` the time axis holds this phase wrapped into
//!   `[wrap_phase - 1, wrap_phase)`; otherwise it holds `phase × period`
//!   days wrapped into `[wrap_phase - period, wrap_phase)`, so `wrap_phase`
//!   is a fraction of the period or a time in days respectively.
//! - `cycle = floor((t - epoch_time) / period + 0.5)`, shifted so the
//!   earliest sample is cycle 0. Cycle boundaries sit half a period before
//!   each epoch repetition, and `epoch_phase` never enters the cycle, so
//!   odd/even assignment depends only on period and epoch time.
//! - An epoch above 2,400,000 paired with a time axis entirely below it
//!   raises the [`Advisory::EpochLooksLikeJd`] advisory; folding still runs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Sorting by phase is stable: samples at equal phase keep time order.
//! - Every input column survives; `time_original` and `cycle` are
//!   (re)written.

use crate::advisory::{self, Advisory};
use crate::lightcurve::column::Column;
use crate::lightcurve::data::LightCurve;
use crate::lightcurve::folded::{
    FoldParameters, FoldedLightCurve, CYCLE_COLUMN, TIME_ORIGINAL_COLUMN,
};
use crate::lightcurve::time::{TimeAxis, TimeFormat, TimeSpan};
use crate::lightcurve::units::Unit;
use crate::transforms::errors::{TransformError, TransformResult};
use crate::transforms::validation::validate_period;
use crate::utils::stable_argsort;

/// Epochs above this look like full Julian Dates.
const JD_THRESHOLD: f64 = 2_400_000.0;

/// FoldOptions — period, epoch and phase-range configuration for folding.
///
/// Fields
/// ------
/// - `period`: folding period (finite, > 0).
/// - `epoch_time`: time of phase zero in the light curve's time format;
///   `None` uses the first timestamp.
/// - `epoch_phase`: phase assigned to `epoch_time` (display shift only).
/// - `wrap_phase`: upper end of the phase range, in the units of the folded
///   axis: `(0, 1]` when `normalize_phase`, `(0, period]` days otherwise.
///   `None` centres the range on zero (0.5 or `period / 2`).
/// - `normalize_phase`: express the time axis in periods instead of days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldOptions {
    pub period: TimeSpan,
    pub epoch_time: Option<f64>,
    pub epoch_phase: f64,
    pub wrap_phase: Option<f64>,
    pub normalize_phase: bool,
}

impl FoldOptions {
    /// Fold on `period` with every other option at its default.
    ///
    /// Errors
    /// ------
    /// - `TransformError::InvalidPeriod` unless the period is finite and > 0.
    pub fn new(period: impl Into<TimeSpan>) -> TransformResult<Self> {
        let period = period.into();
        validate_period(period.as_days())?;
        Ok(FoldOptions {
            period,
            epoch_time: None,
            epoch_phase: 0.0,
            wrap_phase: None,
            normalize_phase: false,
        })
    }

    pub fn with_epoch_time(mut self, epoch_time: f64) -> TransformResult<Self> {
        if !epoch_time.is_finite() {
            return Err(TransformError::InvalidEpoch { name: "epoch_time", value: epoch_time });
        }
        self.epoch_time = Some(epoch_time);
        Ok(self)
    }

    pub fn with_epoch_phase(mut self, epoch_phase: f64) -> TransformResult<Self> {
        if !epoch_phase.is_finite() {
            return Err(TransformError::InvalidEpoch { name: "epoch_phase", value: epoch_phase });
        }
        self.epoch_phase = epoch_phase;
        Ok(self)
    }

    /// Set the upper end of the phase range.
    ///
    /// Only positivity is checked here; the upper bound depends on
    /// `normalize_phase` and is enforced by [`LightCurve::fold`].
    ///
    /// Errors
    /// ------
    /// - `TransformError::InvalidWrapPhase` unless finite and > 0.
    pub fn with_wrap_phase(mut self, wrap_phase: f64) -> TransformResult<Self> {
        if !wrap_phase.is_finite() || wrap_phase <= 0.0 {
            return Err(TransformError::InvalidWrapPhase { value: wrap_phase, max: f64::INFINITY });
        }
        self.wrap_phase = Some(wrap_phase);
        Ok(self)
    }

    /// Upper end of the phase range in the folded axis units, defaulted and
    /// checked against the period span.
    fn resolved_wrap_phase(&self, period: f64) -> TransformResult<f64> {
        let span = if self.normalize_phase { 1.0 } else { period };
        let wrap = self.wrap_phase.unwrap_or(0.5 * span);
        if !wrap.is_finite() || wrap <= 0.0 || wrap > span {
            return Err(TransformError::InvalidWrapPhase { value: wrap, max: span });
        }
        Ok(wrap)
    }

    pub fn with_normalize_phase(mut self, normalize_phase: bool) -> Self {
        self.normalize_phase = normalize_phase;
        self
    }
}

/// Wrap `phase` into `[wrap - 1, wrap)`.
fn wrap_into(phase: f64, wrap: f64) -> f64 {
    let lower = wrap - 1.0;
    let mut r = (phase - lower).rem_euclid(1.0);
    if r >= 1.0 {
        r = 0.0;
    }
    r + lower
}

impl LightCurve {
    /// Fold the light curve on a period.
    ///
    /// Parameters
    /// ----------
    /// - `opts`: `&FoldOptions`
    ///   Period, epoch and phase-range configuration.
    ///
    /// Returns
    /// -------
    /// `TransformResult<FoldedLightCurve>`
    ///   Rows sorted by phase, with `time_original` and `cycle` columns.
    ///
    /// Errors
    /// ------
    /// - `InvalidPeriod` for a hand-built non-positive period.
    /// - `InvalidWrapPhase` when `wrap_phase` exceeds 1 (normalized) or the
    ///   period (days).
    /// - `InsufficientSamples` for an empty light curve.
    /// - `Advisory` when the JD-epoch advisory is escalated.
    pub fn fold(&self, opts: &FoldOptions) -> TransformResult<FoldedLightCurve> {
        let period = validate_period(opts.period.as_days())?;
        let wrap_phase = opts.resolved_wrap_phase(period)?;
        let time = self.time_values();
        let Some(&first) = time.first() else {
            return Err(TransformError::InsufficientSamples {
                operation: "fold",
                required: 1,
                found: 0,
            });
        };
        let epoch_time = opts.epoch_time.unwrap_or(first);

        let max_time = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if epoch_time > JD_THRESHOLD && max_time < JD_THRESHOLD {
            advisory::emit(Advisory::EpochLooksLikeJd { epoch_time, max_time })?;
        }

        let elapsed: Vec<f64> = time.iter().map(|t| (t - epoch_time) / period).collect();
        let raw_cycles: Vec<i64> = elapsed.iter().map(|x| (x + 0.5).floor() as i64).collect();
        let first_cycle = raw_cycles.iter().copied().min().unwrap_or(0);
        let cycles: Vec<i64> = raw_cycles.iter().map(|c| c - first_cycle).collect();

        let scale = if opts.normalize_phase { 1.0 } else { period };
        let phase: Vec<f64> = elapsed
            .iter()
            .map(|x| wrap_into(x - opts.epoch_phase, wrap_phase / scale) * scale)
            .collect();

        let mut parts = self.clone().into_parts();
        parts.columns.insert(
            TIME_ORIGINAL_COLUMN.to_string(),
            Column::float(time.clone()).with_unit(Unit::Day),
        );
        parts.columns.insert(CYCLE_COLUMN.to_string(), Column::int(cycles));
        let order = stable_argsort(&phase);
        parts.time = TimeAxis::new(phase, TimeFormat::Relative).with_scale(self.time().scale());
        let folded = LightCurve::from_parts(parts)?.take_unchecked(&order);

        let params = FoldParameters {
            period,
            epoch_time,
            epoch_phase: opts.epoch_phase,
            wrap_phase,
            normalize_phase: opts.normalize_phase,
        };
        Ok(FoldedLightCurve::from_inner(folded, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightcurve::series::LightCurveLike;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The flat linspace scenario (phase range and cycle span).
    // - Cycle invariance under epoch_phase shifts.
    // - Normalized phase, wrap_phase in both axis units and odd/even masks.
    // - Cycle boundaries and parity for an epoch away from the first sample.
    // - Column bookkeeping and option validation.
    // -------------------------------------------------------------------------

    fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + (stop - start) * i as f64 / (n - 1) as f64).collect()
    }

    fn flat_lc() -> LightCurve {
        LightCurve::new(linspace(0.0, 10.0, 100), vec![1.0; 100], Some(vec![0.0; 100].into()))
            .unwrap()
    }

    fn cycles_by_time(folded: &FoldedLightCurve) -> Vec<(f64, i64)> {
        let original = folded.time_original().unwrap();
        let cycle = folded.cycle().unwrap();
        let mut pairs: Vec<(f64, i64)> =
            original.iter().copied().zip(cycle.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs
    }

    #[test]
    // Purpose
    // -------
    // Folding a flat curve on P = 1 over [0, 10] gives the documented ranges.
    //
    // Given
    // -----
    // - time = linspace(0, 10, 100), flux = 1, flux_err = 0, period = 1.
    //
    // Expect
    // ------
    // - Every phase lies in [-0.5, 0.5) and both ends are approached.
    // - Cycles run from 0 to 10 inclusive.
    // - Phases are sorted ascending.
    fn flat_linspace_phase_and_cycle_ranges() {
        let folded = flat_lc().fold(&FoldOptions::new(1.0).unwrap()).unwrap();

        let phase = folded.phase();
        assert!(phase.iter().all(|p| (-0.5..0.5).contains(p)));
        assert!(phase.to_vec().windows(2).all(|w| w[0] <= w[1]));
        assert!(phase[0] < -0.49);
        assert!(phase[phase.len() - 1] > 0.49);

        let cycle = folded.cycle().unwrap();
        assert_eq!(cycle.iter().copied().min(), Some(0));
        assert_eq!(cycle.iter().copied().max(), Some(10));
        assert_eq!(folded.len(), 100);
    }

    #[test]
    // Purpose
    // -------
    // epoch_phase shifts phase values but never the cycle of a sample.
    //
    // Given
    // -----
    // - The flat linspace curve folded with epoch_phase 0, 0.3 and -0.45.
    //
    // Expect
    // ------
    // - Identical (time_original, cycle) pairs across all three folds.
    fn epoch_phase_does_not_change_cycles() {
        let lc = flat_lc();
        let base = lc.fold(&FoldOptions::new(1.0).unwrap()).unwrap();

        for shift in [0.3, -0.45] {
            let opts = FoldOptions::new(1.0).unwrap().with_epoch_phase(shift).unwrap();
            let shifted = lc.fold(&opts).unwrap();
            assert_eq!(cycles_by_time(&shifted), cycles_by_time(&base));
        }
    }

    #[test]
    fn epoch_phase_shifts_phase() {
        let lc = LightCurve::new(vec![0.0], vec![1.0], None).unwrap();
        let opts = FoldOptions::new(2.0).unwrap().with_epoch_phase(0.25).unwrap();
        let folded = lc.fold(&opts).unwrap();
        assert_abs_diff_eq!(folded.phase()[0], -0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // normalize_phase and wrap_phase select the phase units and range.
    //
    // Given
    // -----
    // - Samples every 0.1 d over 6 d, period 2.
    //
    // Expect
    // ------
    // - Default: phases in [-1, 1) days.
    // - normalize_phase: phases in [-0.5, 0.5).
    // - normalize_phase + wrap_phase 1: phases in [0, 1).
    fn phase_units_and_wrap_range() {
        let lc = LightCurve::new(linspace(0.0, 6.0, 61), vec![1.0; 61], None).unwrap();

        let days = lc.fold(&FoldOptions::new(2.0).unwrap()).unwrap();
        assert!(days.phase().iter().all(|p| (-1.0..1.0).contains(p)));

        let opts = FoldOptions::new(2.0).unwrap().with_normalize_phase(true);
        let unit = lc.fold(&opts).unwrap();
        assert!(unit.phase().iter().all(|p| (-0.5..0.5).contains(p)));

        let opts = opts.with_wrap_phase(1.0).unwrap();
        let positive = lc.fold(&opts).unwrap();
        assert!(positive.phase().iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    // Purpose
    // -------
    // Odd/even masks partition samples by cycle parity.
    //
    // Given
    // -----
    // - The flat linspace curve folded on P = 1.
    //
    // Expect
    // ------
    // - odd XOR even for every sample; odd exactly where cycle is odd.
    fn odd_even_masks_partition_samples() {
        let folded = flat_lc().fold(&FoldOptions::new(1.0).unwrap()).unwrap();
        let odd = folded.odd_mask().unwrap();
        let even = folded.even_mask().unwrap();
        let cycle = folded.cycle().unwrap();

        for i in 0..folded.len() {
            assert_ne!(odd[i], even[i]);
            assert_eq!(odd[i], cycle[i] % 2 == 1);
        }
    }

    fn sine_lc() -> LightCurve {
        let time = linspace(0.0, 10.0, 100);
        let flux: Vec<f64> = time
            .iter()
            .map(|t| ((4.0 * 0.75 + t - 3.0) * 2.0 * std::f64::consts::PI / 4.0).sin())
            .collect();
        LightCurve::builder(time).flux(flux).targetid(999_i64).label("mystar").build().unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Cycle boundaries sit half a period before each epoch repetition when
    // the epoch is not the first sample.
    //
    // Given
    // -----
    // - time = linspace(0, 10, 100), period 4, epoch_time 3, epoch_phase 0.5.
    // - Both normalize_phase settings.
    //
    // Expect
    // ------
    // - cycle 0 on [0, 1), 1 on [1, 5), 2 on [5, 9), 3 on [9, 10].
    // - even_mask true exactly on cycles 0 and 2; odd = !even.
    fn offset_epoch_assigns_cycles_and_parity() {
        let lc = sine_lc();
        let expected_cycle = |t: f64| -> i64 {
            match t {
                t if t < 1.0 => 0,
                t if t < 5.0 => 1,
                t if t < 9.0 => 2,
                _ => 3,
            }
        };

        for normalize in [false, true] {
            let opts = FoldOptions::new(4.0)
                .unwrap()
                .with_epoch_time(3.0)
                .unwrap()
                .with_epoch_phase(0.5)
                .unwrap()
                .with_normalize_phase(normalize);
            let folded = lc.fold(&opts).unwrap();
            let original = folded.time_original().unwrap();
            let cycle = folded.cycle().unwrap();
            let odd = folded.odd_mask().unwrap();
            let even = folded.even_mask().unwrap();

            assert_eq!(odd.len(), folded.len());
            for i in 0..folded.len() {
                let t = original[i];
                let want = expected_cycle(t);
                assert_eq!(cycle[i], want, "t = {t}, normalize = {normalize}");
                assert_eq!(even[i], want % 2 == 0, "t = {t}, normalize = {normalize}");
                assert_ne!(odd[i], even[i]);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // wrap_phase is read in the units of the folded axis.
    //
    // Given
    // -----
    // - The offset-epoch sine curve folded with wrap_phase 0.25, once in
    //   days and once normalized.
    //
    // Expect
    // ------
    // - The last (largest) phase approaches 0.25 from below in both cases:
    //   0.25 d of a 4 d period, or a quarter of a period.
    // - Day phases span [0.25 - 4, 0.25); normalized ones [-0.75, 0.25).
    fn wrap_phase_follows_axis_units() {
        let lc = sine_lc();
        let base = FoldOptions::new(4.0)
            .unwrap()
            .with_epoch_time(3.0)
            .unwrap()
            .with_epoch_phase(0.5)
            .unwrap()
            .with_wrap_phase(0.25)
            .unwrap();

        let days = lc.fold(&base).unwrap();
        let phase = days.phase();
        assert_abs_diff_eq!(phase[phase.len() - 1], 0.25, epsilon = 0.15);
        assert!(phase.iter().all(|p| (-3.75..0.25).contains(p)));
        assert_eq!(days.params().wrap_phase, 0.25);

        let normalized = lc.fold(&base.with_normalize_phase(true)).unwrap();
        let phase = normalized.phase();
        assert_abs_diff_eq!(phase[phase.len() - 1], 0.25, epsilon = 0.15);
        assert!(phase.iter().all(|p| (-0.75..0.25).contains(p)));
    }

    #[test]
    // Purpose
    // -------
    // An epoch before the first sample still numbers cycles from zero.
    //
    // Given
    // -----
    // - The flat linspace curve, period 1, epoch_time -0.1.
    //
    // Expect
    // ------
    // - Cycles span 0..=10.
    fn early_epoch_cycles_start_at_zero() {
        let opts = FoldOptions::new(1.0).unwrap().with_epoch_time(-0.1).unwrap();
        let folded = flat_lc().fold(&opts).unwrap();
        let cycle = folded.cycle().unwrap();
        assert_eq!(cycle.iter().copied().min(), Some(0));
        assert_eq!(cycle.iter().copied().max(), Some(10));
    }

    #[test]
    fn folded_rows_keep_columns_aligned() {
        let lc = LightCurve::builder(vec![0.0, 0.6, 1.2])
            .flux(vec![1.0, 2.0, 3.0])
            .cadenceno(vec![10, 11, 12])
            .build()
            .unwrap();

        let folded = lc.fold(&FoldOptions::new(1.0).unwrap()).unwrap();

        // 0.6 wraps to -0.4, 0.0 to 0.0, 1.2 to 0.2
        assert_eq!(folded.inner().flux().to_vec(), vec![2.0, 1.0, 3.0]);
        assert_eq!(folded.inner().cadenceno().unwrap().to_vec(), vec![11, 10, 12]);
        assert_eq!(folded.time_original().unwrap().to_vec(), vec![0.6, 0.0, 1.2]);
        assert_eq!(folded.cycle().unwrap().to_vec(), vec![1, 0, 1]);
        assert_eq!(folded.inner().time().format(), TimeFormat::Relative);
    }

    #[test]
    fn jd_epoch_on_reduced_time_still_folds() {
        let lc = LightCurve::new(vec![1000.0, 1001.0], vec![1.0, 1.0], None).unwrap();
        let opts = FoldOptions::new(0.5).unwrap().with_epoch_time(2_455_000.0).unwrap();
        assert!(lc.fold(&opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Invalid options and empty inputs are rejected with named errors.
    //
    // Given
    // -----
    // - period 0, NaN period, wrap_phase 0, an empty light curve.
    // - wrap_phase 1.5 on a normalized fold, 2.5 days on a 2-day fold.
    //
    // Expect
    // ------
    // - InvalidPeriod, InvalidWrapPhase, InsufficientSamples.
    // - The wrap bound follows the folded axis units.
    fn invalid_inputs_are_rejected() {
        assert_eq!(FoldOptions::new(0.0).unwrap_err(), TransformError::InvalidPeriod(0.0));
        assert!(matches!(FoldOptions::new(f64::NAN), Err(TransformError::InvalidPeriod(_))));
        assert!(matches!(
            FoldOptions::new(1.0).unwrap().with_wrap_phase(0.0),
            Err(TransformError::InvalidWrapPhase { .. })
        ));

        let lc = flat_lc();
        let normalized =
            FoldOptions::new(2.0).unwrap().with_normalize_phase(true).with_wrap_phase(1.5).unwrap();
        assert_eq!(
            lc.fold(&normalized).unwrap_err(),
            TransformError::InvalidWrapPhase { value: 1.5, max: 1.0 }
        );
        let days = normalized.with_normalize_phase(false);
        assert!(lc.fold(&days).is_ok());
        let too_wide = days.with_wrap_phase(2.5).unwrap();
        assert_eq!(
            lc.fold(&too_wide).unwrap_err(),
            TransformError::InvalidWrapPhase { value: 2.5, max: 2.0 }
        );

        let empty = LightCurve::new(Vec::<f64>::new(), Vec::<f64>::new(), None).unwrap();
        assert!(matches!(
            empty.fold(&FoldOptions::new(1.0).unwrap()),
            Err(TransformError::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn folded_variant_survives_outlier_removal() {
        let mut lc = flat_lc();
        lc.flux_mut()[5] = 50.0;
        let folded = lc.fold(&FoldOptions::new(1.0).unwrap()).unwrap();
        let opts = crate::transforms::outliers::OutlierOptions::new(3.0).unwrap();

        let out = folded.remove_outliers(&opts).unwrap();

        assert_eq!(out.lc.len(), 99);
        assert_eq!(out.lc.period(), 1.0);
        assert!(out.lc.cycle().is_some());
    }
}
