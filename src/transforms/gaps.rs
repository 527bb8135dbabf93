//! transforms::gaps — inserting placeholder samples into sampling gaps.
//!
//! Purpose
//! -------
//! Turn a gapped light curve into one sampled on a regular grid by inserting
//! synthetic rows at every missing cadence.
//!
//! Key behaviors
//! -------------
//! - With cadence numbers, every skipped cadence between two consecutive
//!   samples becomes one inserted row carrying that cadence number.
//! - Without them, the grid step is the median positive time difference and
//!   a gap of `dt` holds `round(dt / step) - 1` missing samples, so a gap
//!   is only filled once it exceeds about 1.5 steps.
//! - Inserted rows are spaced evenly between their neighbours, carry NaN
//!   flux/flux_err, zero quality and NaN auxiliary floats.
//! - [`GapFillMethod::Linear`] additionally interpolates flux and flux_err
//!   over time into every NaN sample that has finite neighbours on both
//!   sides (pre-existing NaNs included).
//!
//! Invariants & assumptions
//! ------------------------
//! - Output is sorted by time; original rows are kept verbatim (duplicate
//!   timestamps included) and units and metadata are unchanged.

use ndarray::Array1;

use crate::lightcurve::data::LightCurve;
use crate::transforms::errors::TransformResult;
use crate::utils::{finite_sorted_pairs, interp, median_positive_step, Outside};

/// What goes into inserted (and, for `Linear`, pre-existing NaN) samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapFillMethod {
    /// Leave flux and flux_err NaN.
    #[default]
    Nan,
    /// Linearly interpolate flux and flux_err in time.
    Linear,
}

/// GapFillOptions — configuration for [`LightCurve::fill_gaps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GapFillOptions {
    pub method: GapFillMethod,
}

impl GapFillOptions {
    pub fn new(method: GapFillMethod) -> Self {
        GapFillOptions { method }
    }
}

impl LightCurve {
    /// Insert placeholder rows at every missing cadence.
    ///
    /// Returns
    /// -------
    /// `TransformResult<LightCurve>`
    ///   A time-sorted light curve with no gaps wider than the grid step.
    ///   Light curves with fewer than two samples come back sorted and
    ///   otherwise unchanged.
    ///
    /// Errors
    /// ------
    /// - Propagates `LightCurveError` from rebuilding the table.
    pub fn fill_gaps(&self, opts: &GapFillOptions) -> TransformResult<LightCurve> {
        let sorted = self.sort_by_time();
        let time = sorted.time_values().to_vec();

        let mut rows: Vec<Option<usize>> = Vec::with_capacity(time.len());
        let mut new_time: Vec<f64> = Vec::with_capacity(time.len());
        let mut new_cadence: Vec<i64> = Vec::new();
        let cadenceno = sorted.cadenceno().map(|c| c.to_vec());
        let step = median_positive_step(&time);

        for i in 0..time.len() {
            if i > 0 {
                let missing = match (&cadenceno, step) {
                    (Some(c), _) => (c[i] - c[i - 1] - 1).max(0) as usize,
                    (None, Some(step)) => {
                        (((time[i] - time[i - 1]) / step).round() as i64 - 1).max(0) as usize
                    }
                    (None, None) => 0,
                };
                let dt = (time[i] - time[i - 1]) / (missing + 1) as f64;
                for k in 1..=missing {
                    rows.push(None);
                    new_time.push(time[i - 1] + dt * k as f64);
                    if let Some(c) = &cadenceno {
                        new_cadence.push(c[i - 1] + k as i64);
                    }
                }
            }
            rows.push(Some(i));
            new_time.push(time[i]);
            if let Some(c) = &cadenceno {
                new_cadence.push(c[i]);
            }
        }
        let inserted = rows.iter().filter(|r| r.is_none()).count();
        tracing::debug!(inserted, "filled gaps");

        let axis = sorted.time().with_values(new_time);
        let cadence = cadenceno.map(|_| Array1::from(new_cadence));
        let mut out = sorted.take_or_fill(&rows, axis, cadence)?;

        if opts.method == GapFillMethod::Linear {
            let t = out.time_values().to_vec();
            let flux = interpolate_nans(&t, &out.flux().to_vec());
            let flux_err = interpolate_nans(&t, &out.flux_err().to_vec());
            out.flux_mut().assign(&flux);
            out.flux_err_mut().assign(&flux_err);
        }
        Ok(out)
    }
}

/// Replace bracketed NaNs in `values` by linear interpolation over `time`.
fn interpolate_nans(time: &[f64], values: &[f64]) -> Array1<f64> {
    let (xp, fp) = finite_sorted_pairs(time, values);
    time.iter()
        .zip(values)
        .map(|(&t, &v)| if v.is_nan() { interp(t, &xp, &fp, Outside::Nan) } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Time-step based filling (NaN rows, spacing, sort order).
    // - Cadence based filling (cadence numbers and quality of new rows).
    // - Linear filling of inserted and pre-existing NaNs.
    // - Sub-threshold jitter is not treated as a gap.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Missing multiples of the step are inserted as NaN rows.
    //
    // Given
    // -----
    // - time [0, 1, 2, 5, 6], flux [1, 2, 3, 6, 7].
    //
    // Expect
    // ------
    // - time [0..=6]; flux NaN at t = 3 and 4; original values untouched.
    fn inserts_nan_rows_at_missing_steps() {
        let lc = LightCurve::new(
            vec![0.0, 1.0, 2.0, 5.0, 6.0],
            vec![1.0, 2.0, 3.0, 6.0, 7.0],
            Some(vec![0.1; 5].into()),
        )
        .unwrap();

        let filled = lc.fill_gaps(&GapFillOptions::default()).unwrap();

        assert_eq!(filled.time_values().to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(filled.flux()[3].is_nan() && filled.flux()[4].is_nan());
        assert!(filled.flux_err()[3].is_nan());
        assert_eq!(filled.flux()[5], 6.0);
    }

    #[test]
    // Purpose
    // -------
    // Cadence numbers drive filling when present.
    //
    // Given
    // -----
    // - cadenceno [10, 11, 14], time [0, 0.02, 0.08], quality [1, 1, 1].
    //
    // Expect
    // ------
    // - cadenceno [10, 11, 12, 13, 14]; new rows at 0.04 and 0.06 with
    //   quality 0.
    fn cadence_numbers_drive_filling() {
        let lc = LightCurve::builder(vec![0.0, 0.02, 0.08])
            .flux(vec![1.0, 1.0, 1.0])
            .cadenceno(vec![10, 11, 14])
            .quality(vec![1u32, 1, 1])
            .build()
            .unwrap();

        let filled = lc.fill_gaps(&GapFillOptions::default()).unwrap();

        assert_eq!(filled.cadenceno().unwrap().to_vec(), vec![10, 11, 12, 13, 14]);
        assert_abs_diff_eq!(filled.time_values()[2], 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(filled.time_values()[3], 0.06, epsilon = 1e-12);
        assert_eq!(filled.quality().unwrap().to_vec(), vec![1, 1, 0, 0, 1]);
    }

    #[test]
    fn linear_method_interpolates_all_bracketed_nans() {
        let lc = LightCurve::new(
            vec![0.0, 1.0, 2.0, 4.0],
            vec![f64::NAN, 1.0, f64::NAN, 5.0],
            None,
        )
        .unwrap();

        let filled = lc.fill_gaps(&GapFillOptions::new(GapFillMethod::Linear)).unwrap();

        assert!(filled.flux()[0].is_nan());
        assert_abs_diff_eq!(filled.flux()[2], 2.333_333_333_333_333, epsilon = 1e-9);
        assert_abs_diff_eq!(filled.flux()[3], 3.666_666_666_666_667, epsilon = 1e-9);
        assert_eq!(filled.len(), 5);
    }

    #[test]
    fn jitter_is_not_a_gap() {
        let lc = LightCurve::new(vec![0.0, 1.0, 2.4, 3.4], vec![1.0; 4], None).unwrap();
        let filled = lc.fill_gaps(&GapFillOptions::default()).unwrap();
        assert_eq!(filled.len(), 4);
    }
}
