//! alignment::interpolate — resampling a light curve onto another's time axis.
//!
//! Purpose
//! -------
//! Align light curves that share no cadence numbers (different missions,
//! different cadences) by evaluating the source at the reference times.
//!
//! Key behaviors
//! -------------
//! - The source time axis is first converted into the reference's time
//!   format.
//! - Flux, flux_err, the floating mission fields and float columns are
//!   linearly interpolated between finite source samples.
//! - Quality, integer, boolean and text columns take the nearest source
//!   sample.
//! - Reference times outside the source's time range get fill values (NaN
//!   floats) unless `extrapolate`, which repeats the edge samples.
//! - The output carries the reference's time axis, and its cadence numbers
//!   when the reference has them.

use ndarray::Array1;

use crate::alignment::errors::AlignResult;
use crate::lightcurve::column::ColumnData;
use crate::lightcurve::data::LightCurve;
use crate::utils::{finite_sorted_pairs, interp, stable_argsort, Outside};

/// Resample `source` at `reference`'s timestamps.
///
/// Errors
/// ------
/// - `LightCurveError::IncompatibleTimeFormat` (wrapped) when the two time
///   formats cannot be converted into each other.
pub fn interpolate_to_lc(
    source: &LightCurve, reference: &LightCurve, extrapolate: bool,
) -> AlignResult<LightCurve> {
    let source_time = source.time().to_format(reference.time().format())?;
    let t_src = source_time.values().to_vec();
    let t_ref = reference.time_values().to_vec();
    let outside = if extrapolate { Outside::Clamp } else { Outside::Nan };

    let order = stable_argsort(&t_src);
    let sorted_t: Vec<f64> = order.iter().map(|&i| t_src[i]).collect();
    let nearest: Vec<Option<usize>> = t_ref
        .iter()
        .map(|&t| nearest_index(&sorted_t, t, extrapolate).map(|k| order[k]))
        .collect();

    let resample = |values: &Array1<f64>| -> Array1<f64> {
        let (xp, fp) = finite_sorted_pairs(&t_src, &values.to_vec());
        t_ref.iter().map(|&t| interp(t, &xp, &fp, outside)).collect()
    };

    let base =
        source.take_or_fill(&nearest, reference.time().clone(), reference.cadenceno().cloned())?;
    let mut parts = base.into_parts();
    parts.flux = resample(source.flux());
    parts.flux_err = resample(source.flux_err());
    let mission = source.mission_columns();
    parts.mission_columns.centroid_col = mission.centroid_col.as_ref().map(&resample);
    parts.mission_columns.centroid_row = mission.centroid_row.as_ref().map(&resample);
    parts.mission_columns.background = mission.background.as_ref().map(&resample);
    for (name, column) in parts.columns.iter_mut() {
        if let Some(ColumnData::Float(values)) = source.column(name).map(|c| &c.data) {
            column.data = ColumnData::Float(resample(values));
        }
    }
    tracing::debug!(
        source = source.len(),
        reference = reference.len(),
        extrapolate,
        "interpolated onto reference time"
    );
    Ok(LightCurve::from_parts(parts)?)
}

/// Position in `sorted` of the sample closest to `t`; `None` outside the
/// sampled range unless `extrapolate`.
fn nearest_index(sorted: &[f64], t: f64, extrapolate: bool) -> Option<usize> {
    let (&first, &last) = (sorted.first()?, sorted.last()?);
    if !extrapolate && (t < first || t > last) {
        return None;
    }
    let upper = sorted.partition_point(|&v| v < t);
    if upper == 0 {
        return Some(0);
    }
    if upper == sorted.len() {
        return Some(sorted.len() - 1);
    }
    if t - sorted[upper - 1] <= sorted[upper] - t {
        Some(upper - 1)
    } else {
        Some(upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightcurve::time::TimeFormat;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Linear interpolation inside the source range, NaN outside.
    // - Edge repetition with `extrapolate`.
    // - Nearest-sample quality and reference cadence numbers.
    // - Time-format conversion before interpolating.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Flux is interpolated at reference times and NaN past the source range.
    //
    // Given
    // -----
    // - source t = [0, 1, 2], flux [0, 10, 20], quality [1, 2, 4].
    // - reference t = [0.4, 1.6, 3.0] with cadences [7, 8, 9].
    //
    // Expect
    // ------
    // - flux [4, 16, NaN]; quality [1, 4, 0]; cadences [7, 8, 9].
    // - with extrapolate: last flux 20, last quality 4.
    fn interpolates_inside_range() {
        let source = LightCurve::builder(vec![0.0, 1.0, 2.0])
            .flux(vec![0.0, 10.0, 20.0])
            .quality(vec![1u32, 2, 4])
            .build()
            .unwrap();
        let reference = LightCurve::builder(vec![0.4, 1.6, 3.0])
            .flux(vec![1.0; 3])
            .cadenceno(vec![7, 8, 9])
            .build()
            .unwrap();

        let out = interpolate_to_lc(&source, &reference, false).unwrap();
        assert_abs_diff_eq!(out.flux()[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.flux()[1], 16.0, epsilon = 1e-12);
        assert!(out.flux()[2].is_nan());
        assert_eq!(out.quality().unwrap().to_vec(), vec![1, 4, 0]);
        assert_eq!(out.cadenceno().unwrap().to_vec(), vec![7, 8, 9]);

        let out = interpolate_to_lc(&source, &reference, true).unwrap();
        assert_abs_diff_eq!(out.flux()[2], 20.0, epsilon = 1e-12);
        assert_eq!(out.quality().unwrap()[2], 4);
    }

    #[test]
    fn converts_time_format_first() {
        let source = LightCurve::builder(vec![2167.0, 2168.0])
            .time_format(TimeFormat::Bkjd)
            .flux(vec![1.0, 3.0])
            .build()
            .unwrap();
        let reference = LightCurve::builder(vec![0.5])
            .time_format(TimeFormat::Btjd)
            .flux(vec![0.0])
            .build()
            .unwrap();

        let out = interpolate_to_lc(&source, &reference, false).unwrap();

        assert_abs_diff_eq!(out.flux()[0], 2.0, epsilon = 1e-9);
        assert_eq!(out.time().format(), TimeFormat::Btjd);
    }

    #[test]
    fn nearest_index_breaks_ties_low() {
        let sorted = [0.0, 1.0, 2.0];
        assert_eq!(nearest_index(&sorted, 0.5, false), Some(0));
        assert_eq!(nearest_index(&sorted, 0.6, false), Some(1));
        assert_eq!(nearest_index(&sorted, 2.5, false), None);
        assert_eq!(nearest_index(&sorted, 2.5, true), Some(2));
    }
}
