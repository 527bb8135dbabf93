//! lightcurve::ops — normalization, flux-column selection, concatenation,
//! and arithmetic.
//!
//! Purpose
//! -------
//! Host the whole-light-curve operations that are not transforms in the
//! signal-processing sense: rescaling flux to a relative unit, switching
//! which column plays the role of flux, appending light curves end-to-end,
//! and element-wise arithmetic with error propagation.
//!
//! Key behaviors
//! -------------
//! - [`LightCurve::normalize`] divides by the NaN-median flux and flags the
//!   result with `NORMALIZED = true`. Zero-centred and negative-median inputs
//!   raise advisories but still complete.
//! - [`LightCurve::append`] converts the appended time axes into the
//!   receiver's format and fills columns absent from some inputs.
//! - Scalar arithmetic scales uncertainties by `|c|` for `*` and `/`;
//!   light-curve arithmetic (`try_*`) combines uncertainties in quadrature.
//!
//! Invariants & assumptions
//! ------------------------
//! - Metadata of the receiver is kept; appended light curves contribute
//!   rows only.
//! - Concatenation allocates each output column once: O(total rows).

use std::collections::BTreeMap;
use std::ops::{Add, Div, Mul, Sub};

use ndarray::Array1;

use crate::advisory::{self, Advisory};
use crate::lightcurve::column::{Column, ColumnData};
use crate::lightcurve::data::{LightCurve, LightCurveParts};
use crate::lightcurve::errors::{LightCurveError, LightCurveResult};
use crate::lightcurve::meta::keys;
use crate::lightcurve::mission::MissionColumns;
use crate::lightcurve::units::Unit;
use crate::utils::{nan_median, nan_population_std};

impl LightCurve {
    /// Divide flux and flux_err by the median flux.
    ///
    /// Parameters
    /// ----------
    /// - `unit`: `&str`
    ///   One of `"unscaled"` / `"dimensionless"`, `"percent"`, `"ppt"`,
    ///   `"ppm"`. The normalized ratio is multiplied by the unit's scale.
    ///
    /// Returns
    /// -------
    /// `LightCurveResult<LightCurve>`
    ///   A new light curve with relative flux and `NORMALIZED = true`.
    ///
    /// Errors
    /// ------
    /// - `UnrecognizedUnit` for unknown unit strings, `NotRelativeUnit` for
    ///   parseable but non-relative units (e.g. `"electron/s"`).
    /// - `Advisory` when the policy escalates the zero-centred or negative
    ///   median advisories.
    ///
    /// Notes
    /// -----
    /// - A light curve already in dimensionless units whose median rounds to
    ///   one is returned unchanged apart from the flag.
    pub fn normalize(&self, unit: &str) -> LightCurveResult<LightCurve> {
        let target: Unit = unit.parse()?;
        let scale =
            target.relative_scale().ok_or_else(|| LightCurveError::NotRelativeUnit(unit.into()))?;

        let flux = self.flux().to_vec();
        let median = nan_median(&flux);

        let mut out = self.clone();
        if *self.flux_unit() == Unit::Dimensionless && median.round() == 1.0 && scale == 1.0 {
            out.meta_mut().insert(keys::NORMALIZED, true);
            return Ok(out);
        }

        let std = nan_population_std(&flux);
        if median.abs() <= 0.5 * std {
            advisory::emit(Advisory::ZeroCenteredFlux { median, std })?;
        }
        if median < 0.0 {
            advisory::emit(Advisory::NegativeFlux { median })?;
        }

        let factor = scale / median;
        out.flux_mut().mapv_inplace(|v| v * factor);
        out.flux_err_mut().mapv_inplace(|v| v * factor);
        let mut parts = out.into_parts();
        parts.flux_unit = target;
        parts.meta.insert(keys::NORMALIZED, true);
        LightCurve::from_parts(parts)
    }

    /// Use a named float column as the light curve's flux.
    ///
    /// Parameters
    /// ----------
    /// - `column`: `&str`
    ///   Name of the new flux column (e.g. `"sap_flux"`).
    /// - `flux_err_column`: `Option<&str>`
    ///   Name of the matching uncertainty column. Defaults to
    ///   `"{column}_err"`; when that default is absent, errors become NaN.
    ///
    /// Errors
    /// ------
    /// - `MissingColumn` when `column` (or an explicitly named error column)
    ///   does not exist; `ColumnTypeMismatch` for non-float columns.
    /// - `UnitMismatch` when flux and error columns carry different units.
    pub fn select_flux(
        &self, column: &str, flux_err_column: Option<&str>,
    ) -> LightCurveResult<LightCurve> {
        let flux = self.float_column(column)?.to_owned();
        let flux_unit = self.unit_of(column);

        let (flux_err, err_unit) = match flux_err_column {
            Some(name) => (self.float_column(name)?.to_owned(), Some(self.unit_of(name))),
            None => {
                let default = format!("{column}_err");
                match self.float_column(&default) {
                    Ok(values) => (values.to_owned(), Some(self.unit_of(&default))),
                    Err(_) => (Array1::from_elem(self.len(), f64::NAN), None),
                }
            }
        };
        if let Some(err_unit) = err_unit {
            if err_unit != flux_unit {
                return Err(LightCurveError::UnitMismatch { expected: flux_unit, found: err_unit });
            }
        }

        let normalized = flux_unit.is_relative();
        let mut parts = self.clone().into_parts();
        parts.flux = flux;
        parts.flux_err = flux_err;
        parts.flux_unit = flux_unit;
        parts.meta.insert(keys::FLUX_ORIGIN, column);
        parts.meta.insert(keys::NORMALIZED, normalized);
        LightCurve::from_parts(parts)
    }

    fn unit_of(&self, name: &str) -> Unit {
        match name {
            "time" => Unit::Day,
            "flux" | "flux_err" => self.flux_unit().clone(),
            "centroid_col" | "centroid_row" => Unit::Pixel,
            "background" => self.flux_unit().clone(),
            _ => self.column(name).map(|c| c.unit.clone()).unwrap_or_default(),
        }
    }

    /// Append `other` after this light curve.
    pub fn append(&self, other: &LightCurve) -> LightCurveResult<LightCurve> {
        self.append_all(std::slice::from_ref(other))
    }

    /// Append several light curves, in order, after this one.
    ///
    /// Errors
    /// ------
    /// - `IncompatibleTimeFormat` when a time axis cannot be converted into
    ///   this light curve's format.
    /// - `UnitMismatch` when flux units differ.
    /// - `ColumnTypeMismatch` when a shared auxiliary column changes kind.
    ///
    /// Notes
    /// -----
    /// - Mission fields and auxiliary columns present in only some inputs are
    ///   filled (NaN floats, zero integers/quality, `false`, empty text).
    /// - Rows are not re-sorted; see `LightCurveCollection::stitch`.
    pub fn append_all(&self, others: &[LightCurve]) -> LightCurveResult<LightCurve> {
        let all: Vec<&LightCurve> = std::iter::once(self).chain(others.iter()).collect();
        let total: usize = all.iter().map(|lc| lc.len()).sum();
        let format = self.time().format();

        let mut time = Vec::with_capacity(total);
        let mut flux = Vec::with_capacity(total);
        let mut flux_err = Vec::with_capacity(total);
        for lc in &all {
            if lc.flux_unit() != self.flux_unit() {
                return Err(LightCurveError::UnitMismatch {
                    expected: self.flux_unit().clone(),
                    found: lc.flux_unit().clone(),
                });
            }
            time.extend(lc.time().to_format(format)?.values().iter().copied());
            flux.extend(lc.flux().iter().copied());
            flux_err.extend(lc.flux_err().iter().copied());
        }

        let mission_columns = MissionColumns {
            cadenceno: concat_optional(&all, total, |lc| lc.cadenceno(), 0),
            quality: concat_optional(&all, total, |lc| lc.quality(), 0),
            centroid_col: concat_optional(&all, total, |lc| lc.centroid_col(), f64::NAN),
            centroid_row: concat_optional(&all, total, |lc| lc.centroid_row(), f64::NAN),
            background: concat_optional(&all, total, |lc| lc.background(), f64::NAN),
        };

        let mut columns: BTreeMap<String, Column> = BTreeMap::new();
        let names: std::collections::BTreeSet<&String> =
            all.iter().flat_map(|lc| lc.columns().keys()).collect();
        for name in names {
            let template = all
                .iter()
                .find_map(|lc| lc.column(name))
                .ok_or_else(|| LightCurveError::MissingColumn(name.clone()))?;
            let pieces: Vec<ColumnData> = all
                .iter()
                .map(|lc| match lc.column(name) {
                    Some(col) => col.data.clone(),
                    None => template.data.filled_like(lc.len()),
                })
                .collect();
            let data = ColumnData::concat(name, &pieces)?;
            columns.insert(name.clone(), Column { data, unit: template.unit.clone() });
        }

        let base = self.clone().into_parts();
        LightCurve::from_parts(LightCurveParts {
            time: base.time.with_values(time),
            flux: Array1::from_vec(flux),
            flux_err: Array1::from_vec(flux_err),
            flux_unit: base.flux_unit,
            mission: base.mission,
            mission_columns,
            columns,
            meta: base.meta,
            attrs: base.attrs,
        })
    }

    /// Add another light curve element-wise; errors add in quadrature.
    pub fn try_add(&self, other: &LightCurve) -> LightCurveResult<LightCurve> {
        self.combine(other, |a, b| a + b, |_, _, _, ea, eb| ea.hypot(eb))
    }

    /// Subtract another light curve element-wise; errors add in quadrature.
    pub fn try_sub(&self, other: &LightCurve) -> LightCurveResult<LightCurve> {
        self.combine(other, |a, b| a - b, |_, _, _, ea, eb| ea.hypot(eb))
    }

    /// Multiply element-wise; relative errors add in quadrature.
    pub fn try_mul(&self, other: &LightCurve) -> LightCurveResult<LightCurve> {
        self.combine(other, |a, b| a * b, relative_quadrature)
    }

    /// Divide element-wise; relative errors add in quadrature.
    pub fn try_div(&self, other: &LightCurve) -> LightCurveResult<LightCurve> {
        self.combine(other, |a, b| a / b, relative_quadrature)
    }

    fn combine(
        &self, other: &LightCurve, value: impl Fn(f64, f64) -> f64,
        error: impl Fn(f64, f64, f64, f64, f64) -> f64,
    ) -> LightCurveResult<LightCurve> {
        if self.len() != other.len() {
            return Err(LightCurveError::LengthMismatch { left: self.len(), right: other.len() });
        }
        let mut out = self.clone();
        let n = self.len();
        let mut new_flux = Array1::zeros(n);
        let mut new_err = Array1::zeros(n);
        for i in 0..n {
            let (a, b) = (self.flux()[i], other.flux()[i]);
            let f = value(a, b);
            new_flux[i] = f;
            new_err[i] = error(f, a, b, self.flux_err()[i], other.flux_err()[i]);
        }
        out.flux_mut().assign(&new_flux);
        out.flux_err_mut().assign(&new_err);
        Ok(out)
    }

    fn scaled(&self, value: impl Fn(f64) -> f64, error_scale: f64) -> LightCurve {
        let mut out = self.clone();
        out.flux_mut().mapv_inplace(&value);
        out.flux_err_mut().mapv_inplace(|e| e * error_scale);
        out
    }
}

fn relative_quadrature(f: f64, a: f64, b: f64, ea: f64, eb: f64) -> f64 {
    f.abs() * (ea / a).hypot(eb / b)
}

fn concat_optional<T: Copy>(
    all: &[&LightCurve], total: usize, field: impl Fn(&LightCurve) -> Option<&Array1<T>>,
    fill: T,
) -> Option<Array1<T>> {
    if all.iter().all(|lc| field(*lc).is_none()) {
        return None;
    }
    let mut out = Vec::with_capacity(total);
    for lc in all {
        match field(*lc) {
            Some(values) => out.extend(values.iter().copied()),
            None => out.extend(std::iter::repeat(fill).take(lc.len())),
        }
    }
    Some(Array1::from_vec(out))
}

impl Add<f64> for &LightCurve {
    type Output = LightCurve;

    fn add(self, rhs: f64) -> LightCurve {
        self.scaled(|v| v + rhs, 1.0)
    }
}

impl Sub<f64> for &LightCurve {
    type Output = LightCurve;

    fn sub(self, rhs: f64) -> LightCurve {
        self.scaled(|v| v - rhs, 1.0)
    }
}

impl Mul<f64> for &LightCurve {
    type Output = LightCurve;

    fn mul(self, rhs: f64) -> LightCurve {
        self.scaled(|v| v * rhs, rhs.abs())
    }
}

impl Div<f64> for &LightCurve {
    type Output = LightCurve;

    fn div(self, rhs: f64) -> LightCurve {
        self.scaled(|v| v / rhs, 1.0 / rhs.abs())
    }
}

impl Add<f64> for LightCurve {
    type Output = LightCurve;

    fn add(self, rhs: f64) -> LightCurve {
        &self + rhs
    }
}

impl Sub<f64> for LightCurve {
    type Output = LightCurve;

    fn sub(self, rhs: f64) -> LightCurve {
        &self - rhs
    }
}

impl Mul<f64> for LightCurve {
    type Output = LightCurve;

    fn mul(self, rhs: f64) -> LightCurve {
        &self * rhs
    }
}

impl Div<f64> for LightCurve {
    type Output = LightCurve;

    fn div(self, rhs: f64) -> LightCurve {
        &self / rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightcurve::meta::MetaValue;
    use crate::lightcurve::mission::Mission;
    use crate::lightcurve::time::TimeFormat;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - normalize: units, flags, already-normalized shortcut, bad units.
    // - select_flux: default error column, FLUX_ORIGIN, unit mismatch.
    // - append: time-format conversion and column filling.
    // - arithmetic error propagation.
    //
    // They intentionally DO NOT cover:
    // - The Error advisory policy (a process-wide switch), which has its own
    //   integration-test binary.
    // -------------------------------------------------------------------------

    fn electron_lc() -> LightCurve {
        LightCurve::builder(vec![1.0, 2.0, 3.0])
            .flux(vec![90.0, 100.0, 110.0])
            .flux_err(vec![10.0, 10.0, 10.0])
            .flux_unit(Unit::ElectronPerSecond)
            .column(
                "sap_flux",
                Column::float(vec![1.0, 2.0, 3.0]).with_unit(Unit::ElectronPerSecond),
            )
            .column(
                "sap_flux_err",
                Column::float(vec![0.1, 0.2, 0.3]).with_unit(Unit::ElectronPerSecond),
            )
            .build()
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // normalize divides by the median and scales to the requested unit.
    //
    // Given
    // -----
    // - Flux [90, 100, 110] e-/s with errors 10.
    //
    // Expect
    // ------
    // - "unscaled": flux [0.9, 1, 1.1], errors 0.1, NORMALIZED = true.
    // - "ppt": flux [900, 1000, 1100], unit ppt.
    fn normalize_divides_by_median() {
        let lc = electron_lc();

        let norm = lc.normalize("unscaled").unwrap();
        assert_relative_eq!(norm.flux()[0], 0.9, epsilon = 1e-12);
        assert_relative_eq!(norm.flux_err()[1], 0.1, epsilon = 1e-12);
        assert_eq!(*norm.flux_unit(), Unit::Dimensionless);
        assert!(norm.is_normalized());

        let ppt = lc.normalize("ppt").unwrap();
        assert_relative_eq!(ppt.flux()[2], 1100.0, epsilon = 1e-9);
        assert_eq!(*ppt.flux_unit(), Unit::PartsPerThousand);
    }

    #[test]
    fn normalize_rejects_unknown_and_non_relative_units() {
        let lc = electron_lc();
        assert_eq!(
            lc.normalize("furlong").unwrap_err(),
            LightCurveError::UnrecognizedUnit("furlong".into())
        );
        assert!(matches!(lc.normalize("e-/s"), Err(LightCurveError::NotRelativeUnit(_))));
    }

    #[test]
    fn normalize_keeps_already_normalized_values() {
        let lc = LightCurve::new(vec![1.0, 2.0, 3.0], vec![0.99, 1.0, 1.02], None).unwrap();
        let norm = lc.normalize("dimensionless").unwrap();
        assert_eq!(norm.flux(), lc.flux());
        assert!(norm.is_normalized());
    }

    #[test]
    // Purpose
    // -------
    // select_flux picks up the conventional `_err` column and records origin.
    //
    // Given
    // -----
    // - Columns sap_flux and sap_flux_err in e-/s.
    //
    // Expect
    // ------
    // - flux = sap_flux, flux_err = sap_flux_err, FLUX_ORIGIN = "sap_flux",
    //   NORMALIZED = false.
    fn select_flux_uses_default_error_column() {
        let lc = electron_lc().select_flux("sap_flux", None).unwrap();

        assert_eq!(lc.flux(), &array![1.0, 2.0, 3.0]);
        assert_eq!(lc.flux_err(), &array![0.1, 0.2, 0.3]);
        assert_eq!(lc.meta().get(keys::FLUX_ORIGIN), Some(&MetaValue::from("sap_flux")));
        assert_eq!(lc.meta().get(keys::NORMALIZED), Some(&MetaValue::Bool(false)));
    }

    #[test]
    fn select_flux_detects_missing_and_mismatched_columns() {
        let mut lc = electron_lc();
        assert!(matches!(lc.select_flux("nope", None), Err(LightCurveError::MissingColumn(_))));

        lc.set_column("bad_err", Column::float(vec![1.0, 1.0, 1.0]).with_unit(Unit::Percent))
            .unwrap();
        assert!(matches!(
            lc.select_flux("sap_flux", Some("bad_err")),
            Err(LightCurveError::UnitMismatch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // append converts time formats and fills missing mission fields.
    //
    // Given
    // -----
    // - A BTJD light curve with cadenceno and a BKJD one without.
    //
    // Expect
    // ------
    // - Second block's time shifted by 2454833 - 2457000; cadenceno filled
    //   with 0 for the appended rows; meta taken from the receiver.
    fn append_converts_time_and_fills_fields() {
        let a = LightCurve::builder(vec![1.0, 2.0])
            .time_format(TimeFormat::Btjd)
            .flux(vec![1.0, 1.0])
            .mission(Mission::Tess)
            .cadenceno(vec![5, 6])
            .build()
            .unwrap();
        let b = LightCurve::builder(vec![2167.0 + 3.0])
            .time_format(TimeFormat::Bkjd)
            .flux(vec![2.0])
            .build()
            .unwrap();

        let out = a.append(&b).unwrap();

        assert_eq!(out.len(), 3);
        assert_relative_eq!(out.time_values()[2], 3.0, epsilon = 1e-6);
        assert_eq!(out.cadenceno().unwrap(), &array![5, 6, 0]);
        assert_eq!(out.mission(), Mission::Tess);
    }

    #[test]
    fn arithmetic_propagates_errors() {
        let lc = LightCurve::new(vec![0.0, 1.0], vec![2.0, 4.0], Some(array![0.2, 0.4])).unwrap();

        let doubled = &lc * -2.0;
        assert_eq!(doubled.flux(), &array![-4.0, -8.0]);
        assert_eq!(doubled.flux_err(), &array![0.4, 0.8]);

        let sum = lc.try_add(&lc).unwrap();
        assert_relative_eq!(sum.flux_err()[0], (0.08_f64).sqrt(), epsilon = 1e-12);

        let ratio = lc.try_div(&lc).unwrap();
        assert_relative_eq!(ratio.flux()[1], 1.0);
        assert_relative_eq!(ratio.flux_err()[1], 0.1_f64.hypot(0.1), epsilon = 1e-12);

        let short = LightCurve::new(vec![0.0], vec![1.0], None).unwrap();
        assert_eq!(
            lc.try_sub(&short).unwrap_err(),
            LightCurveError::LengthMismatch { left: 2, right: 1 }
        );
    }
}
