//! lightcurve::data — the `LightCurve` value type, its builder, and row primitives.
//!
//! Purpose
//! -------
//! Define the validated container every other part of the crate consumes:
//! a time axis, flux and flux uncertainty, a mission tag with optional
//! mission fields, free-form auxiliary columns, and scalar metadata.
//!
//! Key behaviors
//! -------------
//! - [`LightCurveBuilder::build`] and [`LightCurve::from_parts`] validate the
//!   structural invariants (equal column lengths, finite time values).
//! - Row primitives ([`LightCurve::take`], [`LightCurve::mask`],
//!   [`LightCurve::slice`], [`LightCurve::head`], [`LightCurve::tail`],
//!   [`LightCurve::truncate`], [`LightCurve::remove_nans`],
//!   [`LightCurve::select_columns`], [`LightCurve::remove_flagged`]) return
//!   new light curves and apply to every column at once, so no column can
//!   fall out of step with the others.
//!
//! Invariants & assumptions
//! ------------------------
//! - `flux`, `flux_err`, every present mission field and every auxiliary
//!   column have exactly `time.len()` rows.
//! - Every time value is finite. Flux and auxiliary floats may be NaN, which
//!   marks a missing or masked sample.
//! - `flux_err` is always present; NaN means "uncertainty unknown".
//!
//! Conventions
//! -----------
//! - Light curves are value objects. The only in-place paths are the
//!   explicitly named `*_mut` accessors, which hand out fixed-length views
//!   so lengths cannot change behind the validator's back.
//! - Metadata is cloned into derived light curves untouched; operations that
//!   own a flag (`NORMALIZED`, `FLUX_ORIGIN`) set it explicitly.
//!
//! Downstream usage
//! ----------------
//! - Transforms that rebuild a light curve from computed arrays go through
//!   [`LightCurve::into_parts`] / [`LightCurve::from_parts`] so validation is
//!   never skipped.
//!
//! Testing notes
//! -------------
//! - Unit tests cover builder validation, each row primitive, and column
//!   selection semantics for `flux_err` and mission fields.

use std::collections::BTreeMap;
use std::ops::Range;

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

use crate::lightcurve::column::{Column, ColumnData};
use crate::lightcurve::errors::{LightCurveError, LightCurveResult};
use crate::lightcurve::meta::{keys, Meta, MetaValue};
use crate::lightcurve::mission::{Mission, MissionColumns, MISSION_COLUMN_NAMES};
use crate::lightcurve::time::{TimeAxis, TimeFormat, TimeScale};
use crate::lightcurve::units::Unit;
use crate::utils::stable_argsort;

/// Names that always refer to the core fields.
pub const CORE_COLUMN_NAMES: [&str; 3] = ["time", "flux", "flux_err"];

/// A time series of brightness measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    time: TimeAxis,
    flux: Array1<f64>,
    flux_err: Array1<f64>,
    flux_unit: Unit,
    mission: Mission,
    mission_columns: MissionColumns,
    columns: BTreeMap<String, Column>,
    meta: Meta,
    attrs: BTreeMap<String, MetaValue>,
}

/// Owned, unvalidated pieces of a [`LightCurve`].
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurveParts {
    pub time: TimeAxis,
    pub flux: Array1<f64>,
    pub flux_err: Array1<f64>,
    pub flux_unit: Unit,
    pub mission: Mission,
    pub mission_columns: MissionColumns,
    pub columns: BTreeMap<String, Column>,
    pub meta: Meta,
    pub attrs: BTreeMap<String, MetaValue>,
}

impl LightCurve {
    /// Start building a light curve on the given time values.
    pub fn builder(time: impl Into<Array1<f64>>) -> LightCurveBuilder {
        LightCurveBuilder::new(time.into())
    }

    /// Shorthand for a generic light curve with flux and optional errors.
    ///
    /// Errors
    /// ------
    /// - Same as [`LightCurveBuilder::build`].
    pub fn new(
        time: impl Into<Array1<f64>>, flux: impl Into<Array1<f64>>,
        flux_err: Option<Array1<f64>>,
    ) -> LightCurveResult<Self> {
        let mut builder = LightCurve::builder(time).flux(flux);
        if let Some(err) = flux_err {
            builder = builder.flux_err(err);
        }
        builder.build()
    }

    /// Validate `parts` and assemble a light curve.
    ///
    /// Errors
    /// ------
    /// - `LightCurveError::InconsistentColumnLengths` when any column length
    ///   differs from the time axis length.
    /// - `LightCurveError::NonFiniteTime` for the first NaN/inf time value.
    /// - `LightCurveError::ReadOnlyName` when an auxiliary column uses a core
    ///   or mission field name.
    pub fn from_parts(parts: LightCurveParts) -> LightCurveResult<Self> {
        validate_parts(&parts)?;
        let LightCurveParts {
            time,
            flux,
            flux_err,
            flux_unit,
            mission,
            mission_columns,
            columns,
            meta,
            attrs,
        } = parts;
        Ok(LightCurve {
            time,
            flux,
            flux_err,
            flux_unit,
            mission,
            mission_columns,
            columns,
            meta,
            attrs,
        })
    }

    /// Decompose into owned parts for rebuilding.
    pub fn into_parts(self) -> LightCurveParts {
        let LightCurve {
            time,
            flux,
            flux_err,
            flux_unit,
            mission,
            mission_columns,
            columns,
            meta,
            attrs,
        } = self;
        LightCurveParts {
            time,
            flux,
            flux_err,
            flux_unit,
            mission,
            mission_columns,
            columns,
            meta,
            attrs,
        }
    }

    // ---- Accessors ----

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    /// Time values in the axis' own format.
    pub fn time_values(&self) -> &Array1<f64> {
        self.time.values()
    }

    pub fn flux(&self) -> &Array1<f64> {
        &self.flux
    }

    pub fn flux_err(&self) -> &Array1<f64> {
        &self.flux_err
    }

    pub fn flux_unit(&self) -> &Unit {
        &self.flux_unit
    }

    pub fn mission(&self) -> Mission {
        self.mission
    }

    pub fn mission_columns(&self) -> &MissionColumns {
        &self.mission_columns
    }

    pub fn cadenceno(&self) -> Option<&Array1<i64>> {
        self.mission_columns.cadenceno.as_ref()
    }

    pub fn quality(&self) -> Option<&Array1<u32>> {
        self.mission_columns.quality.as_ref()
    }

    pub fn centroid_col(&self) -> Option<&Array1<f64>> {
        self.mission_columns.centroid_col.as_ref()
    }

    pub fn centroid_row(&self) -> Option<&Array1<f64>> {
        self.mission_columns.centroid_row.as_ref()
    }

    pub fn background(&self) -> Option<&Array1<f64>> {
        self.mission_columns.background.as_ref()
    }

    /// Auxiliary columns, ordered by name.
    pub fn columns(&self) -> &BTreeMap<String, Column> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Metadata carries no structural invariant, so it is freely mutable.
    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Replace the whole metadata block (no merging).
    pub fn set_meta(&mut self, meta: Meta) {
        self.meta = meta;
    }

    pub fn attrs(&self) -> &BTreeMap<String, MetaValue> {
        &self.attrs
    }

    pub(crate) fn attrs_mut(&mut self) -> &mut BTreeMap<String, MetaValue> {
        &mut self.attrs
    }

    pub fn targetid(&self) -> Option<&MetaValue> {
        self.meta.get(keys::TARGETID)
    }

    pub fn label(&self) -> Option<&str> {
        self.meta.get(keys::LABEL).and_then(MetaValue::as_str)
    }

    /// Whether the `NORMALIZED` flag is set.
    pub fn is_normalized(&self) -> bool {
        self.meta.is_normalized()
    }

    // ---- Documented in-place access ----

    /// Mutable view of the flux values. Modifies this light curve in place.
    pub fn flux_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.flux.view_mut()
    }

    /// Mutable view of the flux uncertainties. Modifies in place.
    pub fn flux_err_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.flux_err.view_mut()
    }

    /// Mutable view of a floating-point auxiliary or mission column.
    ///
    /// Errors
    /// ------
    /// - `MissingColumn` if `name` is unknown, `ColumnTypeMismatch` if it is
    ///   not a float column.
    pub fn column_mut(&mut self, name: &str) -> LightCurveResult<ArrayViewMut1<'_, f64>> {
        let MissionColumns { centroid_col, centroid_row, background, .. } =
            &mut self.mission_columns;
        let slot = match name {
            "centroid_col" => centroid_col.as_mut(),
            "centroid_row" => centroid_row.as_mut(),
            "background" => background.as_mut(),
            _ => None,
        };
        if let Some(values) = slot {
            return Ok(values.view_mut());
        }
        match self.columns.get_mut(name) {
            Some(Column { data: ColumnData::Float(values), .. }) => Ok(values.view_mut()),
            Some(other) => Err(LightCurveError::ColumnTypeMismatch {
                column: name.to_string(),
                expected: "float",
                found: other.data.kind(),
            }),
            None => Err(LightCurveError::MissingColumn(name.to_string())),
        }
    }

    /// Replace or add a column by name.
    ///
    /// Core and mission names route to their fixed fields and must have the
    /// matching storage kind (`quality` accepts non-negative integers); any
    /// other name adds or replaces an auxiliary column. Assigning `flux` also
    /// adopts the column's unit.
    ///
    /// Errors
    /// ------
    /// - `InconsistentColumnLengths` when the column length differs.
    /// - `ReadOnlyName("time")`; the time axis is replaced by rebuilding.
    /// - `ColumnTypeMismatch` for a wrong storage kind.
    pub fn set_column(&mut self, name: &str, column: Column) -> LightCurveResult<()> {
        if column.len() != self.len() {
            return Err(LightCurveError::InconsistentColumnLengths {
                column: name.to_string(),
                expected: self.len(),
                found: column.len(),
            });
        }
        let mismatch = |expected: &'static str, data: &ColumnData| {
            LightCurveError::ColumnTypeMismatch {
                column: name.to_string(),
                expected,
                found: data.kind(),
            }
        };
        match (name, column.data) {
            ("time", _) => return Err(LightCurveError::ReadOnlyName(name.to_string())),
            ("flux", ColumnData::Float(values)) => {
                self.flux = values;
                self.flux_unit = column.unit;
            }
            ("flux_err", ColumnData::Float(values)) => self.flux_err = values,
            ("cadenceno", ColumnData::Int(values)) => {
                self.mission_columns.cadenceno = Some(values)
            }
            ("quality", ColumnData::Int(values)) => {
                if values.iter().any(|&q| q < 0 || q > i64::from(u32::MAX)) {
                    return Err(mismatch("unsigned 32-bit bitmask", &ColumnData::Int(values)));
                }
                self.mission_columns.quality = Some(values.mapv(|q| q as u32));
            }
            ("centroid_col", ColumnData::Float(values)) => {
                self.mission_columns.centroid_col = Some(values)
            }
            ("centroid_row", ColumnData::Float(values)) => {
                self.mission_columns.centroid_row = Some(values)
            }
            ("background", ColumnData::Float(values)) => {
                self.mission_columns.background = Some(values)
            }
            ("flux" | "flux_err" | "centroid_col" | "centroid_row" | "background", other) => {
                return Err(mismatch("float", &other))
            }
            ("cadenceno" | "quality", other) => return Err(mismatch("int", &other)),
            (_, data) => {
                self.columns.insert(name.to_string(), Column { data, unit: column.unit });
            }
        }
        Ok(())
    }

    /// Read-only view of any floating-point column, including `time`,
    /// `flux`, `flux_err`, and the float mission fields.
    pub fn float_column(&self, name: &str) -> LightCurveResult<ArrayView1<'_, f64>> {
        match name {
            "time" => return Ok(self.time.values().view()),
            "flux" => return Ok(self.flux.view()),
            "flux_err" => return Ok(self.flux_err.view()),
            _ => {}
        }
        for (field, values) in self.mission_columns.float_fields() {
            if field == name {
                return values
                    .map(|v| v.view())
                    .ok_or_else(|| LightCurveError::MissingColumn(name.to_string()));
            }
        }
        match self.columns.get(name) {
            Some(Column { data: ColumnData::Float(values), .. }) => Ok(values.view()),
            Some(other) => Err(LightCurveError::ColumnTypeMismatch {
                column: name.to_string(),
                expected: "float",
                found: other.data.kind(),
            }),
            None => Err(LightCurveError::MissingColumn(name.to_string())),
        }
    }

    /// Whether `name` refers to a column (core, mission, or auxiliary).
    pub fn has_column(&self, name: &str) -> bool {
        CORE_COLUMN_NAMES.contains(&name)
            || self.mission_columns.has(name)
            || self.columns.contains_key(name)
    }

    /// Names of all present columns: core, mission, then auxiliary.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = CORE_COLUMN_NAMES.iter().map(|s| s.to_string()).collect();
        names.extend(
            MISSION_COLUMN_NAMES
                .iter()
                .filter(|n| self.mission_columns.has(n))
                .map(|s| s.to_string()),
        );
        names.extend(self.columns.keys().cloned());
        names
    }

    // ---- Row primitives ----

    /// Gather rows by index (repeats and reordering allowed).
    ///
    /// Errors
    /// ------
    /// - `LightCurveError::IndexOutOfBounds` for the first invalid index.
    pub fn take(&self, indices: &[usize]) -> LightCurveResult<Self> {
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(LightCurveError::IndexOutOfBounds { index, len });
        }
        Ok(self.take_unchecked(indices))
    }

    pub(crate) fn take_unchecked(&self, indices: &[usize]) -> Self {
        let gather = |a: &Array1<f64>| -> Array1<f64> { indices.iter().map(|&i| a[i]).collect() };
        LightCurve {
            time: self.time.take(indices),
            flux: gather(&self.flux),
            flux_err: gather(&self.flux_err),
            flux_unit: self.flux_unit.clone(),
            mission: self.mission,
            mission_columns: self.mission_columns.take(indices),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.map_data(|d| d.take(indices))))
                .collect(),
            meta: self.meta.clone(),
            attrs: self.attrs.clone(),
        }
    }

    /// Gather rows where `None` slots become fill rows.
    ///
    /// The output takes its time axis from `time`; when `cadenceno` is given
    /// it replaces the mission cadence numbers. Fill rows carry NaN flux,
    /// NaN floats, zero quality/integers, `false` booleans, and empty text.
    pub(crate) fn take_or_fill(
        &self, rows: &[Option<usize>], time: TimeAxis, cadenceno: Option<Array1<i64>>,
    ) -> LightCurveResult<Self> {
        let len = self.len();
        if let Some(index) = rows.iter().flatten().copied().find(|&i| i >= len) {
            return Err(LightCurveError::IndexOutOfBounds { index, len });
        }
        let fill = |a: &Array1<f64>| -> Array1<f64> {
            rows.iter().map(|r| r.map_or(f64::NAN, |i| a[i])).collect()
        };
        let mut mission_columns = self.mission_columns.take_or_fill(rows);
        if cadenceno.is_some() {
            mission_columns.cadenceno = cadenceno;
        }
        LightCurve::from_parts(LightCurveParts {
            time,
            flux: fill(&self.flux),
            flux_err: fill(&self.flux_err),
            flux_unit: self.flux_unit.clone(),
            mission: self.mission,
            mission_columns,
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.map_data(|d| d.take_or_fill(rows))))
                .collect(),
            meta: self.meta.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Keep the rows where `keep` is `true`.
    ///
    /// Errors
    /// ------
    /// - `LightCurveError::MaskLengthMismatch` when `keep.len() != self.len()`.
    pub fn mask(&self, keep: &[bool]) -> LightCurveResult<Self> {
        if keep.len() != self.len() {
            return Err(LightCurveError::MaskLengthMismatch {
                expected: self.len(),
                found: keep.len(),
            });
        }
        let indices: Vec<usize> =
            keep.iter().enumerate().filter_map(|(i, &k)| k.then_some(i)).collect();
        Ok(self.take_unchecked(&indices))
    }

    /// Contiguous row range.
    pub fn slice(&self, range: Range<usize>) -> LightCurveResult<Self> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(LightCurveError::IndexOutOfBounds { index: range.end, len });
        }
        let indices: Vec<usize> = range.collect();
        Ok(self.take_unchecked(&indices))
    }

    /// First `n` rows (all rows if shorter).
    pub fn head(&self, n: usize) -> Self {
        let indices: Vec<usize> = (0..n.min(self.len())).collect();
        self.take_unchecked(&indices)
    }

    /// Last `n` rows (all rows if shorter).
    pub fn tail(&self, n: usize) -> Self {
        let len = self.len();
        let indices: Vec<usize> = (len.saturating_sub(n)..len).collect();
        self.take_unchecked(&indices)
    }

    /// Keep rows whose `column` value (default `time`) lies in
    /// `[before, after]`; rows with a NaN value are dropped.
    pub fn truncate(
        &self, before: Option<f64>, after: Option<f64>, column: Option<&str>,
    ) -> LightCurveResult<Self> {
        let values = self.float_column(column.unwrap_or("time"))?;
        let lo = before.unwrap_or(f64::NEG_INFINITY);
        let hi = after.unwrap_or(f64::INFINITY);
        let keep: Vec<bool> = values.iter().map(|&v| v >= lo && v <= hi).collect();
        self.mask(&keep)
    }

    /// Drop rows with NaN flux.
    pub fn remove_nans(&self) -> Self {
        let keep: Vec<usize> =
            self.flux.iter().enumerate().filter_map(|(i, v)| (!v.is_nan()).then_some(i)).collect();
        self.take_unchecked(&keep)
    }

    /// Drop rows where the named float column is NaN.
    pub fn remove_nans_in(&self, column: &str) -> LightCurveResult<Self> {
        let values = self.float_column(column)?;
        let keep: Vec<bool> = values.iter().map(|v| !v.is_nan()).collect();
        self.mask(&keep)
    }

    /// Keep only the named columns.
    ///
    /// `time` and `flux` always survive; `flux_err` becomes NaN unless it is
    /// requested. Mission fields and auxiliary columns not named are dropped.
    ///
    /// Errors
    /// ------
    /// - `LightCurveError::MissingColumn` for any unknown name.
    pub fn select_columns(&self, names: &[&str]) -> LightCurveResult<Self> {
        if let Some(unknown) = names.iter().find(|n| !self.has_column(n)) {
            return Err(LightCurveError::MissingColumn(unknown.to_string()));
        }
        let mut out = self.clone();
        if !names.contains(&"flux_err") {
            out.flux_err = Array1::from_elem(self.len(), f64::NAN);
        }
        out.mission_columns = self.mission_columns.retain(names);
        out.columns.retain(|name, _| names.contains(&name.as_str()));
        Ok(out)
    }

    /// Drop rows whose quality shares any bit with `bitmask`.
    ///
    /// Light curves without a quality field are returned unchanged.
    pub fn remove_flagged(&self, bitmask: u32) -> Self {
        match self.quality() {
            Some(quality) => {
                let keep: Vec<usize> = quality
                    .iter()
                    .enumerate()
                    .filter_map(|(i, q)| (q & bitmask == 0).then_some(i))
                    .collect();
                self.take_unchecked(&keep)
            }
            None => self.clone(),
        }
    }

    /// Stable sort of all rows by time.
    pub fn sort_by_time(&self) -> Self {
        let times = self.time.values().to_vec();
        let order = stable_argsort(&times);
        self.take_unchecked(&order)
    }
}

fn validate_parts(parts: &LightCurveParts) -> LightCurveResult<()> {
    let expected = parts.time.len();
    let check = |column: &str, found: usize| -> LightCurveResult<()> {
        if found != expected {
            return Err(LightCurveError::InconsistentColumnLengths {
                column: column.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    };
    check("flux", parts.flux.len())?;
    check("flux_err", parts.flux_err.len())?;
    for (name, len) in parts.mission_columns.lengths() {
        check(name, len)?;
    }
    for (name, col) in &parts.columns {
        if CORE_COLUMN_NAMES.contains(&name.as_str())
            || MISSION_COLUMN_NAMES.contains(&name.as_str())
        {
            return Err(LightCurveError::ReadOnlyName(name.clone()));
        }
        check(name, col.len())?;
    }
    if let Some(index) = parts.time.values().iter().position(|t| !t.is_finite()) {
        return Err(LightCurveError::NonFiniteTime { index });
    }
    Ok(())
}

/// Builder for [`LightCurve`].
#[derive(Debug, Clone)]
pub struct LightCurveBuilder {
    time: Array1<f64>,
    format: TimeFormat,
    scale: TimeScale,
    flux: Option<Array1<f64>>,
    flux_err: Option<Array1<f64>>,
    flux_unit: Unit,
    mission: Mission,
    mission_columns: MissionColumns,
    columns: BTreeMap<String, Column>,
    meta: Meta,
    attrs: BTreeMap<String, MetaValue>,
}

impl LightCurveBuilder {
    fn new(time: Array1<f64>) -> Self {
        LightCurveBuilder {
            time,
            format: TimeFormat::default(),
            scale: TimeScale::default(),
            flux: None,
            flux_err: None,
            flux_unit: Unit::default(),
            mission: Mission::default(),
            mission_columns: MissionColumns::default(),
            columns: BTreeMap::new(),
            meta: Meta::new(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn time_scale(mut self, scale: TimeScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn flux(mut self, flux: impl Into<Array1<f64>>) -> Self {
        self.flux = Some(flux.into());
        self
    }

    pub fn flux_err(mut self, flux_err: impl Into<Array1<f64>>) -> Self {
        self.flux_err = Some(flux_err.into());
        self
    }

    pub fn flux_unit(mut self, unit: Unit) -> Self {
        self.flux_unit = unit;
        self
    }

    pub fn mission(mut self, mission: Mission) -> Self {
        self.mission = mission;
        self
    }

    pub fn cadenceno(mut self, cadenceno: impl Into<Array1<i64>>) -> Self {
        self.mission_columns.cadenceno = Some(cadenceno.into());
        self
    }

    pub fn quality(mut self, quality: impl Into<Array1<u32>>) -> Self {
        self.mission_columns.quality = Some(quality.into());
        self
    }

    pub fn centroid(
        mut self, col: impl Into<Array1<f64>>, row: impl Into<Array1<f64>>,
    ) -> Self {
        self.mission_columns.centroid_col = Some(col.into());
        self.mission_columns.centroid_row = Some(row.into());
        self
    }

    pub fn background(mut self, background: impl Into<Array1<f64>>) -> Self {
        self.mission_columns.background = Some(background.into());
        self
    }

    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.insert(name.into(), column);
        self
    }

    /// Replace the metadata block.
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn meta_entry(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key, value);
        self
    }

    pub fn targetid(self, targetid: impl Into<MetaValue>) -> Self {
        self.meta_entry(keys::TARGETID, targetid)
    }

    pub fn label(self, label: &str) -> Self {
        self.meta_entry(keys::LABEL, label)
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Validate and assemble the light curve.
    ///
    /// Missing flux and flux_err default to NaN. A non-generic mission tag
    /// fills the `MISSION` metadata key unless already present.
    ///
    /// Errors
    /// ------
    /// - See [`LightCurve::from_parts`].
    pub fn build(self) -> LightCurveResult<LightCurve> {
        let n = self.time.len();
        let mut meta = self.meta;
        if self.mission != Mission::Generic && !meta.contains_key(keys::MISSION) {
            meta.insert(keys::MISSION, self.mission.name());
        }
        LightCurve::from_parts(LightCurveParts {
            time: TimeAxis::new(self.time, self.format).with_scale(self.scale),
            flux: self.flux.unwrap_or_else(|| Array1::from_elem(n, f64::NAN)),
            flux_err: self.flux_err.unwrap_or_else(|| Array1::from_elem(n, f64::NAN)),
            flux_unit: self.flux_unit,
            mission: self.mission,
            mission_columns: self.mission_columns,
            columns: self.columns,
            meta,
            attrs: self.attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Structural validation in the builder.
    // - Row primitives (take, mask, head/tail, truncate, remove_nans).
    // - Column selection and quality-flag filtering.
    // -------------------------------------------------------------------------

    fn sample() -> LightCurve {
        LightCurve::builder(vec![1.0, 2.0, 3.0, 4.0])
            .flux(vec![1.0, f64::NAN, 3.0, 4.0])
            .flux_err(vec![0.1, 0.1, 0.1, 0.1])
            .mission(Mission::Kepler)
            .cadenceno(vec![10, 11, 12, 13])
            .quality(vec![0, 1, 2, 0])
            .column("sap_flux", Column::float(vec![5.0, 6.0, 7.0, 8.0]))
            .build()
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Unequal column lengths are rejected at construction.
    //
    // Given
    // -----
    // - Three time values and two flux values.
    //
    // Expect
    // ------
    // - `InconsistentColumnLengths` naming "flux".
    fn build_rejects_inconsistent_lengths() {
        let err = LightCurve::builder(vec![1.0, 2.0, 3.0]).flux(vec![1.0, 2.0]).build().unwrap_err();

        assert_eq!(
            err,
            LightCurveError::InconsistentColumnLengths {
                column: "flux".into(),
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn build_rejects_nan_time() {
        let err = LightCurve::builder(vec![1.0, f64::NAN]).build().unwrap_err();
        assert_eq!(err, LightCurveError::NonFiniteTime { index: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Default flux/flux_err are NaN and the mission tag seeds MISSION.
    //
    // Given
    // -----
    // - A TESS light curve with only time values.
    //
    // Expect
    // ------
    // - NaN flux and errors, meta MISSION = "TESS".
    fn build_defaults_missing_flux_to_nan() {
        let lc = LightCurve::builder(vec![0.0, 1.0]).mission(Mission::Tess).build().unwrap();

        assert!(lc.flux().iter().all(|v| v.is_nan()));
        assert!(lc.flux_err().iter().all(|v| v.is_nan()));
        assert_eq!(lc.meta().get("MISSION").and_then(MetaValue::as_str), Some("TESS"));
    }

    #[test]
    fn remove_nans_drops_rows_in_every_column() {
        let lc = sample().remove_nans();

        assert_eq!(lc.len(), 3);
        assert_eq!(lc.cadenceno().unwrap(), &array![10, 12, 13]);
        assert_eq!(lc.column("sap_flux").unwrap().data, ColumnData::Float(array![5.0, 7.0, 8.0]));
    }

    #[test]
    fn head_tail_and_truncate_select_expected_rows() {
        let lc = sample();

        assert_eq!(lc.head(2).time_values(), &array![1.0, 2.0]);
        assert_eq!(lc.tail(10).len(), 4);
        assert_eq!(lc.truncate(Some(2.0), Some(3.0), None).unwrap().time_values(), &array![2.0, 3.0]);
        assert_eq!(
            lc.truncate(Some(6.0), None, Some("sap_flux")).unwrap().time_values(),
            &array![2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn take_rejects_out_of_bounds() {
        assert_eq!(
            sample().take(&[0, 9]).unwrap_err(),
            LightCurveError::IndexOutOfBounds { index: 9, len: 4 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Column selection keeps the same variant and blanks unrequested errors.
    //
    // Given
    // -----
    // - The Kepler sample with cadenceno, quality and sap_flux.
    //
    // Expect
    // ------
    // - ["time", "flux", "quality"] keeps quality only; flux_err is NaN.
    // - Unknown names are rejected.
    fn select_columns_keeps_named_fields_only() {
        let lc = sample();

        let out = lc.select_columns(&["time", "flux", "quality"]).unwrap();

        assert_eq!(out.mission(), Mission::Kepler);
        assert!(out.quality().is_some());
        assert!(out.cadenceno().is_none());
        assert!(out.column("sap_flux").is_none());
        assert!(out.flux_err().iter().all(|v| v.is_nan()));
        assert!(matches!(
            lc.select_columns(&["nope"]),
            Err(LightCurveError::MissingColumn(name)) if name == "nope"
        ));
    }

    #[test]
    fn remove_flagged_uses_bitwise_and() {
        let lc = sample();
        assert_eq!(lc.remove_flagged(0b10).cadenceno().unwrap(), &array![10, 11, 13]);
        assert_eq!(lc.remove_flagged(u32::MAX).len(), 2);
    }

    #[test]
    fn flux_mut_modifies_in_place() {
        let mut lc = sample();
        lc.flux_mut()[0] = 42.0;
        assert_eq!(lc.flux()[0], 42.0);
    }
}
