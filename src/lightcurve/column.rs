//! lightcurve::column — typed auxiliary columns and their row primitives.
//!
//! Purpose
//! -------
//! Hold the free-form columns a light curve carries besides time, flux and
//! the mission fields (e.g. `sap_flux`, `pdcsap_flux_err`, fold bookkeeping).
//! Every row-reshaping operation in the crate goes through the three
//! primitives defined here: [`ColumnData::take`], [`ColumnData::take_or_fill`]
//! and [`ColumnData::concat`].
//!
//! Conventions
//! -----------
//! - Fill values for missing rows are kind-specific: NaN for floats, 0 for
//!   integers, `false` for booleans, empty string for text.

use ndarray::Array1;

use crate::lightcurve::errors::{LightCurveError, LightCurveResult};
use crate::lightcurve::units::Unit;

/// Storage of one auxiliary column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Array1<f64>),
    Int(Array1<i64>),
    Bool(Array1<bool>),
    Text(Array1<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(a) => a.len(),
            ColumnData::Int(a) => a.len(),
            ColumnData::Bool(a) => a.len(),
            ColumnData::Text(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the storage kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnData::Float(_) => "float",
            ColumnData::Int(_) => "int",
            ColumnData::Bool(_) => "bool",
            ColumnData::Text(_) => "text",
        }
    }

    pub fn as_float(&self) -> Option<&Array1<f64>> {
        match self {
            ColumnData::Float(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&Array1<i64>> {
        match self {
            ColumnData::Int(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&Array1<bool>> {
        match self {
            ColumnData::Bool(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Array1<String>> {
        match self {
            ColumnData::Text(a) => Some(a),
            _ => None,
        }
    }

    /// Gather rows by index. Indices must be in bounds.
    pub fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Float(a) => ColumnData::Float(gather(a, indices)),
            ColumnData::Int(a) => ColumnData::Int(gather(a, indices)),
            ColumnData::Bool(a) => ColumnData::Bool(gather(a, indices)),
            ColumnData::Text(a) => ColumnData::Text(gather(a, indices)),
        }
    }

    /// Gather rows, filling `None` slots with the kind's fill value.
    pub fn take_or_fill(&self, rows: &[Option<usize>]) -> ColumnData {
        match self {
            ColumnData::Float(a) => ColumnData::Float(gather_or(a, rows, f64::NAN)),
            ColumnData::Int(a) => ColumnData::Int(gather_or(a, rows, 0)),
            ColumnData::Bool(a) => ColumnData::Bool(gather_or(a, rows, false)),
            ColumnData::Text(a) => ColumnData::Text(gather_or(a, rows, String::new())),
        }
    }

    /// A column of the same kind holding `len` fill values.
    pub fn filled_like(&self, len: usize) -> ColumnData {
        match self {
            ColumnData::Float(_) => ColumnData::Float(Array1::from_elem(len, f64::NAN)),
            ColumnData::Int(_) => ColumnData::Int(Array1::zeros(len)),
            ColumnData::Bool(_) => ColumnData::Bool(Array1::from_elem(len, false)),
            ColumnData::Text(_) => ColumnData::Text(Array1::from_elem(len, String::new())),
        }
    }

    /// Concatenate same-kind pieces in order.
    ///
    /// Errors
    /// ------
    /// - `LightCurveError::ColumnTypeMismatch` when a piece's kind differs
    ///   from the first piece's kind.
    pub fn concat(name: &str, pieces: &[ColumnData]) -> LightCurveResult<ColumnData> {
        let Some(first) = pieces.first() else {
            return Ok(ColumnData::Float(Array1::zeros(0)));
        };
        for piece in pieces {
            if piece.kind() != first.kind() {
                return Err(LightCurveError::ColumnTypeMismatch {
                    column: name.to_string(),
                    expected: first.kind(),
                    found: piece.kind(),
                });
            }
        }
        let out = match first {
            ColumnData::Float(_) => ColumnData::Float(chain(pieces, ColumnData::as_float)),
            ColumnData::Int(_) => ColumnData::Int(chain(pieces, ColumnData::as_int)),
            ColumnData::Bool(_) => ColumnData::Bool(chain(pieces, ColumnData::as_bool)),
            ColumnData::Text(_) => ColumnData::Text(chain(pieces, ColumnData::as_text)),
        };
        Ok(out)
    }
}

fn gather<T: Clone>(values: &Array1<T>, indices: &[usize]) -> Array1<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

fn gather_or<T: Clone>(values: &Array1<T>, rows: &[Option<usize>], fill: T) -> Array1<T> {
    rows.iter().map(|row| row.map_or_else(|| fill.clone(), |i| values[i].clone())).collect()
}

fn chain<T: Clone>(
    pieces: &[ColumnData], view: impl Fn(&ColumnData) -> Option<&Array1<T>>,
) -> Array1<T> {
    let total: usize = pieces.iter().map(ColumnData::len).sum();
    let mut out = Vec::with_capacity(total);
    for piece in pieces.iter().filter_map(&view) {
        out.extend(piece.iter().cloned());
    }
    Array1::from_vec(out)
}

/// An auxiliary column: data plus unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub data: ColumnData,
    pub unit: Unit,
}

impl Column {
    pub fn float(values: impl Into<Array1<f64>>) -> Self {
        Column { data: ColumnData::Float(values.into()), unit: Unit::Dimensionless }
    }

    pub fn int(values: impl Into<Array1<i64>>) -> Self {
        Column { data: ColumnData::Int(values.into()), unit: Unit::Dimensionless }
    }

    pub fn bool(values: impl Into<Array1<bool>>) -> Self {
        Column { data: ColumnData::Bool(values.into()), unit: Unit::Dimensionless }
    }

    pub fn text(values: Vec<String>) -> Self {
        Column { data: ColumnData::Text(Array1::from_vec(values)), unit: Unit::Dimensionless }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn map_data(&self, f: impl FnOnce(&ColumnData) -> ColumnData) -> Column {
        Column { data: f(&self.data), unit: self.unit.clone() }
    }
}
