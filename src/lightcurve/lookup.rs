//! lightcurve::lookup — explicit three-tier name resolution.
//!
//! Purpose
//! -------
//! Resolve a bare name such as `"sector"` or `"sap_flux"` against a light
//! curve without reflection. Resolution walks three tiers in a fixed order
//! and stops at the first hit:
//!
//! 1. attributes set on the object (`LightCurve::attrs`),
//! 2. columns (core, mission, auxiliary),
//! 3. metadata: exact key first, then the upper-case documented key when
//!    the name matches one ignoring case (see [`keys::KNOWN`]).
//!
//! Custom metadata keys are never matched case-insensitively, so a stray
//! `"object"` attribute cannot shadow an unrelated `"Object"` meta entry.
//!
//! Writing through [`LightCurve::set`] resolves the name the same way and
//! writes to the tier that answered. A name that resolves nowhere becomes a
//! new attribute and raises [`Advisory::NewAttribute`].
//!
//! [`keys::KNOWN`]: crate::lightcurve::meta::keys::KNOWN

use ndarray::ArrayView1;

use crate::advisory::{self, Advisory};
use crate::lightcurve::column::{Column, ColumnData};
use crate::lightcurve::data::LightCurve;
use crate::lightcurve::errors::{LightCurveError, LightCurveResult};
use crate::lightcurve::meta::{keys, MetaValue};

/// Borrowed view of a resolved column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnView<'a> {
    Float(ArrayView1<'a, f64>),
    Int(ArrayView1<'a, i64>),
    Flags(ArrayView1<'a, u32>),
    Bool(ArrayView1<'a, bool>),
    Text(ArrayView1<'a, String>),
}

/// Result of a three-tier lookup, tagged with the tier that answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Attribute(&'a MetaValue),
    Column(ColumnView<'a>),
    Meta { key: &'a str, value: &'a MetaValue },
}

impl<'a> Lookup<'a> {
    /// Scalar value for attribute and meta hits.
    pub fn scalar(&self) -> Option<&'a MetaValue> {
        match self {
            Lookup::Attribute(v) => Some(v),
            Lookup::Meta { value, .. } => Some(value),
            Lookup::Column(_) => None,
        }
    }
}

/// Value accepted by [`LightCurve::set`].
#[derive(Debug, Clone, PartialEq)]
pub enum Assign {
    Scalar(MetaValue),
    Column(Column),
}

macro_rules! assign_scalar_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Assign {
            fn from(value: $ty) -> Self {
                Assign::Scalar(MetaValue::from(value))
            }
        })*
    };
}

assign_scalar_from!(bool, i32, i64, f64, &str, String);

impl From<MetaValue> for Assign {
    fn from(value: MetaValue) -> Self {
        Assign::Scalar(value)
    }
}

impl From<Column> for Assign {
    fn from(column: Column) -> Self {
        Assign::Column(column)
    }
}

impl LightCurve {
    /// Resolve `name` through attribute, column, then metadata.
    pub fn lookup(&self, name: &str) -> Option<Lookup<'_>> {
        if let Some(value) = self.attrs().get(name) {
            return Some(Lookup::Attribute(value));
        }
        if let Some(view) = self.column_view(name) {
            return Some(Lookup::Column(view));
        }
        self.meta().resolve(name).map(|(key, value)| Lookup::Meta { key, value })
    }

    /// Scalar shortcut for [`LightCurve::lookup`]; `None` for column hits.
    pub fn get_scalar(&self, name: &str) -> Option<&MetaValue> {
        self.lookup(name).and_then(|hit| hit.scalar())
    }

    /// Assign `value` to whichever tier `name` resolves to.
    ///
    /// Parameters
    /// ----------
    /// - `name`: `&str`
    ///   Attribute, column, or metadata name.
    /// - `value`: `impl Into<Assign>`
    ///   A scalar for attributes and metadata; a [`Column`] for columns.
    ///
    /// Errors
    /// ------
    /// - `ColumnTypeMismatch` when a scalar is assigned to a column name or
    ///   a column to an existing attribute/meta key.
    /// - Errors from [`LightCurve::set_column`] for column assignments.
    /// - `LightCurveError::Advisory` when a new attribute is created while
    ///   the advisory policy is `Error`.
    ///
    /// Notes
    /// -----
    /// - Unknown names holding a [`Column`] add an auxiliary column silently;
    ///   unknown names holding a scalar create an attribute with an advisory.
    pub fn set(&mut self, name: &str, value: impl Into<Assign>) -> LightCurveResult<()> {
        let value = value.into();
        if self.attrs().contains_key(name) {
            let scalar = expect_scalar(name, value)?;
            self.attrs_mut().insert(name.to_string(), scalar);
            return Ok(());
        }
        if self.has_column(name) {
            return match value {
                Assign::Column(column) => self.set_column(name, column),
                Assign::Scalar(_) => Err(LightCurveError::ColumnTypeMismatch {
                    column: name.to_string(),
                    expected: "column",
                    found: "scalar",
                }),
            };
        }
        if let Some((key, _)) = self.meta().resolve(name) {
            let key = key.to_string();
            let scalar = expect_scalar(name, value)?;
            self.meta_mut().insert(key, scalar);
            return Ok(());
        }
        match value {
            Assign::Column(column) => self.set_column(name, column),
            Assign::Scalar(scalar) => {
                if let Some(canonical) = keys::canonical(name) {
                    self.meta_mut().insert(canonical, scalar);
                    return Ok(());
                }
                advisory::emit(Advisory::NewAttribute { name: name.to_string() })?;
                self.attrs_mut().insert(name.to_string(), scalar);
                Ok(())
            }
        }
    }

    fn column_view(&self, name: &str) -> Option<ColumnView<'_>> {
        match name {
            "cadenceno" => return self.cadenceno().map(|a| ColumnView::Int(a.view())),
            "quality" => return self.quality().map(|a| ColumnView::Flags(a.view())),
            _ => {}
        }
        if let Ok(values) = self.float_column(name) {
            return Some(ColumnView::Float(values));
        }
        self.column(name).map(|col| match &col.data {
            ColumnData::Float(a) => ColumnView::Float(a.view()),
            ColumnData::Int(a) => ColumnView::Int(a.view()),
            ColumnData::Bool(a) => ColumnView::Bool(a.view()),
            ColumnData::Text(a) => ColumnView::Text(a.view()),
        })
    }
}

fn expect_scalar(name: &str, value: Assign) -> LightCurveResult<MetaValue> {
    match value {
        Assign::Scalar(scalar) => Ok(scalar),
        Assign::Column(_) => Err(LightCurveError::ColumnTypeMismatch {
            column: name.to_string(),
            expected: "scalar",
            found: "column",
        }),
    }
}
