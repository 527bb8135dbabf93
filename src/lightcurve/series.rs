//! lightcurve::series — variant-preserving operations via re-wrapping.
//!
//! Purpose
//! -------
//! Row selection, column selection, outlier removal, detrending and binning
//! must return the same variant they were called on: a folded light curve
//! stays folded. [`LightCurveLike`] captures this with two required methods,
//! [`LightCurveLike::as_lightcurve`] (borrow the underlying table) and
//! [`LightCurveLike::rewrap`] (build `Self` around a transformed table), and
//! provides every variant-preserving operation once on top of them.
//!
//! Conventions
//! -----------
//! - Implementors list the columns that must survive column selection in
//!   [`LightCurveLike::protected_columns`] (fold bookkeeping, for example).
//! - On [`LightCurve`] the row methods have inherent twins with identical
//!   behaviour; the trait versions matter for generic code and wrappers.

use crate::lightcurve::data::LightCurve;
use crate::lightcurve::errors::LightCurveResult;
use crate::lightcurve::folded::{FoldedLightCurve, CYCLE_COLUMN, TIME_ORIGINAL_COLUMN};
use crate::transforms::bin::{bin_lightcurve, BinOptions};
use crate::transforms::errors::TransformResult;
use crate::transforms::flatten::{flatten_lightcurve, FlattenOptions, FlattenOutput};
use crate::transforms::outliers::{
    remove_outliers_lightcurve, OutlierOptions, RemoveOutliersOutput,
};

/// A light-curve variant that can be rebuilt around a transformed table.
pub trait LightCurveLike: Sized {
    /// The underlying table.
    fn as_lightcurve(&self) -> &LightCurve;

    /// Wrap `inner` in the same variant (and variant parameters) as `self`.
    fn rewrap(&self, inner: LightCurve) -> Self;

    /// Columns that column selection must keep.
    fn protected_columns(&self) -> &'static [&'static str] {
        &[]
    }

    fn len(&self) -> usize {
        self.as_lightcurve().len()
    }

    fn is_empty(&self) -> bool {
        self.as_lightcurve().is_empty()
    }

    fn take(&self, indices: &[usize]) -> LightCurveResult<Self> {
        Ok(self.rewrap(self.as_lightcurve().take(indices)?))
    }

    fn mask(&self, keep: &[bool]) -> LightCurveResult<Self> {
        Ok(self.rewrap(self.as_lightcurve().mask(keep)?))
    }

    fn remove_nans(&self) -> Self {
        self.rewrap(self.as_lightcurve().remove_nans())
    }

    fn select_columns(&self, names: &[&str]) -> LightCurveResult<Self> {
        let inner = self.as_lightcurve();
        let mut wanted: Vec<&str> = names.to_vec();
        for &name in self.protected_columns() {
            if inner.has_column(name) && !wanted.contains(&name) {
                wanted.push(name);
            }
        }
        Ok(self.rewrap(inner.select_columns(&wanted)?))
    }

    /// Sigma-clip flux outliers; see [`remove_outliers_lightcurve`].
    fn remove_outliers(
        &self, opts: &OutlierOptions,
    ) -> TransformResult<RemoveOutliersOutput<Self>> {
        let (lc, mask) = remove_outliers_lightcurve(self.as_lightcurve(), opts)?;
        Ok(RemoveOutliersOutput { lc: self.rewrap(lc), mask })
    }

    /// Iterative Savitzky–Golay detrending; see [`flatten_lightcurve`].
    fn flatten(&self, opts: &FlattenOptions) -> TransformResult<FlattenOutput<Self>> {
        let (flat, trend) = flatten_lightcurve(self.as_lightcurve(), opts)?;
        Ok(FlattenOutput { flat: self.rewrap(flat), trend: trend.map(|t| self.rewrap(t)) })
    }

    /// Aggregate samples into bins; see [`bin_lightcurve`].
    fn bin(&self, opts: &BinOptions) -> TransformResult<Self> {
        Ok(self.rewrap(bin_lightcurve(self.as_lightcurve(), opts)?))
    }
}

impl LightCurveLike for LightCurve {
    fn as_lightcurve(&self) -> &LightCurve {
        self
    }

    fn rewrap(&self, inner: LightCurve) -> Self {
        inner
    }
}

impl LightCurveLike for FoldedLightCurve {
    fn as_lightcurve(&self) -> &LightCurve {
        self.inner()
    }

    fn rewrap(&self, inner: LightCurve) -> Self {
        FoldedLightCurve::from_inner(inner, self.params())
    }

    fn protected_columns(&self) -> &'static [&'static str] {
        &[TIME_ORIGINAL_COLUMN, CYCLE_COLUMN]
    }
}
