//! lightcurve::collection — ordered light-curve sets and stitching.
//!
//! Purpose
//! -------
//! Hold several light curves of the same target (quarters, campaigns,
//! sectors) with no alignment guarantee between members, and stitch them
//! into one light curve: correct each member, concatenate, then stably
//! re-sort by time.
//!
//! Invariants & assumptions
//! ------------------------
//! - Stitching works in O(total samples) memory: corrected members, one
//!   concatenated copy, and one permutation vector. Members are never
//!   expanded to full-length intermediates.
//! - Members from different missions share no cadence key, so stitching
//!   orders rows by time only.

use crate::lightcurve::data::LightCurve;
use crate::lightcurve::errors::LightCurveResult;

/// An ordered set of light curves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightCurveCollection {
    members: Vec<LightCurve>,
}

impl LightCurveCollection {
    pub fn new(members: Vec<LightCurve>) -> Self {
        LightCurveCollection { members }
    }

    pub fn push(&mut self, lc: LightCurve) {
        self.members.push(lc);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LightCurve> {
        self.members.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LightCurve> {
        self.members.iter()
    }

    pub fn members(&self) -> &[LightCurve] {
        &self.members
    }

    /// Stitch with the default corrector, `normalize("dimensionless")`.
    pub fn stitch(&self) -> LightCurveResult<Option<LightCurve>> {
        self.stitch_with(|lc| lc.normalize("dimensionless"))
    }

    /// Correct each member, append in order, and stably sort by time.
    ///
    /// Parameters
    /// ----------
    /// - `corrector`: `FnMut(&LightCurve) -> LightCurveResult<LightCurve>`
    ///   Applied to each member before concatenation. Pass
    ///   `|lc| Ok(lc.clone())` to stitch raw flux.
    ///
    /// Returns
    /// -------
    /// `LightCurveResult<Option<LightCurve>>`
    ///   `None` for an empty collection; otherwise the stitched light curve,
    ///   carrying the first member's metadata and time format.
    ///
    /// Errors
    /// ------
    /// - Any error from the corrector or from [`LightCurve::append_all`].
    pub fn stitch_with(
        &self, mut corrector: impl FnMut(&LightCurve) -> LightCurveResult<LightCurve>,
    ) -> LightCurveResult<Option<LightCurve>> {
        let mut corrected = Vec::with_capacity(self.members.len());
        for lc in &self.members {
            corrected.push(corrector(lc)?);
        }
        let Some((first, rest)) = corrected.split_first() else {
            return Ok(None);
        };
        let stitched = first.append_all(rest)?;
        tracing::debug!(members = self.members.len(), rows = stitched.len(), "stitched collection");
        Ok(Some(stitched.sort_by_time()))
    }
}

impl FromIterator<LightCurve> for LightCurveCollection {
    fn from_iter<I: IntoIterator<Item = LightCurve>>(iter: I) -> Self {
        LightCurveCollection::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LightCurveCollection {
    type Item = &'a LightCurve;
    type IntoIter = std::slice::Iter<'a, LightCurve>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
