//! metrics::neighbors — resolving spatially nearby targets.
//!
//! Purpose
//! -------
//! Abstract the archive lookup that supplies light curves of targets near a
//! subject on the sky, so the underfit metric can run against a live
//! service, a cache, or a fixed in-memory set.
//!
//! Key behaviors
//! -------------
//! - [`NeighborSource`] is the collaborator seam; failures are reported as
//!   `anyhow::Error` and surface as `MetricsError::Anyhow`.
//! - Any `Fn(&LightCurve, &NeighborQuery) -> anyhow::Result<Vec<LightCurve>>`
//!   closure is a source.
//! - [`StaticNeighbors`] serves a pre-loaded set: candidates within the
//!   radius, nearest first, excluding the subject's own target id, at most
//!   `max_targets`.

use crate::lightcurve::data::LightCurve;

/// Search constraints passed to a [`NeighborSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborQuery {
    pub radius_arcsec: f64,
    pub max_targets: usize,
}

/// Provider of neighboring light curves for a subject target.
pub trait NeighborSource {
    /// Light curves of targets near `target`, nearest first, at most
    /// `query.max_targets` of them.
    fn neighbors(&self, target: &LightCurve, query: &NeighborQuery)
        -> anyhow::Result<Vec<LightCurve>>;
}

impl<F> NeighborSource for F
where
    F: Fn(&LightCurve, &NeighborQuery) -> anyhow::Result<Vec<LightCurve>>,
{
    fn neighbors(
        &self, target: &LightCurve, query: &NeighborQuery,
    ) -> anyhow::Result<Vec<LightCurve>> {
        self(target, query)
    }
}

/// In-memory neighbor set with known angular separations.
#[derive(Debug, Clone, Default)]
pub struct StaticNeighbors {
    candidates: Vec<(f64, LightCurve)>,
}

impl StaticNeighbors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate at `separation_arcsec` from the subject.
    pub fn with_candidate(mut self, separation_arcsec: f64, lc: LightCurve) -> Self {
        self.candidates.push((separation_arcsec, lc));
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl NeighborSource for StaticNeighbors {
    fn neighbors(
        &self, target: &LightCurve, query: &NeighborQuery,
    ) -> anyhow::Result<Vec<LightCurve>> {
        let own_id = target.targetid();
        let mut hits: Vec<&(f64, LightCurve)> = self
            .candidates
            .iter()
            .filter(|(sep, lc)| {
                *sep <= query.radius_arcsec && (own_id.is_none() || lc.targetid() != own_id)
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(hits.into_iter().take(query.max_targets).map(|(_, lc)| lc.clone()).collect())
    }
}
