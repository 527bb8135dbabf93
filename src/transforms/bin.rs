//! transforms::bin — aggregating samples into time bins.
//!
//! Purpose
//! -------
//! Downsample a light curve by grouping samples into bins along the time
//! axis and aggregating every column per bin.
//!
//! Key behaviors
//! -------------
//! - Four ways to define bins ([`BinSpec`]): a fixed bin width from a start
//!   time, a bin count spanning the data, explicit edges, or a fixed number
//!   of consecutive samples per bin.
//! - Grid-based bins (width, count, edges) are all emitted, empty ones with
//!   NaN flux, so `BinSpec::Count(n)` always yields `n` rows. The bin time is
//!   the bin center. Samples outside explicit edges are ignored.
//! - `SamplesPerBin` bins time at the mean member time.
//! - Aggregation per column kind:
//!   - flux: mean or median ([`BinMethod`]) of the finite members;
//!   - flux_err: `sqrt(Σσ²) / N` over the finite uncertainties, or the
//!     population standard deviation of the member flux when no member has
//!     a finite uncertainty;
//!   - quality: bitwise OR (0 for empty bins);
//!   - cadenceno: first member (-1 for empty bins);
//!   - centroid/background and float columns: NaN-mean;
//!   - boolean columns: any; integer and text columns are dropped.
//! - A `time_bin_size` column (days) records each bin's width.
//!
//! Invariants & assumptions
//! ------------------------
//! - Memory is O(N + bins): one bin index per sample, then a counting sort
//!   into a compressed member list. No per-bin masks over the full input
//!   are ever built.
//! - Metadata, attributes, the mission tag and the flux unit carry over
//!   unchanged.

use std::collections::BTreeMap;
use std::str::FromStr;

use ndarray::Array1;

use crate::lightcurve::column::{Column, ColumnData};
use crate::lightcurve::data::{LightCurve, LightCurveParts};
use crate::lightcurve::mission::MissionColumns;
use crate::lightcurve::time::TimeSpan;
use crate::lightcurve::units::Unit;
use crate::transforms::errors::{TransformError, TransformResult};
use crate::utils::{median_positive_step, nan_mean, nan_median, nan_population_std};

/// Name of the per-bin width column added to binned light curves.
pub const TIME_BIN_SIZE_COLUMN: &str = "time_bin_size";

/// How bins are laid out along the time axis.
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Fixed-width bins from `start` (default: first sample). `n_bins`
    /// defaults to enough bins to cover the data.
    TimeBinSize { size: TimeSpan, start: Option<f64>, n_bins: Option<usize> },
    /// `n` equal-width bins spanning `[min(time), max(time)]`.
    Count(usize),
    /// Explicit, strictly increasing bin edges.
    Edges(Vec<f64>),
    /// Consecutive groups of `n` samples.
    SamplesPerBin(usize),
}

impl Default for BinSpec {
    fn default() -> Self {
        BinSpec::TimeBinSize { size: TimeSpan::days(0.5), start: None, n_bins: None }
    }
}

impl BinSpec {
    /// Fixed-width bins starting at the first sample.
    pub fn time_bin_size(size: impl Into<TimeSpan>) -> Self {
        BinSpec::TimeBinSize { size: size.into(), start: None, n_bins: None }
    }

    /// A bin count given as a float, as it arrives from loosely typed input.
    ///
    /// Errors
    /// ------
    /// - `NonIntegerCount { name: "bins" }` for fractional or non-finite
    ///   values; `InvalidBinCount` for counts below one.
    pub fn try_count(bins: f64) -> TransformResult<Self> {
        if !bins.is_finite() || bins.fract() != 0.0 {
            return Err(TransformError::NonIntegerCount { name: "bins", value: bins });
        }
        if bins < 1.0 {
            return Err(TransformError::InvalidBinCount { name: "bins", value: 0 });
        }
        Ok(BinSpec::Count(bins as usize))
    }

    fn validate(&self) -> TransformResult<()> {
        match self {
            BinSpec::TimeBinSize { size, start, n_bins } => {
                if !size.is_positive_finite() {
                    return Err(TransformError::InvalidBinSize(size.as_days()));
                }
                if let Some(s) = start.filter(|s| !s.is_finite()) {
                    return Err(TransformError::InvalidEpoch { name: "time_bin_start", value: s });
                }
                if *n_bins == Some(0) {
                    return Err(TransformError::InvalidBinCount { name: "n_bins", value: 0 });
                }
            }
            BinSpec::Count(0) => {
                return Err(TransformError::InvalidBinCount { name: "bins", value: 0 });
            }
            BinSpec::Count(_) => {}
            BinSpec::Edges(edges) => {
                if edges.len() < 2 {
                    return Err(TransformError::InvalidBinEdges(format!(
                        "need at least two edges, got {}",
                        edges.len()
                    )));
                }
                if edges.iter().any(|e| !e.is_finite()) {
                    return Err(TransformError::InvalidBinEdges("edges must be finite".into()));
                }
                if edges.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(TransformError::InvalidBinEdges(
                        "edges must be strictly increasing".into(),
                    ));
                }
            }
            BinSpec::SamplesPerBin(0) => {
                return Err(TransformError::InvalidBinCount { name: "binsize", value: 0 });
            }
            BinSpec::SamplesPerBin(_) => {}
        }
        Ok(())
    }
}

/// Aggregation applied to flux within a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinMethod {
    #[default]
    Mean,
    Median,
}

impl FromStr for BinMethod {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(BinMethod::Mean),
            "median" => Ok(BinMethod::Median),
            _ => Err(TransformError::UnsupportedMethod { name: "method", value: s.to_string() }),
        }
    }
}

/// BinOptions — bin layout plus flux aggregation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinOptions {
    pub spec: BinSpec,
    pub method: BinMethod,
}

impl BinOptions {
    /// Validate and bundle a bin layout with an aggregation method.
    ///
    /// Errors
    /// ------
    /// - `InvalidBinSize`, `InvalidBinCount`, `InvalidBinEdges` or
    ///   `InvalidEpoch` naming the offending argument.
    pub fn new(spec: BinSpec, method: BinMethod) -> TransformResult<Self> {
        spec.validate()?;
        Ok(BinOptions { spec, method })
    }
}

/// Bin layout resolved against concrete data.
struct Layout {
    /// Bin index of every input sample (`None` = outside every bin).
    assignment: Vec<Option<usize>>,
    /// Bin time; `None` means "mean member time".
    centers: Option<Vec<f64>>,
    widths: Vec<f64>,
    n_bins: usize,
}

/// Grid bins allowed per input sample when the count is derived from a width.
const MAX_BINS_PER_SAMPLE: usize = 1_000;
/// Derived grids below this many bins are always accepted.
const MIN_BIN_LIMIT: usize = 1 << 16;

/// Upper bound on a width-derived bin count for `samples` inputs.
fn derived_bin_limit(samples: usize) -> usize {
    samples.saturating_mul(MAX_BINS_PER_SAMPLE).max(MIN_BIN_LIMIT)
}

fn resolve_layout(time: &[f64], spec: &BinSpec) -> TransformResult<Layout> {
    let tmin = time.iter().copied().fold(f64::INFINITY, f64::min);
    let tmax = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let uniform = |start: f64, width: f64, n: usize, end: f64| -> Layout {
        let assignment = time
            .iter()
            .map(|&t| {
                if t < start || t > end {
                    return None;
                }
                if width == 0.0 {
                    return Some(0);
                }
                Some((((t - start) / width).floor() as usize).min(n - 1))
            })
            .collect();
        Layout {
            assignment,
            centers: Some((0..n).map(|k| start + (k as f64 + 0.5) * width).collect()),
            widths: vec![width; n],
            n_bins: n,
        }
    };

    match spec {
        BinSpec::TimeBinSize { size, start, n_bins } => {
            let width = size.as_days();
            let start = start.unwrap_or(tmin);
            let n = match n_bins {
                Some(n) => *n,
                None => {
                    let span = ((tmax - start) / width).ceil();
                    if span > derived_bin_limit(time.len()) as f64 {
                        return Err(TransformError::InvalidBinSize(width));
                    }
                    (span as usize).max(1)
                }
            };
            Ok(uniform(start, width, n, start + width * n as f64))
        }
        BinSpec::Count(n) => Ok(uniform(tmin, (tmax - tmin) / *n as f64, *n, tmax)),
        BinSpec::Edges(edges) => {
            let last = edges.len() - 1;
            let assignment = time
                .iter()
                .map(|&t| {
                    if t < edges[0] || t > edges[last] {
                        return None;
                    }
                    Some((edges.partition_point(|&e| e <= t) - 1).min(last - 1))
                })
                .collect();
            Ok(Layout {
                assignment,
                centers: Some(edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()),
                widths: edges.windows(2).map(|w| w[1] - w[0]).collect(),
                n_bins: last,
            })
        }
        BinSpec::SamplesPerBin(k) => {
            let n = time.len().div_ceil(*k);
            let width = *k as f64 * median_positive_step(time).unwrap_or(0.0);
            Ok(Layout {
                assignment: (0..time.len()).map(|i| Some(i / k)).collect(),
                centers: None,
                widths: vec![width; n],
                n_bins: n,
            })
        }
    }
}

/// Members of each bin in compressed form (counting sort).
struct BinMembers {
    offsets: Vec<usize>,
    members: Vec<usize>,
}

impl BinMembers {
    fn build(assignment: &[Option<usize>], n_bins: usize) -> Self {
        let mut offsets = vec![0usize; n_bins + 1];
        for b in assignment.iter().flatten() {
            offsets[b + 1] += 1;
        }
        for k in 0..n_bins {
            offsets[k + 1] += offsets[k];
        }
        let mut cursor = offsets.clone();
        let mut members = vec![0usize; offsets[n_bins]];
        for (i, b) in assignment.iter().enumerate() {
            if let Some(b) = b {
                members[cursor[*b]] = i;
                cursor[*b] += 1;
            }
        }
        BinMembers { offsets, members }
    }

    fn bin(&self, k: usize) -> &[usize] {
        &self.members[self.offsets[k]..self.offsets[k + 1]]
    }
}

/// Apply `reduce` to the members of every bin, reusing one scratch buffer.
fn per_bin(
    groups: &BinMembers, n_bins: usize, values: &Array1<f64>, reduce: impl Fn(&[f64]) -> f64,
) -> Array1<f64> {
    let mut scratch: Vec<f64> = Vec::new();
    (0..n_bins)
        .map(|k| {
            scratch.clear();
            scratch.extend(groups.bin(k).iter().map(|&i| values[i]));
            reduce(&scratch)
        })
        .collect()
}

fn propagated_error(errors: &[f64], flux: &[f64]) -> f64 {
    let (sum_sq, count) = errors
        .iter()
        .filter(|e| e.is_finite())
        .fold((0.0, 0usize), |(s, c), e| (s + e * e, c + 1));
    if count > 0 {
        sum_sq.sqrt() / count as f64
    } else {
        nan_population_std(flux)
    }
}

/// Bin `lc` according to `opts`; see the module docs.
///
/// Errors
/// ------
/// - Option validation errors (see [`BinOptions::new`]).
/// - `InsufficientSamples` for an empty light curve.
/// - `InvalidBinSize` when `time_bin_size` is so small relative to the
///   baseline that the derived grid exceeds 1000 bins per sample.
pub fn bin_lightcurve(lc: &LightCurve, opts: &BinOptions) -> TransformResult<LightCurve> {
    opts.spec.validate()?;
    if lc.is_empty() {
        return Err(TransformError::InsufficientSamples {
            operation: "bin",
            required: 1,
            found: 0,
        });
    }

    let time = lc.time_values();
    let layout = resolve_layout(&time.to_vec(), &opts.spec)?;
    let n_bins = layout.n_bins;
    let groups = BinMembers::build(&layout.assignment, n_bins);
    tracing::debug!(samples = lc.len(), bins = n_bins, binned = groups.members.len(), "binning");

    let flux_reduce = match opts.method {
        BinMethod::Mean => nan_mean,
        BinMethod::Median => nan_median,
    };
    let flux = per_bin(&groups, n_bins, lc.flux(), flux_reduce);

    let flux_err: Array1<f64> = (0..n_bins)
        .map(|k| {
            let rows = groups.bin(k);
            let errors: Vec<f64> = rows.iter().map(|&i| lc.flux_err()[i]).collect();
            let values: Vec<f64> = rows.iter().map(|&i| lc.flux()[i]).collect();
            propagated_error(&errors, &values)
        })
        .collect();

    let bin_time: Array1<f64> = match &layout.centers {
        Some(centers) => Array1::from(centers.clone()),
        None => per_bin(&groups, n_bins, time, nan_mean),
    };

    let source = lc.mission_columns();
    let mission_columns = MissionColumns {
        cadenceno: source.cadenceno.as_ref().map(|c| {
            (0..n_bins).map(|k| groups.bin(k).first().map_or(-1, |&i| c[i])).collect()
        }),
        quality: source.quality.as_ref().map(|q| {
            (0..n_bins).map(|k| groups.bin(k).iter().fold(0u32, |acc, &i| acc | q[i])).collect()
        }),
        centroid_col: source.centroid_col.as_ref().map(|a| per_bin(&groups, n_bins, a, nan_mean)),
        centroid_row: source.centroid_row.as_ref().map(|a| per_bin(&groups, n_bins, a, nan_mean)),
        background: source.background.as_ref().map(|a| per_bin(&groups, n_bins, a, nan_mean)),
    };

    let mut columns: BTreeMap<String, Column> = BTreeMap::new();
    for (name, column) in lc.columns() {
        let data = match &column.data {
            ColumnData::Float(values) => {
                ColumnData::Float(per_bin(&groups, n_bins, values, nan_mean))
            }
            ColumnData::Bool(values) => ColumnData::Bool(
                (0..n_bins).map(|k| groups.bin(k).iter().any(|&i| values[i])).collect(),
            ),
            ColumnData::Int(_) | ColumnData::Text(_) => {
                tracing::debug!(column = %name, "dropping non-aggregatable column");
                continue;
            }
        };
        columns.insert(name.clone(), Column { data, unit: column.unit.clone() });
    }
    columns.insert(
        TIME_BIN_SIZE_COLUMN.to_string(),
        Column::float(layout.widths).with_unit(Unit::Day),
    );

    Ok(LightCurve::from_parts(LightCurveParts {
        time: lc.time().with_values(bin_time),
        flux,
        flux_err,
        flux_unit: lc.flux_unit().clone(),
        mission: lc.mission(),
        mission_columns,
        columns,
        meta: lc.meta().clone(),
        attrs: lc.attrs().clone(),
    })?)
}
