//! Integration tests for the light-curve correction pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a correction pipeline takes: build a
//!   light curve with instrumental systematics and transits, detrend it,
//!   fold and bin it, estimate its noise, and score the correction with
//!   both quality metrics against aligned neighbors.
//! - Exercise realistic sizes (thousands of cadences, several neighbors)
//!   rather than toy inputs only.
//!
//! Coverage
//! --------
//! - `transforms`: transit masks, masked flatten, fold, bin on the folded
//!   variant, CDPP, gap filling.
//! - `alignment`: cadence alignment of partially overlapping curves.
//! - `metrics`: overfit and underfit scores on raw vs corrected flux.
//! - `lightcurve`: stitching of a collection.
//!
//! Exclusions
//! ----------
//! - Small-input edge cases and option validation; those are covered by
//!   the unit tests next to each module.
use std::f64::consts::PI;

use rust_lightcurve::alignment::align_to_lc;
use rust_lightcurve::lightcurve::{LightCurve, LightCurveCollection, LightCurveLike};
use rust_lightcurve::metrics::{
    overfit_metric_lombscargle, underfit_metric_neighbors, OverfitOptions, StaticNeighbors,
    UnderfitOptions,
};
use rust_lightcurve::transforms::{
    BinMethod, BinOptions, BinSpec, CdppOptions, FlattenOptions, FoldOptions, GapFillOptions,
    TransitSignal,
};

const N: usize = 2000;
const DT: f64 = 0.02;
const PERIOD: f64 = 3.2;
const DURATION: f64 = 0.15;
const EPOCH: f64 = 1.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn time() -> Vec<f64> {
    (0..N).map(|i| i as f64 * DT).collect()
}

/// Deterministic zero-mean jitter of amplitude `1e-4`, decorrelated across
/// seeds.
fn jitter(i: usize, seed: u64) -> f64 {
    let h = (i as u64).wrapping_mul(2_654_435_761).wrapping_add(seed.wrapping_mul(40_503)) % 1000;
    (h as f64 / 1000.0 - 0.5) * 2e-4
}

/// Shared instrumental systematic: a 1% sinusoid with a 10 d period.
fn systematic(t: f64) -> f64 {
    0.01 * (2.0 * PI * t / 10.0).sin()
}

/// Purpose
/// -------
/// Subject light curve: systematics, 0.5% transits, jitter and cadence
/// numbers starting at 1.
fn subject() -> LightCurve {
    let signal = TransitSignal::new(PERIOD, DURATION, EPOCH).unwrap();
    let t = time();
    let flux: Vec<f64> = t
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let depth = if signal.contains(x) { 0.005 } else { 0.0 };
            1000.0 * (1.0 + systematic(x) - depth + jitter(i, 1))
        })
        .collect();
    LightCurve::builder(t)
        .flux(flux)
        .flux_err(vec![0.1; N])
        .cadenceno((1..=N as i64).collect::<Vec<_>>())
        .targetid(1_i64)
        .build()
        .unwrap()
}

/// Neighbor at a different brightness sharing only the systematic.
fn neighbor(k: usize) -> LightCurve {
    let t = time();
    let level = 500.0 + 100.0 * k as f64;
    let flux: Vec<f64> = t
        .iter()
        .enumerate()
        .map(|(i, &x)| level * (1.0 + systematic(x) + jitter(i, 10 + k as u64)))
        .collect();
    LightCurve::builder(t)
        .flux(flux)
        .cadenceno((1..=N as i64).collect::<Vec<_>>())
        .targetid(100 + k as i64)
        .build()
        .unwrap()
}

#[test]
// Purpose
// -------
// Run the full correction pipeline and check each stage's physics.
//
// Given
// -----
// - A 40 d subject with 1% systematics and 0.5% transits every 3.2 d.
//
// Expect
// ------
// - The transit mask flags roughly duration/period of the samples.
// - Masked flattening leaves a dimensionless curve with ~0.5% dips.
// - Folding and binning put the dip at phase 0.
// - CDPP is finite, positive and small.
fn correction_pipeline_recovers_transits() {
    init_tracing();
    let raw = subject();

    let signal = TransitSignal::new(PERIOD, DURATION, EPOCH).unwrap();
    let in_transit = raw.create_transit_mask(&[signal]).unwrap();
    let fraction = in_transit.iter().filter(|&&m| m).count() as f64 / N as f64;
    assert!((fraction - DURATION / PERIOD).abs() < 0.01, "in-transit fraction {fraction}");

    let opts = FlattenOptions::new()
        .with_window_length(151)
        .unwrap()
        .with_mask(in_transit.to_vec())
        .with_return_trend(true);
    let out = raw.flatten(&opts).unwrap();
    let flat = out.flat;
    let trend = out.trend.unwrap();
    assert!(flat.is_normalized());
    assert_eq!(trend.flux_unit(), raw.flux_unit());

    let fold_opts = FoldOptions::new(PERIOD).unwrap().with_epoch_time(EPOCH).unwrap();
    let folded = flat.fold(&fold_opts).unwrap();
    let phase = folded.phase().to_vec();
    let flux = folded.inner().flux().to_vec();
    let mean_where = |keep: &dyn Fn(f64) -> bool| -> f64 {
        let picked: Vec<f64> =
            phase.iter().zip(&flux).filter(|(p, _)| keep(**p)).map(|(_, f)| *f).collect();
        picked.iter().sum::<f64>() / picked.len() as f64
    };
    let dip = mean_where(&|p: f64| p.abs() < 0.5 * DURATION * 0.8);
    let baseline = mean_where(&|p: f64| p.abs() > 0.5);
    assert!((baseline - 1.0).abs() < 1e-3, "baseline {baseline}");
    assert!((baseline - dip - 0.005).abs() < 1e-3, "depth {}", baseline - dip);

    let bin_opts = BinOptions::new(BinSpec::Count(40), BinMethod::Median).unwrap();
    let binned = folded.bin(&bin_opts).unwrap();
    assert_eq!(binned.len(), 40);
    let deepest = binned
        .inner()
        .flux()
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(f64::INFINITY, f64::min);
    assert!(deepest < 0.997, "deepest binned flux {deepest}");

    let cdpp = flat.estimate_cdpp(&CdppOptions::default()).unwrap();
    assert!(cdpp.is_finite() && cdpp > 0.0 && cdpp < 1e4, "cdpp {cdpp} ppm");
}

#[test]
// Purpose
// -------
// Score the correction with both metrics.
//
// Given
// -----
// - The subject before and after masked flattening.
// - Five neighbors sharing the systematic, served from memory.
//
// Expect
// ------
// - Underfit: the raw curve is strongly correlated with its neighbors,
//   the corrected one is not.
// - Overfit: the corrected curve scored against itself is perfect, while
//   a sinusoid injected well above the noise floor is penalized.
fn metrics_separate_raw_and_corrected_flux() {
    init_tracing();
    let raw = subject();
    let signal = TransitSignal::new(PERIOD, DURATION, EPOCH).unwrap();
    let mask = raw.create_transit_mask(&[signal]).unwrap().to_vec();
    let opts = FlattenOptions::new().with_window_length(151).unwrap().with_mask(mask);
    let flat = raw.flatten(&opts).unwrap().flat;

    let source = (0..5).fold(StaticNeighbors::new(), |s, k| {
        s.with_candidate(60.0 * (k + 1) as f64, neighbor(k))
    });
    let options = UnderfitOptions::new().with_targets(3, 5).unwrap();
    let raw_score = underfit_metric_neighbors(&raw, &source, &options).unwrap();
    let flat_score = underfit_metric_neighbors(&flat, &source, &options).unwrap();
    assert!(raw_score < 0.3, "raw underfit score {raw_score}");
    assert!(flat_score > 0.5, "corrected underfit score {flat_score}");

    let grid = OverfitOptions::new().with_oversample_factor(1.0).unwrap();
    let injected = {
        let mut lc = flat.clone();
        let t = lc.time_values().to_vec();
        for (f, &x) in lc.flux_mut().iter_mut().zip(&t) {
            *f += 0.01 * (2.0 * PI * x / 0.7).sin();
        }
        lc
    };
    assert_eq!(overfit_metric_lombscargle(&flat, &flat, &grid).unwrap(), 1.0);
    let spurious = overfit_metric_lombscargle(&flat, &injected, &grid).unwrap();
    assert!(spurious < 0.5, "injected sinusoid scored {spurious}");
}

#[test]
// Purpose
// -------
// Align partially overlapping curves on cadence numbers.
//
// Given
// -----
// - 990 cadences at 0.1 d; lc1 keeps rows [0, 10) ∪ [20, 100), lc2 keeps
//   rows [0, 50) ∪ [70, 100).
//
// Expect
// ------
// - lc2 aligned to lc1 carries exactly lc1's cadence numbers, with NaN flux
//   where lc2 lacks a cadence.
fn cadence_alignment_of_gapped_curves() {
    init_tracing();
    let t: Vec<f64> = (0..990).map(|i| 1.0 + i as f64 * 0.1).collect();
    let cadences: Vec<i64> = (1..=990).collect();
    let constant = |level: f64| -> LightCurve {
        LightCurve::builder(t.clone())
            .flux(vec![level; 990])
            .flux_err(vec![0.0; 990])
            .cadenceno(cadences.clone())
            .build()
            .unwrap()
    };
    let (lc1, lc2) = (constant(1.0), constant(2.0));

    let rows = |ranges: &[std::ops::Range<usize>]| -> Vec<usize> {
        ranges.iter().cloned().flatten().collect()
    };
    let lc1 = lc1.take(&rows(&[0..10, 20..100])).unwrap();
    let lc2 = lc2.take(&rows(&[0..50, 70..100])).unwrap();

    let aligned = align_to_lc(&lc2, &lc1).unwrap();

    assert_eq!(aligned.cadenceno().unwrap(), lc1.cadenceno().unwrap());
    let missing = aligned.flux().iter().filter(|f| f.is_nan()).count();
    assert_eq!(missing, 20);
}

#[test]
// Purpose
// -------
// Stitch two sectors and restore a missing stretch of cadences.
//
// Given
// -----
// - Two sectors at different flux levels, the second missing 25 cadences.
//
// Expect
// ------
// - Stitching normalizes each sector and sorts by time.
// - Gap filling reinstates the missing cadences with NaN flux.
fn stitch_then_fill_gaps() {
    init_tracing();
    let sector = |start: i64, level: f64, skip: std::ops::Range<i64>| -> LightCurve {
        let cadences: Vec<i64> = (start..start + 100).filter(|c| !skip.contains(c)).collect();
        let t: Vec<f64> = cadences.iter().map(|&c| c as f64 * DT).collect();
        LightCurve::builder(t)
            .flux(vec![level; cadences.len()])
            .cadenceno(cadences)
            .build()
            .unwrap()
    };
    let collection: LightCurveCollection =
        vec![sector(100, 900.0, 150..175), sector(0, 300.0, 0..0)].into_iter().collect();

    let stitched = collection.stitch().unwrap().unwrap();
    assert_eq!(stitched.len(), 175);
    assert!(stitched.flux().iter().all(|f| (f - 1.0).abs() < 1e-12));
    assert!(stitched.time_values().to_vec().windows(2).all(|w| w[0] < w[1]));

    let filled = stitched.fill_gaps(&GapFillOptions::default()).unwrap();
    assert_eq!(filled.len(), 200);
    assert_eq!(filled.flux().iter().filter(|f| f.is_nan()).count(), 25);
}
