//! metrics — quality scores for systematics-corrected light curves.
//!
//! Purpose
//! -------
//! Quantify two failure modes of a systematics correction:
//! overfitting (variability injected by the correction) and underfitting
//! (instrumental trends shared with nearby stars left in place).
//!
//! Key behaviors
//! -------------
//! - [`overfit_metric_lombscargle`]: compares Lomb–Scargle amplitude spectra
//!   of the original and corrected curves against a white-noise floor.
//! - [`underfit_metric_neighbors`]: correlates the corrected curve with
//!   neighbors supplied by a [`NeighborSource`] after aligning them.
//! - [`compute_correlation`]: pairwise-complete correlation matrix about
//!   zero, NaN for degenerate rows.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both scores lie in [0, 1]; 1.0 is a perfect correction.
//! - Degenerate inputs (empty, constant, all-NaN) give a defined score,
//!   never an error.
//!
//! Conventions
//! -----------
//! - Every metric takes a validated options struct whose `Default` carries
//!   the documented defaults.
//! - Flux rows are compared as fractional deviations `flux / median - 1`.
//!
//! Downstream usage
//! ----------------
//! - Pipelines score a corrector by running both metrics on its output;
//!   the neighbor lookup is injected, so offline runs use
//!   [`StaticNeighbors`].

pub mod correlation;
pub mod errors;
pub mod lombscargle;
pub mod neighbors;
pub mod overfit;
pub mod underfit;

// ---- Re-exports (primary public surface) ----
pub use correlation::compute_correlation;
pub use errors::{MetricsError, MetricsResult};
pub use lombscargle::{frequency_grid, lomb_scargle_amplitude, lomb_scargle_power};
pub use neighbors::{NeighborQuery, NeighborSource, StaticNeighbors};
pub use overfit::{overfit_metric_lombscargle, OverfitOptions};
pub use underfit::{
    underfit_metric_neighbors, CorrelationReduction, NeighborAlignment, UnderfitOptions,
};

pub mod prelude {
    pub use super::{
        compute_correlation, overfit_metric_lombscargle, underfit_metric_neighbors,
        CorrelationReduction, MetricsError, MetricsResult, NeighborAlignment, NeighborQuery,
        NeighborSource, OverfitOptions, StaticNeighbors, UnderfitOptions,
    };
}
