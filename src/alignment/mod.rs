//! alignment — reconciling light curves sampled on different index sets.
//!
//! Purpose
//! -------
//! Put two light curves on a common row index so their flux vectors can be
//! compared sample by sample (neighbor correlation, stitching diagnostics).
//!
//! Key behaviors
//! -------------
//! - [`align_to_lc`]: exact re-indexing on cadence numbers; the output's
//!   cadence sequence equals the reference's element-wise, with fill rows
//!   for cadences the source lacks.
//! - [`interpolate_to_lc`]: resampling onto the reference's time axis for
//!   light curves that share no cadence key.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both operations use O(source + reference) memory.
//! - Duplicate source cadences collapse to the first occurrence.
//!
//! Conventions
//! -----------
//! - The output always takes the source's columns, unit and metadata, and
//!   the reference's time axis.
//!
//! Downstream usage
//! ----------------
//! - [`crate::metrics::underfit_metric_neighbors`] aligns every neighbor to
//!   the subject through one of these two functions.

pub mod cadence;
pub mod errors;
pub mod interpolate;

// ---- Re-exports (primary public surface) ----
pub use cadence::align_to_lc;
pub use errors::{AlignError, AlignResult};
pub use interpolate::interpolate_to_lc;

pub mod prelude {
    pub use super::{align_to_lc, interpolate_to_lc, AlignError, AlignResult};
}
