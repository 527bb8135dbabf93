//! rust_lightcurve — astronomical light curves, transforms and correction metrics.
//!
//! Purpose
//! -------
//! Provide a typed light-curve container for space-telescope photometry and
//! the numerical operations built on it: alignment of curves sampled on
//! different cadences, phase folding, robust detrending, binning, gap
//! filling, noise estimates, and the quality metrics used to judge
//! systematics-correction pipelines.
//!
//! Key behaviors
//! -------------
//! - [`lightcurve`]: the data model (time axis, flux with units, mission
//!   fields, auxiliary columns, metadata), the folded variant, collections
//!   and stitching.
//! - [`alignment`]: re-indexing on cadence numbers and time interpolation.
//! - [`transforms`]: fold, flatten, bin, remove outliers, fill gaps, transit
//!   masks, CDPP.
//! - [`metrics`]: Lomb–Scargle overfit score, neighbor-correlation underfit
//!   score, correlation matrices.
//! - [`advisory`]: the process-wide policy for non-fatal warnings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Light curves are value objects; every operation returns a new instance
//!   except the explicitly mutable flux accessors.
//! - All columns share the time axis length and time values are finite.
//! - The advisory policy is the only global state; nothing here spawns
//!   threads or performs I/O.
//!
//! Conventions
//! -----------
//! - Each subsystem exposes an `XxxError` enum with an `XxxResult<T>` alias;
//!   errors of lower layers are wrapped, advisories escalate into an
//!   `Advisory` variant when the policy is `Error`.
//! - Logging goes through `tracing`; the library never installs a
//!   subscriber.
//!
//! Downstream usage
//! ----------------
//! - `use rust_lightcurve::prelude::*;` brings the light-curve types,
//!   option structs and metric entry points into scope.

pub mod advisory;
pub mod alignment;
pub mod lightcurve;
pub mod metrics;
pub mod transforms;
pub mod utils;

pub mod prelude {
    pub use crate::advisory::{advisory_policy, set_advisory_policy, Advisory, AdvisoryPolicy};
    pub use crate::alignment::prelude::*;
    pub use crate::lightcurve::prelude::*;
    pub use crate::metrics::prelude::*;
    pub use crate::transforms::prelude::*;
}
