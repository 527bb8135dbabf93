//! transforms — time-series transforms over light curves.
//!
//! Purpose
//! -------
//! Provide the domain operations that reshape a light curve: phase folding,
//! robust detrending, outlier removal, binning, gap filling, transit masks
//! and the CDPP noise estimate.
//!
//! Key behaviors
//! -------------
//! - Every transform is a pure function of a light curve plus a validated
//!   options struct and returns a new light curve (or a derived value).
//! - Variant-preserving entry points (`flatten`, `bin`, `remove_outliers`)
//!   are exposed through [`crate::lightcurve::LightCurveLike`]; `fold`,
//!   `fill_gaps`, `create_transit_mask` and `estimate_cdpp` are inherent
//!   methods on [`LightCurve`](crate::lightcurve::LightCurve).
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN flux is never invented away except by the explicit
//!   [`GapFillMethod::Linear`] option.
//! - Working memory is linear in the number of samples.
//!
//! Conventions
//! -----------
//! - Option defaults match the documented defaults of each transform; the
//!   `with_*` setters validate and return [`TransformResult`].
//! - Clamped parameters (polyorder) and suspicious inputs (JD epochs) go
//!   through [`crate::advisory`].
//!
//! Testing notes
//! -------------
//! - Each file carries unit tests for its algorithm; `tests/` exercises the
//!   transforms in pipelines and under property-based inputs.

pub mod bin;
pub mod cdpp;
pub mod errors;
pub mod flatten;
pub mod fold;
pub mod gaps;
pub mod outliers;
pub mod savgol;
pub mod transit;
pub mod validation;

// ---- Re-exports (primary public surface) ----
pub use bin::{bin_lightcurve, BinMethod, BinOptions, BinSpec, TIME_BIN_SIZE_COLUMN};
pub use cdpp::{running_mean, CdppOptions};
pub use errors::{TransformError, TransformResult};
pub use flatten::{flatten_lightcurve, FlattenOptions, FlattenOutput};
pub use fold::FoldOptions;
pub use gaps::{GapFillMethod, GapFillOptions};
pub use outliers::{remove_outliers_lightcurve, sigma_clip, OutlierOptions, RemoveOutliersOutput};
pub use savgol::{savgol_coefficients, savgol_filter};
pub use transit::{transit_signals, TransitSignal};

pub mod prelude {
    pub use super::{
        BinMethod, BinOptions, BinSpec, CdppOptions, FlattenOptions, FlattenOutput, FoldOptions,
        GapFillMethod, GapFillOptions, OutlierOptions, RemoveOutliersOutput, TransformError,
        TransformResult, TransitSignal,
    };
}
