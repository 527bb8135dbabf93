//! lightcurve — the light-curve data model.
//!
//! Purpose
//! -------
//! Provide the value types every other subsystem consumes: [`LightCurve`]
//! (time, flux, flux uncertainty, mission fields, auxiliary columns,
//! metadata), its phase-folded variant [`FoldedLightCurve`], and the
//! [`LightCurveCollection`] used for stitching.
//!
//! Key behaviors
//! -------------
//! - Construction validates structure (equal column lengths, finite time).
//! - Every operation returns a new light curve; the `*_mut` accessors are
//!   the documented in-place escape hatch.
//! - Names resolve through an explicit attribute > column > metadata lookup
//!   ([`LightCurve::lookup`]).
//! - Mission variants are a tag plus optional fields ([`Mission`],
//!   [`MissionColumns`]), not separate types.
//! - Variant-preserving operations live on [`LightCurveLike`].
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN marks missing flux or auxiliary values; time is never NaN.
//! - Metadata propagates unchanged unless an operation owns the flag.
//!
//! Conventions
//! -----------
//! - Errors are reported as [`LightCurveError`]; transforms, alignment and
//!   metrics wrap it in their own error types.
//! - Advisories go through [`crate::advisory`].
//!
//! Downstream usage
//! ----------------
//! - Import the [`prelude`] for the types and the [`LightCurveLike`] trait.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own primitives; end-to-end
//!   behaviour is covered by the integration tests under `tests/`.

pub mod collection;
pub mod column;
pub mod data;
pub mod errors;
pub mod folded;
pub mod lookup;
pub mod meta;
pub mod mission;
pub mod ops;
pub mod series;
pub mod time;
pub mod units;

// ---- Re-exports (primary public surface) ----
pub use collection::LightCurveCollection;
pub use column::{Column, ColumnData};
pub use data::{LightCurve, LightCurveBuilder, LightCurveParts};
pub use errors::{LightCurveError, LightCurveResult};
pub use folded::{FoldParameters, FoldedLightCurve};
pub use lookup::{Assign, ColumnView, Lookup};
pub use meta::{keys, Meta, MetaValue};
pub use mission::{Mission, MissionColumns};
pub use series::LightCurveLike;
pub use time::{TimeAxis, TimeFormat, TimeScale, TimeSpan};
pub use units::Unit;

pub mod prelude {
    pub use super::{
        Column, ColumnData, FoldedLightCurve, LightCurve, LightCurveCollection, LightCurveError,
        LightCurveLike, LightCurveResult, Meta, MetaValue, Mission, TimeFormat, TimeSpan, Unit,
    };
}
