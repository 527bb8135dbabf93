//! advisory — non-fatal warnings and the process-wide warning policy.
//!
//! Purpose
//! -------
//! Some operations are physically questionable but still well defined:
//! normalizing a zero-centred flux, folding on an epoch that looks like a
//! full Julian Date when the time axis is reduced, or silently clamping a
//! smoothing polynomial order. Those operations complete, and the condition
//! is reported as a typed [`Advisory`].
//!
//! Key behaviors
//! -------------
//! - [`emit`] routes an advisory according to the current
//!   [`AdvisoryPolicy`]: log it through `tracing::warn!` (default), drop it,
//!   or hand it back as an error so the caller aborts.
//! - Every subsystem error enum carries an `Advisory(Advisory)` variant with
//!   a `From<Advisory>` conversion, so call sites write
//!   `advisory::emit(...)?`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The policy is the only process-wide mutable state in the crate. It is
//!   stored in an atomic and may be changed at any time; concurrent readers
//!   see either the old or the new policy.
//!
//! Testing notes
//! -------------
//! - Unit tests here use [`emit_with`] so they never touch the global policy
//!   (tests run in parallel threads). The global switch is exercised by a
//!   dedicated integration-test binary.

use std::sync::atomic::{AtomicU8, Ordering};

/// A physically questionable condition detected while an operation ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// Median flux is within half a standard deviation of zero.
    ZeroCenteredFlux { median: f64, std: f64 },
    /// Median flux is negative.
    NegativeFlux { median: f64 },
    /// Fold epoch exceeds 2,400,000 while every timestamp is below it.
    EpochLooksLikeJd { epoch_time: f64, max_time: f64 },
    /// `polyorder` was not strictly below `window_length` and got clamped.
    PolyorderAdjusted { requested: usize, used: usize },
    /// The generic setter created a brand-new attribute.
    NewAttribute { name: String },
}

impl Advisory {
    /// Short machine-friendly tag used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Advisory::ZeroCenteredFlux { .. } => "zero_centered_flux",
            Advisory::NegativeFlux { .. } => "negative_flux",
            Advisory::EpochLooksLikeJd { .. } => "epoch_looks_like_jd",
            Advisory::PolyorderAdjusted { .. } => "polyorder_adjusted",
            Advisory::NewAttribute { .. } => "new_attribute",
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::ZeroCenteredFlux { median, std } => write!(
                f,
                "The light curve appears to be zero-centered (median={median:.3e} \
                 +/- {std:.3e}); `normalize()` will divide the light curve by a value \
                 close to zero, which is probably not what you want."
            ),
            Advisory::NegativeFlux { median } => write!(
                f,
                "The light curve has a negative median flux ({median:.3e}); `normalize()` \
                 will therefore divide by a negative number and invert the light curve, \
                 which is probably not what you want."
            ),
            Advisory::EpochLooksLikeJd { epoch_time, max_time } => write!(
                f,
                "The epoch_time {epoch_time} appears to be given in Julian Date while the \
                 time axis ends at {max_time}; convert the epoch to the light curve's \
                 time format."
            ),
            Advisory::PolyorderAdjusted { requested, used } => write!(
                f,
                "polyorder={requested} must be smaller than window_length; using \
                 polyorder={used} instead."
            ),
            Advisory::NewAttribute { name } => write!(
                f,
                "Setting a new attribute `{name}`: it is neither an existing column nor a \
                 documented metadata key."
            ),
        }
    }
}

/// How advisories are handled process-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvisoryPolicy {
    /// Log through `tracing::warn!` and continue.
    #[default]
    Warn,
    /// Continue silently.
    Ignore,
    /// Abort the operation with the advisory as an error.
    Error,
}

impl AdvisoryPolicy {
    fn to_u8(self) -> u8 {
        match self {
            AdvisoryPolicy::Warn => 0,
            AdvisoryPolicy::Ignore => 1,
            AdvisoryPolicy::Error => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => AdvisoryPolicy::Ignore,
            2 => AdvisoryPolicy::Error,
            _ => AdvisoryPolicy::Warn,
        }
    }
}

static POLICY: AtomicU8 = AtomicU8::new(0);

/// Replace the process-wide advisory policy.
pub fn set_advisory_policy(policy: AdvisoryPolicy) {
    POLICY.store(policy.to_u8(), Ordering::Relaxed);
}

/// Current process-wide advisory policy.
pub fn advisory_policy() -> AdvisoryPolicy {
    AdvisoryPolicy::from_u8(POLICY.load(Ordering::Relaxed))
}

/// Route `advisory` through the process-wide policy.
///
/// Errors
/// ------
/// - Returns the advisory itself when the policy is
///   [`AdvisoryPolicy::Error`]; callers convert it with `?`.
pub fn emit(advisory: Advisory) -> Result<(), Advisory> {
    emit_with(advisory_policy(), advisory)
}

/// Route `advisory` through an explicit policy.
pub fn emit_with(policy: AdvisoryPolicy, advisory: Advisory) -> Result<(), Advisory> {
    match policy {
        AdvisoryPolicy::Warn => {
            tracing::warn!(kind = advisory.kind(), "{advisory}");
            Ok(())
        }
        AdvisoryPolicy::Ignore => Ok(()),
        AdvisoryPolicy::Error => Err(advisory),
    }
}
