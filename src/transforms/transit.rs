//! transforms::transit — boolean masks of predicted transit windows.
//!
//! A sample is in transit when it lies within half a duration of any
//! predicted mid-transit time `transit_time + k × period`. Several signals
//! combine with logical OR.

use ndarray::Array1;

use crate::lightcurve::data::LightCurve;
use crate::lightcurve::time::TimeSpan;
use crate::transforms::errors::{TransformError, TransformResult};
use crate::transforms::validation::{validate_duration, validate_period};

/// One periodic transit signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitSignal {
    pub period: TimeSpan,
    pub duration: TimeSpan,
    /// Mid-transit reference time, in the light curve's time format.
    pub transit_time: f64,
}

impl TransitSignal {
    /// Validated signal.
    ///
    /// Errors
    /// ------
    /// - `InvalidPeriod` / `InvalidDuration` for non-positive or non-finite
    ///   values; `InvalidEpoch` for a non-finite transit time.
    pub fn new(
        period: impl Into<TimeSpan>, duration: impl Into<TimeSpan>, transit_time: f64,
    ) -> TransformResult<Self> {
        let signal = TransitSignal { period: period.into(), duration: duration.into(), transit_time };
        signal.validate()?;
        Ok(signal)
    }

    fn validate(&self) -> TransformResult<()> {
        validate_period(self.period.as_days())?;
        validate_duration("duration", self.duration.as_days())?;
        if !self.transit_time.is_finite() {
            return Err(TransformError::InvalidEpoch {
                name: "transit_time",
                value: self.transit_time,
            });
        }
        Ok(())
    }

    /// Whether `t` lies within half a duration of a predicted transit center.
    pub fn contains(&self, t: f64) -> bool {
        let period = self.period.as_days();
        let offset = (t - self.transit_time + 0.5 * period).rem_euclid(period) - 0.5 * period;
        offset.abs() < 0.5 * self.duration.as_days()
    }
}

/// Build signals from parallel arrays.
///
/// Errors
/// ------
/// - `SignalLengthMismatch` when the three slices differ in length.
/// - Any [`TransitSignal::new`] error for an individual entry.
pub fn transit_signals(
    periods: &[f64], durations: &[f64], transit_times: &[f64],
) -> TransformResult<Vec<TransitSignal>> {
    if periods.len() != durations.len() || periods.len() != transit_times.len() {
        return Err(TransformError::SignalLengthMismatch {
            periods: periods.len(),
            durations: durations.len(),
            transit_times: transit_times.len(),
        });
    }
    periods
        .iter()
        .zip(durations)
        .zip(transit_times)
        .map(|((&p, &d), &t0)| TransitSignal::new(p, d, t0))
        .collect()
}

impl LightCurve {
    /// `true` for every sample inside a transit of any of `signals`.
    ///
    /// Errors
    /// ------
    /// - Validation errors for hand-built signals with invalid fields.
    pub fn create_transit_mask(&self, signals: &[TransitSignal]) -> TransformResult<Array1<bool>> {
        for signal in signals {
            signal.validate()?;
        }
        Ok(self.time_values().mapv(|t| signals.iter().any(|s| s.contains(t))))
    }
}
