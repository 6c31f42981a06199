//! Mutable clock state and override transitions
//!
//! `ClockState` is the single mutable record behind the world clock:
//! an optional operator pin, an optional explicit multiplier, and the
//! synchronization bookkeeping. The state never reads the wall clock
//! itself; transitions that need the current real instant take it as an
//! argument, which keeps every transition deterministic and testable.

use chrono::{DateTime, Utc};

use crate::error::OverrideError;

/// Rates within this distance are treated as equal when deciding whether
/// an operator-supplied multiplier matches the natural schedule.
const RATE_EPSILON: f64 = 1e-9;

/// Mutable, process-wide clock state.
///
/// Owned by exactly one component; the pin pair (`time_override`,
/// `override_set_at_real`) must always be read and written together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClockState {
    /// Operator-pinned world-time value, if any.
    pub time_override: Option<DateTime<Utc>>,
    /// Real instant the pin was installed. Paired with `time_override` so
    /// the clock keeps moving forward from the pin unless paused.
    pub override_set_at_real: Option<DateTime<Utc>>,
    /// Explicit rate override; `0.0` means paused.
    pub multiplier_override: Option<f64>,
    /// World time last reported by the external authority.
    pub authority_last_known_world_time: Option<DateTime<Utc>>,
    /// Real instant of the last successful synchronization.
    pub authority_last_sync_real: Option<DateTime<Utc>>,
    /// Whether the authority responded to the most recent attempt.
    pub authority_available: bool,
}

impl ClockState {
    /// Creates an empty state: no overrides, authority assumed available.
    #[must_use]
    pub fn new() -> Self {
        Self { authority_available: true, ..Self::default() }
    }

    /// Pins the clock to `value`, recording `now_real` as the installation
    /// instant so subsequent reads advance from the pin.
    pub fn set_time_override(&mut self, value: DateTime<Utc>, now_real: DateTime<Utc>) {
        self.time_override = Some(value);
        self.override_set_at_real = Some(now_real);
    }

    /// Removes the pin pair. Subsequent reads fall back to the natural
    /// conversion anchored at the current real instant.
    pub fn clear_time_override(&mut self) {
        self.time_override = None;
        self.override_set_at_real = None;
    }

    /// Installs an explicit rate override. `0.0` pauses the clock.
    ///
    /// # Errors
    /// Rejects non-finite and negative rates; the state is unchanged.
    pub fn set_multiplier_override(&mut self, rate: f64) -> Result<(), OverrideError> {
        validate_rate(rate)?;
        self.multiplier_override = Some(rate);
        Ok(())
    }

    /// Removes the rate override; reads use the schedule's natural rate.
    pub fn clear_multiplier_override(&mut self) {
        self.multiplier_override = None;
    }

    /// Pauses the clock (an explicit rate override of `0.0`).
    pub fn pause(&mut self) {
        self.multiplier_override = Some(0.0);
    }

    /// Installs `rate` as the multiplier, distinguishing "tracking the
    /// schedule" from "pinned to an explicit number".
    ///
    /// If `rate` equals `natural_now` (the schedule's rate for the current
    /// real instant), the override is cleared so future era transitions
    /// are honored automatically, and `true` is returned. Otherwise `rate`
    /// becomes an explicit override and `false` is returned.
    ///
    /// # Errors
    /// Rejects non-finite and negative rates; the state is unchanged.
    pub fn set_natural_multiplier(
        &mut self,
        rate: f64,
        natural_now: f64,
    ) -> Result<bool, OverrideError> {
        validate_rate(rate)?;
        if (rate - natural_now).abs() < RATE_EPSILON {
            self.multiplier_override = None;
            Ok(true)
        } else {
            self.multiplier_override = Some(rate);
            Ok(false)
        }
    }

    /// Whether reads currently track the natural schedule (no explicit
    /// multiplier override installed).
    #[must_use]
    pub fn is_multiplier_natural(&self) -> bool {
        self.multiplier_override.is_none()
    }

    /// The rate in force: the override if one is installed, else the given
    /// natural rate.
    #[must_use]
    pub fn effective_multiplier(&self, natural: f64) -> f64 {
        self.multiplier_override.unwrap_or(natural)
    }

    /// Whether the effective multiplier is exactly zero.
    ///
    /// Pause is the literal rate `0.0`; a tiny positive override keeps the
    /// clock creeping forward rather than freezing it.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_paused(&self, natural: f64) -> bool {
        self.effective_multiplier(natural) == 0.0
    }

    /// Records a successful authority synchronization: the authority's
    /// state supersedes local overrides, so both are cleared and the
    /// bookkeeping pair is refreshed.
    pub fn record_sync_success(&mut self, world: DateTime<Utc>, now_real: DateTime<Utc>) {
        self.clear_time_override();
        self.clear_multiplier_override();
        self.authority_last_known_world_time = Some(world);
        self.authority_last_sync_real = Some(now_real);
        self.authority_available = true;
    }

    /// Records a failed authority synchronization. Only the availability
    /// flag changes; every override and bookkeeping field is retained.
    pub fn record_sync_failure(&mut self) {
        self.authority_available = false;
    }
}

fn validate_rate(rate: f64) -> Result<(), OverrideError> {
    if !rate.is_finite() {
        return Err(OverrideError::NonFinite(rate));
    }
    if rate < 0.0 {
        return Err(OverrideError::NegativeMultiplier(rate));
    }
    Ok(())
}
