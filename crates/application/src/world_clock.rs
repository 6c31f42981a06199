//! World clock service
//!
//! [`WorldClock`] is the single logical owner of the mutable clock state.
//! It combines the validated schedule, an injected wall clock, and the
//! override interpreter to answer "what is world time right now" without
//! I/O, and exposes the operator surface for pinning, pausing and rate
//! overrides. All state lives behind one lock so the pin pair is always
//! read and written together; no lock is held across I/O.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use ixtime_domain::{ClockConfig, ClockConfigError, ClockState, OverrideError, calendar, convert};

use crate::ports::{AuthoritySnapshot, WallClock};

/// Operator-facing snapshot of the clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockStatus {
    /// Current world time.
    pub world_time: DateTime<Utc>,
    /// Human-readable rendering of the current world time.
    pub world_time_formatted: String,
    /// The multiplier in force.
    pub multiplier: f64,
    /// Whether the clock is paused.
    pub is_paused: bool,
    /// Whether an operator time pin is installed.
    pub has_time_override: bool,
    /// Whether an explicit multiplier override is installed.
    pub has_multiplier_override: bool,
    /// Whether the authority responded to the most recent attempt.
    pub authority_available: bool,
    /// Real instant of the last successful synchronization.
    pub authority_last_sync_real: Option<DateTime<Utc>>,
    /// World time last reported by the authority.
    pub authority_last_known_world_time: Option<DateTime<Utc>>,
}

/// The world clock: validated schedule plus mutable override state.
///
/// `now()` is side-effect-free, never blocks on I/O, and is safe to call
/// from any thread at arbitrarily high frequency.
pub struct WorldClock<C: WallClock> {
    config: ClockConfig,
    wall: C,
    state: RwLock<ClockState>,
}

impl<C: WallClock> WorldClock<C> {
    /// Creates a world clock over a validated schedule.
    ///
    /// # Errors
    /// Returns the schedule's [`ClockConfigError`] if validation fails;
    /// a misconfigured schedule must never serve time.
    pub fn new(config: ClockConfig, wall: C) -> Result<Self, ClockConfigError> {
        config.validate()?;
        Ok(Self { config, wall, state: RwLock::new(ClockState::new()) })
    }

    /// The schedule this clock runs on.
    pub const fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Current world time.
    ///
    /// With a time pin installed, the clock advances from the pin at the
    /// effective rate (or stays frozen at it when paused). Otherwise the
    /// pivot-anchored conversion applies; an explicit multiplier override
    /// replaces only the slope, never the anchoring.
    pub fn now(&self) -> DateTime<Utc> {
        let state = self.state.read().clone();
        self.resolve(&state, self.wall.now())
    }

    /// Pins the clock to an absolute world-time value. The clock keeps
    /// moving forward from the pin unless it is also paused.
    pub fn set_time_override(&self, value: DateTime<Utc>) {
        let now_real = self.wall.now();
        self.state.write().set_time_override(value, now_real);
    }

    /// Pins the clock to a world time given in milliseconds since the
    /// Unix epoch, as received from operators or the wire.
    ///
    /// # Errors
    /// Rejects non-finite input and values outside the representable
    /// timestamp range; the state is unchanged.
    pub fn set_time_override_ms(&self, world_time_ms: f64) -> Result<(), OverrideError> {
        self.set_time_override(convert::world_time_from_ms(world_time_ms)?);
        Ok(())
    }

    /// Removes the time pin. The clock snaps to wherever the unmodified
    /// schedule currently places it, rather than continuing from the
    /// pinned value.
    pub fn clear_time_override(&self) {
        self.state.write().clear_time_override();
    }

    /// Installs an explicit rate override; `0.0` pauses the clock.
    ///
    /// # Errors
    /// Rejects non-finite and negative rates; the state is unchanged.
    pub fn set_multiplier_override(&self, rate: f64) -> Result<(), OverrideError> {
        self.state.write().set_multiplier_override(rate)
    }

    /// Removes the rate override; the schedule's natural rate applies.
    pub fn clear_multiplier_override(&self) {
        self.state.write().clear_multiplier_override();
    }

    /// Sets the multiplier, clearing the override when `rate` matches the
    /// schedule's natural rate for the current real instant so future era
    /// transitions are honored automatically. Returns whether the clock
    /// is now tracking the schedule.
    ///
    /// # Errors
    /// Rejects non-finite and negative rates; the state is unchanged.
    pub fn set_natural_multiplier(&self, rate: f64) -> Result<bool, OverrideError> {
        let natural = self.config.natural_multiplier_at(self.wall.now());
        self.state.write().set_natural_multiplier(rate, natural)
    }

    /// Whether reads currently track the natural schedule.
    pub fn is_multiplier_natural(&self) -> bool {
        self.state.read().is_multiplier_natural()
    }

    /// The rate currently in force (override or natural).
    pub fn effective_multiplier(&self) -> f64 {
        let natural = self.config.natural_multiplier_at(self.wall.now());
        self.state.read().effective_multiplier(natural)
    }

    /// Whether the effective multiplier is exactly zero.
    pub fn is_paused(&self) -> bool {
        let natural = self.config.natural_multiplier_at(self.wall.now());
        self.state.read().is_paused(natural)
    }

    /// Freezes the clock in place: pins the current world time and
    /// installs a zero multiplier, under one lock.
    pub fn pause(&self) {
        let now_real = self.wall.now();
        let mut state = self.state.write();
        let frozen = self.resolve(&state, now_real);
        state.set_time_override(frozen, now_real);
        state.pause();
    }

    /// Resumes a paused clock from its frozen value. The pin pair is
    /// re-anchored at the current real instant so the paused span does
    /// not count toward elapsed time.
    pub fn resume(&self) {
        let now_real = self.wall.now();
        let mut state = self.state.write();
        let value = self.resolve(&state, now_real);
        state.clear_multiplier_override();
        if state.time_override.is_some() {
            state.set_time_override(value, now_real);
        }
    }

    /// Operator-facing snapshot of the clock and its synchronization
    /// bookkeeping.
    pub fn status(&self) -> ClockStatus {
        let now_real = self.wall.now();
        let state = self.state.read().clone();
        let natural = self.config.natural_multiplier_at(now_real);
        let world_time = self.resolve(&state, now_real);
        ClockStatus {
            world_time,
            world_time_formatted: calendar::format_world_time(world_time, true),
            multiplier: state.effective_multiplier(natural),
            is_paused: state.is_paused(natural),
            has_time_override: state.time_override.is_some(),
            has_multiplier_override: state.multiplier_override.is_some(),
            authority_available: state.authority_available,
            authority_last_sync_real: state.authority_last_sync_real,
            authority_last_known_world_time: state.authority_last_known_world_time,
        }
    }

    /// Adopts a successful authority snapshot: the authority's state
    /// supersedes local overrides, so both are cleared and the
    /// bookkeeping pair is refreshed.
    pub fn apply_authority_snapshot(&self, snapshot: &AuthoritySnapshot) {
        let now_real = self.wall.now();
        self.state.write().record_sync_success(snapshot.world_time, now_real);
    }

    /// Records a failed authority interaction. Only the availability flag
    /// changes; overrides and bookkeeping are retained.
    pub fn mark_authority_unavailable(&self) {
        self.state.write().record_sync_failure();
    }

    /// Resolves world time for a given state copy and real instant.
    fn resolve(&self, state: &ClockState, now_real: DateTime<Utc>) -> DateTime<Utc> {
        let natural = self.config.natural_multiplier_at(now_real);
        if let (Some(pin), Some(set_at)) = (state.time_override, state.override_set_at_real) {
            if state.is_paused(natural) {
                return pin;
            }
            let elapsed_ms = (now_real - set_at).num_milliseconds();
            let rate = state.effective_multiplier(natural);
            #[allow(clippy::cast_possible_truncation)]
            let world_offset_ms = (elapsed_ms as f64 * rate).round() as i64;
            return pin + Duration::milliseconds(world_offset_ms);
        }
        match state.multiplier_override {
            Some(rate) => convert::to_world_time_with_rate(&self.config, now_real, rate),
            None => convert::to_world_time(&self.config, now_real),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    /// Wall clock advanced by hand from tests.
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn at(start: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(start) }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock() += by;
        }
    }

    impl WallClock for &ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }

    fn post_pivot_start() -> DateTime<Utc> {
        ClockConfig::standard().pivot_real + Duration::days(100)
    }

    fn clock(wall: &ManualClock) -> WorldClock<&ManualClock> {
        WorldClock::new(ClockConfig::standard(), wall).unwrap()
    }

    #[test]
    fn test_construction_rejects_invalid_schedule() {
        let wall = ManualClock::at(post_pivot_start());
        let mut cfg = ClockConfig::standard();
        cfg.base_multiplier = -4.0;
        assert!(WorldClock::new(cfg, &wall).is_err());
    }

    #[test]
    fn test_now_tracks_schedule_without_overrides() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        let expected = convert::to_world_time(clock.config(), post_pivot_start());
        assert_eq!(clock.now(), expected);

        // One real hour at 2x is two world hours.
        wall.advance(Duration::hours(1));
        assert_eq!(clock.now(), expected + Duration::hours(2));
    }

    #[test]
    fn test_pin_advances_at_effective_rate() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);
        let pin = Utc.with_ymd_and_hms(2045, 6, 1, 0, 0, 0).unwrap();

        clock.set_time_override(pin);
        assert_eq!(clock.now(), pin);

        wall.advance(Duration::minutes(30));
        assert_eq!(clock.now(), pin + Duration::hours(1));
    }

    #[test]
    fn test_pause_freeze_property() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        clock.set_multiplier_override(0.0).unwrap();
        assert!(clock.is_paused());

        let first = clock.now();
        wall.advance(Duration::hours(5));
        assert_eq!(clock.now(), first);
        wall.advance(Duration::days(3));
        assert_eq!(clock.now(), first);
    }

    #[test]
    fn test_pause_and_resume_in_place() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        let before = clock.now();
        clock.pause();
        wall.advance(Duration::hours(4));
        assert_eq!(clock.now(), before);

        // Resuming restarts motion from the frozen value; the paused span
        // contributes nothing.
        clock.resume();
        assert!(!clock.is_paused());
        wall.advance(Duration::hours(1));
        assert_eq!(clock.now(), before + Duration::hours(2));
    }

    #[test]
    fn test_clear_pin_snaps_to_schedule() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);
        let pin = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

        clock.set_time_override(pin);
        wall.advance(Duration::hours(1));
        assert_ne!(clock.now(), convert::to_world_time(clock.config(), *wall.now.lock()));

        clock.clear_time_override();
        let natural = convert::to_world_time(clock.config(), *wall.now.lock());
        assert_eq!(clock.now(), natural);
    }

    #[test]
    fn test_multiplier_override_changes_slope_not_anchor() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        clock.set_multiplier_override(6.0).unwrap();
        let expected = convert::to_world_time_with_rate(clock.config(), *wall.now.lock(), 6.0);
        assert_eq!(clock.now(), expected);
    }

    #[test]
    fn test_natural_toggle_through_service() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        // Post-pivot natural rate is 2x: matching it keeps the schedule.
        assert!(clock.set_natural_multiplier(2.0).unwrap());
        assert!(clock.is_multiplier_natural());

        assert!(!clock.set_natural_multiplier(3.5).unwrap());
        assert!(!clock.is_multiplier_natural());
        assert_eq!(clock.effective_multiplier(), 3.5);

        let anchor = clock.now();
        wall.advance(Duration::hours(2));
        assert_eq!(clock.now(), anchor + Duration::hours(7));
    }

    #[test]
    fn test_set_time_override_ms_validation() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        assert!(matches!(
            clock.set_time_override_ms(f64::INFINITY),
            Err(OverrideError::NonFinite(_))
        ));
        assert!(matches!(clock.set_time_override_ms(1e300), Err(OverrideError::OutOfRange(_))));
        assert!(!clock.status().has_time_override);

        let pin = Utc.with_ymd_and_hms(2044, 2, 2, 12, 0, 0).unwrap();
        #[allow(clippy::cast_precision_loss)]
        clock.set_time_override_ms(pin.timestamp_millis() as f64).unwrap();
        assert_eq!(clock.now(), pin);
    }

    #[test]
    fn test_status_snapshot() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);

        let status = clock.status();
        assert!(status.authority_available);
        assert!(!status.has_time_override);
        assert!(!status.has_multiplier_override);
        assert!(!status.is_paused);
        assert_eq!(status.multiplier, 2.0);
        assert!(status.world_time_formatted.ends_with("(ILT)"));

        clock.pause();
        let status = clock.status();
        assert!(status.is_paused);
        assert!(status.has_time_override);
        assert!(status.has_multiplier_override);
        assert_eq!(status.multiplier, 0.0);
    }

    #[test]
    fn test_authority_bookkeeping() {
        let wall = ManualClock::at(post_pivot_start());
        let clock = clock(&wall);
        let pin = Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap();
        clock.set_time_override(pin);

        clock.mark_authority_unavailable();
        let status = clock.status();
        assert!(!status.authority_available);
        // Failure leaves overrides untouched.
        assert!(status.has_time_override);

        let snapshot = AuthoritySnapshot {
            world_time: pin + Duration::days(1),
            world_time_formatted: String::from("Friday, January 2, 2050 00:00:00 (ILT)"),
            multiplier: 2.0,
            is_paused: false,
            has_time_override: false,
            has_multiplier_override: false,
            paused_at: None,
            status: crate::ports::AuthorityStatusInfo {
                ready: true,
                identity: String::from("authority#1"),
                peer_count: 3,
                uptime_sec: 900,
            },
        };
        clock.apply_authority_snapshot(&snapshot);

        let status = clock.status();
        assert!(status.authority_available);
        assert!(!status.has_time_override);
        assert_eq!(status.authority_last_known_world_time, Some(snapshot.world_time));
        assert_eq!(status.authority_last_sync_real, Some(*wall.now.lock()));
    }
}
