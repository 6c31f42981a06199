//! Epoch & rate registry
//!
//! The clock schedule is a piecewise-linear mapping from real time to
//! world time with exactly two eras: before the pivot the clock runs at
//! the base multiplier, at and after the pivot it runs at the post-pivot
//! multiplier. The pivot pair (`pivot_real`, `pivot_world`) anchors both
//! eras so the mapping has no jump when the rate changes.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClockConfigError;

/// Immutable clock schedule: the two calendar epochs and the piecewise
/// rate configuration.
///
/// Constructed once at startup and never mutated. `validate` must pass
/// before the schedule is used to serve time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Real instant at which world-time tracking began.
    pub real_epoch: DateTime<Utc>,
    /// World-time instant that authored baseline data represents
    /// (world-time "year zero"). Used by calendar helpers, not by the
    /// conversion itself.
    pub world_epoch: DateTime<Utc>,
    /// Acceleration factor (world-seconds per real-second) before the pivot.
    pub base_multiplier: f64,
    /// Acceleration factor at and after the pivot.
    pub post_pivot_multiplier: f64,
    /// Real instant at which the rate changes.
    pub pivot_real: DateTime<Utc>,
    /// World-time value at the pivot, chosen so the schedule is continuous.
    pub pivot_world: DateTime<Utc>,
}

impl ClockConfig {
    /// The production schedule: tracking began 2020-10-04 at 4x against a
    /// 2028-01-01 world baseline, and slowed to 2x on 2025-07-27 when
    /// world time stood at 2040-01-01.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            real_epoch: Utc.with_ymd_and_hms(2020, 10, 4, 0, 0, 0).single().unwrap_or_default(),
            world_epoch: Utc.with_ymd_and_hms(2028, 1, 1, 0, 0, 0).single().unwrap_or_default(),
            base_multiplier: 4.0,
            post_pivot_multiplier: 2.0,
            pivot_real: Utc.with_ymd_and_hms(2025, 7, 27, 0, 0, 0).single().unwrap_or_default(),
            pivot_world: Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        }
    }

    /// Returns the schedule's natural multiplier for a given real instant:
    /// the base rate strictly before the pivot, the post-pivot rate at and
    /// after it.
    ///
    /// Era selection is keyed by the instant being converted, never by the
    /// wall clock at the moment of the call.
    #[must_use]
    pub fn natural_multiplier_at(&self, real: DateTime<Utc>) -> f64 {
        if real < self.pivot_real {
            self.base_multiplier
        } else {
            self.post_pivot_multiplier
        }
    }

    /// The calendar year of the world epoch (e.g. 2028).
    #[must_use]
    pub fn world_epoch_year(&self) -> i32 {
        use chrono::Datelike;
        self.world_epoch.year()
    }

    /// Validates the schedule.
    ///
    /// Checks that both multipliers are finite and positive, that the real
    /// epoch precedes the pivot, and that the world epoch precedes the
    /// pivot's world time. Continuity at the pivot needs no runtime check:
    /// both eras are expressed as offsets from the same (`pivot_real`,
    /// `pivot_world`) anchor, so the mapping is continuous there by
    /// construction.
    ///
    /// # Errors
    /// Returns a [`ClockConfigError`] describing the first violation found.
    /// A failure here is fatal: the schedule must not be used.
    pub fn validate(&self) -> Result<(), ClockConfigError> {
        for (name, value) in [
            ("base_multiplier", self.base_multiplier),
            ("post_pivot_multiplier", self.post_pivot_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ClockConfigError::InvalidMultiplier { name, value });
            }
        }

        if self.real_epoch >= self.pivot_real {
            return Err(ClockConfigError::EpochAfterPivot {
                real_epoch: self.real_epoch,
                pivot_real: self.pivot_real,
            });
        }

        if self.world_epoch >= self.pivot_world {
            return Err(ClockConfigError::WorldEpochAfterPivot {
                world_epoch: self.world_epoch,
                pivot_world: self.pivot_world,
            });
        }

        Ok(())
    }
}
