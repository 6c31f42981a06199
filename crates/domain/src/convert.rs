//! Conversion engine
//!
//! Pivot-anchored piecewise-linear conversion between real time and world
//! time. Both eras are expressed as offsets from the pivot pair
//! (`pivot_real`, `pivot_world`), so the two branches agree exactly at the
//! pivot and the mapping is continuous when the rate changes. Anchoring at
//! "now" instead would re-price history whenever the wall clock crossed
//! the pivot; that variant is a defect, not an alternative.
//!
//! All arithmetic is carried out at millisecond resolution.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::ClockConfig;
use crate::error::OverrideError;

/// Converts a real instant to world time using the schedule's natural
/// rate for that instant.
///
/// For `real >= pivot_real` this is
/// `pivot_world + (real - pivot_real) * post_pivot_multiplier`; before the
/// pivot it is `pivot_world - (pivot_real - real) * base_multiplier`.
/// Strictly increasing for positive multipliers.
#[must_use]
pub fn to_world_time(cfg: &ClockConfig, real: DateTime<Utc>) -> DateTime<Utc> {
    to_world_time_with_rate(cfg, real, cfg.natural_multiplier_at(real))
}

/// Converts a real instant to world time with an explicit rate replacing
/// the era's natural multiplier.
///
/// The pivot anchoring is preserved: only the slope changes. This is the
/// primitive behind explicit multiplier overrides.
#[must_use]
pub fn to_world_time_with_rate(cfg: &ClockConfig, real: DateTime<Utc>, rate: f64) -> DateTime<Utc> {
    let real_offset_ms = (real - cfg.pivot_real).num_milliseconds();
    #[allow(clippy::cast_possible_truncation)]
    let world_offset_ms = (real_offset_ms as f64 * rate).round() as i64;
    cfg.pivot_world + Duration::milliseconds(world_offset_ms)
}

/// Converts a world-time instant back to real time; the algebraic inverse
/// of [`to_world_time`], branching on which side of `pivot_world` the
/// value falls.
#[must_use]
pub fn to_real_time(cfg: &ClockConfig, world: DateTime<Utc>) -> DateTime<Utc> {
    let rate = if world >= cfg.pivot_world {
        cfg.post_pivot_multiplier
    } else {
        cfg.base_multiplier
    };
    let world_offset_ms = (world - cfg.pivot_world).num_milliseconds();
    #[allow(clippy::cast_possible_truncation)]
    let real_offset_ms = (world_offset_ms as f64 / rate).round() as i64;
    cfg.pivot_real + Duration::milliseconds(real_offset_ms)
}

/// Converts a raw millisecond timestamp, as received from operators or
/// the wire, into an instant.
///
/// # Errors
/// Rejects non-finite input and values outside the representable
/// timestamp range.
pub fn world_time_from_ms(ms: f64) -> Result<DateTime<Utc>, OverrideError> {
    if !ms.is_finite() {
        return Err(OverrideError::NonFinite(ms));
    }
    #[allow(clippy::cast_precision_loss)]
    if ms.abs() >= i64::MAX as f64 {
        return Err(OverrideError::OutOfRange(ms));
    }
    #[allow(clippy::cast_possible_truncation)]
    Utc.timestamp_millis_opt(ms.round() as i64)
        .single()
        .ok_or(OverrideError::OutOfRange(ms))
}
