//! Domain error types

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Fatal configuration errors detected when a clock schedule is validated.
///
/// A schedule that fails validation must never be used to serve time: a
/// bad rate or a misordered epoch would leak into every downstream
/// computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockConfigError {
    /// A rate multiplier is not a finite positive number.
    #[error("multiplier {name} must be finite and positive, got {value}")]
    InvalidMultiplier {
        /// Which multiplier field is invalid.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The real epoch does not precede the pivot.
    #[error("real epoch {real_epoch} must precede the pivot {pivot_real}")]
    EpochAfterPivot {
        /// Configured start of world-time tracking.
        real_epoch: DateTime<Utc>,
        /// Configured rate-change instant.
        pivot_real: DateTime<Utc>,
    },

    /// The world epoch does not precede the world time at the pivot.
    #[error("world epoch {world_epoch} must precede the pivot world time {pivot_world}")]
    WorldEpochAfterPivot {
        /// Configured in-world calendar baseline.
        world_epoch: DateTime<Utc>,
        /// Configured world-time value at the pivot.
        pivot_world: DateTime<Utc>,
    },
}

/// Validation errors for operator-supplied override input.
///
/// Raised synchronously at the call site; the clock state is left
/// unchanged when one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum OverrideError {
    /// The supplied number is NaN or infinite.
    #[error("override value must be finite, got {0}")]
    NonFinite(f64),

    /// A multiplier override below zero was supplied.
    #[error("multiplier override must not be negative, got {0}")]
    NegativeMultiplier(f64),

    /// A world-time value outside the representable timestamp range.
    #[error("world time out of representable range: {0} ms")]
    OutOfRange(f64),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, ClockConfigError>;
