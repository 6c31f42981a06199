//! Wall clock port for real-time readings

use chrono::{DateTime, Utc};

/// Port for reading the current real (wall-clock) time.
///
/// This abstraction keeps the world clock and its override bookkeeping
/// testable: tests provide a manually advanced implementation instead of
/// the system clock.
pub trait WallClock: Send + Sync {
    /// Returns the current real UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
