//! IxTime Domain - Core clock types and time math
//!
//! This crate defines the domain model for the IxTime world clock: the
//! epoch/rate schedule, the piecewise-linear conversion between real time
//! and world time, the mutable override state, and calendar helpers.
//! All types here are pure Rust with no I/O dependencies.

pub mod calendar;
pub mod config;
pub mod convert;
pub mod error;
pub mod state;

pub use calendar::{
    DAYS_PER_YEAR, add_months, add_years, current_world_year, format_world_time, years_elapsed,
};
pub use config::ClockConfig;
pub use convert::{to_real_time, to_world_time, to_world_time_with_rate, world_time_from_ms};
pub use error::{ClockConfigError, DomainResult, OverrideError};
pub use state::ClockState;
