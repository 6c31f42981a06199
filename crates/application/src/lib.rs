//! IxTime Application - ports and use cases
//!
//! This crate wires the pure domain math to the outside world: the
//! [`WorldClock`] service owns the mutable clock state and answers "what
//! is world time right now", the ports declare the seams (wall clock,
//! external time authority), and the use cases carry out synchronization
//! and administrative operations against the authority.

pub mod ports;
pub mod use_cases;
pub mod world_clock;

pub use ports::{
    AuthorityClient, AuthorityError, AuthorityHealth, AuthoritySnapshot, AuthorityStatusInfo,
    WallClock,
};
pub use use_cases::{
    AdministerAuthority, AdministerAuthorityError, CheckAuthorityHealth,
    CheckAuthorityHealthOutput, SyncWithAuthority,
};
pub use world_clock::{ClockStatus, WorldClock};
