//! IxTime Infrastructure - adapters for the application ports
//!
//! Implementations of the [`WallClock`](ixtime_application::WallClock) and
//! [`AuthorityClient`](ixtime_application::AuthorityClient) ports: the
//! system clock, the reqwest-backed HTTP authority client, and the
//! always-local stub used when no authority is configured.

pub mod adapters;

pub use adapters::{HttpAuthorityClient, LocalAuthorityClient, SystemClock};
