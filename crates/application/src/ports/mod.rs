//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait that can be implemented by adapters in
//! the infrastructure layer.

mod authority;
mod wall_clock;

pub use authority::{
    AuthorityClient, AuthorityError, AuthorityHealth, AuthoritySnapshot, AuthorityStatusInfo,
};
pub use wall_clock::WallClock;
