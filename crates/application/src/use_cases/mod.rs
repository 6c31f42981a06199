//! Application use cases (authority orchestration).

mod administer_authority;
mod check_authority_health;
mod sync_with_authority;

pub use administer_authority::{AdministerAuthority, AdministerAuthorityError};
pub use check_authority_health::{CheckAuthorityHealth, CheckAuthorityHealthOutput};
pub use sync_with_authority::SyncWithAuthority;
