//! Port adapters.

mod http_authority;
mod local_authority;
mod system_clock;

pub use http_authority::HttpAuthorityClient;
pub use local_authority::LocalAuthorityClient;
pub use system_clock::SystemClock;
