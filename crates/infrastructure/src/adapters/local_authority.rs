//! Always-local authority stub.
//!
//! Answers every authority call from a shared [`WorldClock`] instead of
//! the network. Used when no external authority is configured, and in
//! tests that exercise synchronization without network access. All
//! operations are infallible and instantaneous.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ixtime_application::ports::{
    AuthorityClient, AuthorityError, AuthorityHealth, AuthoritySnapshot, AuthorityStatusInfo,
    WallClock,
};
use ixtime_application::world_clock::WorldClock;

/// Identity string the stub reports in status blocks.
const LOCAL_IDENTITY: &str = "local";

/// Authority client backed by a local [`WorldClock`].
pub struct LocalAuthorityClient<C: WallClock> {
    clock: Arc<WorldClock<C>>,
}

impl<C: WallClock> LocalAuthorityClient<C> {
    /// Creates a stub answering from the given clock.
    #[must_use]
    pub const fn new(clock: Arc<WorldClock<C>>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl<C: WallClock> AuthorityClient for LocalAuthorityClient<C> {
    async fn fetch_time(&self) -> Result<DateTime<Utc>, AuthorityError> {
        Ok(self.clock.now())
    }

    async fn fetch_status(&self) -> Result<AuthoritySnapshot, AuthorityError> {
        let status = self.clock.status();
        Ok(AuthoritySnapshot {
            world_time: status.world_time,
            world_time_formatted: status.world_time_formatted,
            multiplier: status.multiplier,
            is_paused: status.is_paused,
            has_time_override: status.has_time_override,
            has_multiplier_override: status.has_multiplier_override,
            paused_at: status.is_paused.then_some(status.world_time),
            status: AuthorityStatusInfo {
                ready: true,
                identity: String::from(LOCAL_IDENTITY),
                peer_count: 0,
                uptime_sec: 0,
            },
        })
    }

    async fn check_health(&self) -> Result<AuthorityHealth, AuthorityError> {
        Ok(AuthorityHealth { ready: true, is_paused: self.clock.is_paused() })
    }

    async fn install_override(
        &self,
        world_time: DateTime<Utc>,
        multiplier: Option<f64>,
    ) -> Result<String, AuthorityError> {
        self.clock.set_time_override(world_time);
        if let Some(rate) = multiplier {
            self.clock
                .set_multiplier_override(rate)
                .map_err(|e| AuthorityError::Malformed(e.to_string()))?;
        }
        Ok(String::from("local override installed"))
    }

    async fn clear_overrides(&self) -> Result<String, AuthorityError> {
        self.clock.clear_time_override();
        self.clock.clear_multiplier_override();
        Ok(String::from("local overrides cleared"))
    }

    async fn pause(&self) -> Result<String, AuthorityError> {
        self.clock.pause();
        Ok(String::from("local clock paused"))
    }

    async fn resume(&self) -> Result<String, AuthorityError> {
        self.clock.resume();
        Ok(String::from("local clock resumed"))
    }
}
