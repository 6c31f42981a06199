//! Synchronize the local clock with the external authority.

use std::sync::Arc;

use crate::ports::{AuthorityClient, AuthorityError, AuthoritySnapshot, WallClock};
use crate::world_clock::WorldClock;

/// Reconciles the local clock against the external time authority.
///
/// Best-effort and idempotent: a success adopts the authority's snapshot
/// (local overrides are superseded), a failure flips availability and
/// leaves everything else untouched. Safe to run concurrently with other
/// sync attempts; no retries beyond the per-call timeout.
pub struct SyncWithAuthority<C: WallClock, A: AuthorityClient> {
    clock: Arc<WorldClock<C>>,
    authority: A,
}

impl<C: WallClock, A: AuthorityClient> SyncWithAuthority<C, A> {
    /// Creates a new `SyncWithAuthority` use case.
    pub const fn new(clock: Arc<WorldClock<C>>, authority: A) -> Self {
        Self { clock, authority }
    }

    /// Executes one synchronization attempt.
    ///
    /// # Errors
    /// Returns the [`AuthorityError`] on failure. The local clock keeps
    /// serving computed time regardless; callers must treat the error as
    /// a status signal, never a crash.
    pub async fn execute(&self) -> Result<AuthoritySnapshot, AuthorityError> {
        match self.authority.fetch_status().await {
            Ok(snapshot) => {
                self.clock.apply_authority_snapshot(&snapshot);
                tracing::info!(
                    world_time = %snapshot.world_time,
                    multiplier = snapshot.multiplier,
                    is_paused = snapshot.is_paused,
                    "synchronized with time authority"
                );
                Ok(snapshot)
            }
            Err(err) => {
                self.clock.mark_authority_unavailable();
                tracing::warn!(error = %err, "time authority sync failed, serving local clock");
                Err(err)
            }
        }
    }
}
