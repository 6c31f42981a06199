//! Time authority port
//!
//! Defines the interface to the external time authority: a separate
//! process holding the canonical shared clock state, reachable over the
//! network. Every call is best-effort and bounded by a fixed timeout;
//! a failure never reaches time-reading code paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from authority interactions.
///
/// All variants are recoverable: the local clock keeps serving computed
/// time regardless, and callers receive these as values, never as panics
/// propagated into `now()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// The request did not complete within its fixed timeout.
    #[error("authority request timed out after {timeout_ms} ms")]
    Timeout {
        /// The per-call timeout that elapsed.
        timeout_ms: u64,
    },

    /// The authority could not be reached (connection refused, DNS,
    /// transport failure).
    #[error("authority unreachable: {0}")]
    Unreachable(String),

    /// The authority answered with a non-success HTTP status.
    #[error("authority returned HTTP status {code}")]
    Status {
        /// The HTTP status code received.
        code: u16,
    },

    /// The authority's response body was missing fields or carried values
    /// outside the representable range. Treated exactly like an
    /// unreachable authority: the update is rejected and prior state kept.
    #[error("authority response malformed: {0}")]
    Malformed(String),
}

/// The authority's self-reported status block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityStatusInfo {
    /// Whether the authority process reports itself ready.
    pub ready: bool,
    /// The authority's identity string.
    pub identity: String,
    /// Number of peers the authority is serving.
    pub peer_count: u32,
    /// Authority uptime in seconds.
    pub uptime_sec: u64,
}

/// A full snapshot of the authority's clock state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoritySnapshot {
    /// The authority's current world time.
    pub world_time: DateTime<Utc>,
    /// The authority's human-readable rendering of that time.
    pub world_time_formatted: String,
    /// The multiplier in force at the authority.
    pub multiplier: f64,
    /// Whether the authority's clock is paused.
    pub is_paused: bool,
    /// Whether the authority has a time override installed.
    pub has_time_override: bool,
    /// Whether the authority has a multiplier override installed.
    pub has_multiplier_override: bool,
    /// World time at which the authority was paused, if paused.
    pub paused_at: Option<DateTime<Utc>>,
    /// The authority's own status block.
    pub status: AuthorityStatusInfo,
}

/// A lightweight health reading, used for status reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityHealth {
    /// Whether the authority process reports itself ready.
    pub ready: bool,
    /// Whether the authority's clock is paused.
    pub is_paused: bool,
}

/// Client for the external time authority.
///
/// Implementations must bound every call with the documented timeout and
/// must not retry internally; periodic resync is scheduled by callers.
#[async_trait]
pub trait AuthorityClient: Send + Sync {
    /// Reads the authority's current world time (2 s timeout).
    ///
    /// # Errors
    /// Any [`AuthorityError`]; the caller's local state is unaffected.
    async fn fetch_time(&self) -> Result<DateTime<Utc>, AuthorityError>;

    /// Reads the authority's full clock status (2 s timeout).
    ///
    /// # Errors
    /// Any [`AuthorityError`]; the caller's local state is unaffected.
    async fn fetch_status(&self) -> Result<AuthoritySnapshot, AuthorityError>;

    /// Probes the authority's health endpoint (3 s timeout). Never used
    /// to mutate override state.
    ///
    /// # Errors
    /// Any [`AuthorityError`].
    async fn check_health(&self) -> Result<AuthorityHealth, AuthorityError>;

    /// Asks the authority to install a time override, optionally with a
    /// multiplier (5 s timeout). Returns the authority's message.
    ///
    /// # Errors
    /// Any [`AuthorityError`].
    async fn install_override(
        &self,
        world_time: DateTime<Utc>,
        multiplier: Option<f64>,
    ) -> Result<String, AuthorityError>;

    /// Asks the authority to clear its overrides (5 s timeout).
    ///
    /// # Errors
    /// Any [`AuthorityError`].
    async fn clear_overrides(&self) -> Result<String, AuthorityError>;

    /// Asks the authority to pause its clock (5 s timeout).
    ///
    /// # Errors
    /// Any [`AuthorityError`].
    async fn pause(&self) -> Result<String, AuthorityError>;

    /// Asks the authority to resume its clock (5 s timeout).
    ///
    /// # Errors
    /// Any [`AuthorityError`].
    async fn resume(&self) -> Result<String, AuthorityError>;
}
