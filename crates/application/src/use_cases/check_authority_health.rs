//! Authority health probe, for status reporting only.

use crate::ports::AuthorityClient;

/// Output of a health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckAuthorityHealthOutput {
    /// Whether the authority is reachable and reports itself ready.
    pub available: bool,
    /// Human-readable summary for operators.
    pub message: String,
}

/// Probes the authority's health endpoint.
///
/// Strictly read-only: a failed probe changes nothing, not even the
/// clock's availability flag. Availability bookkeeping belongs to
/// [`SyncWithAuthority`](crate::use_cases::SyncWithAuthority).
pub struct CheckAuthorityHealth<A: AuthorityClient> {
    authority: A,
}

impl<A: AuthorityClient> CheckAuthorityHealth<A> {
    /// Creates a new `CheckAuthorityHealth` use case.
    pub const fn new(authority: A) -> Self {
        Self { authority }
    }

    /// Executes the probe. Infallible by design: a failure is reported as
    /// `available: false` with the error in the message.
    pub async fn execute(&self) -> CheckAuthorityHealthOutput {
        match self.authority.check_health().await {
            Ok(health) => CheckAuthorityHealthOutput {
                available: health.ready,
                message: match (health.ready, health.is_paused) {
                    (true, true) => String::from("authority ready, clock paused"),
                    (true, false) => String::from("authority ready, clock running"),
                    (false, _) => String::from("authority reachable but not ready"),
                },
            },
            Err(err) => {
                tracing::warn!(error = %err, "authority health probe failed");
                CheckAuthorityHealthOutput {
                    available: false,
                    message: format!("authority unavailable: {err}"),
                }
            }
        }
    }
}
