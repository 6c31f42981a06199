//! Administrative passthroughs to the time authority.
//!
//! These forward operator intent to the authority service itself and
//! report its reply. They never touch local clock state: a subsequent
//! synchronization pulls the new authoritative state.

use thiserror::Error;

use ixtime_domain::{OverrideError, convert};

use crate::ports::{AuthorityClient, AuthorityError};

/// Errors from administrative passthroughs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdministerAuthorityError {
    /// The operator input failed validation before anything was sent.
    #[error(transparent)]
    Invalid(#[from] OverrideError),

    /// The authority interaction failed.
    #[error(transparent)]
    Authority(#[from] AuthorityError),
}

/// Forwards override, pause and resume commands to the authority.
pub struct AdministerAuthority<A: AuthorityClient> {
    authority: A,
}

impl<A: AuthorityClient> AdministerAuthority<A> {
    /// Creates a new `AdministerAuthority` use case.
    pub const fn new(authority: A) -> Self {
        Self { authority }
    }

    /// Asks the authority to install a time override, optionally with a
    /// multiplier. Input is validated before the request goes out.
    ///
    /// # Errors
    /// [`AdministerAuthorityError::Invalid`] for non-finite or
    /// out-of-range input (nothing is sent), or
    /// [`AdministerAuthorityError::Authority`] if the request fails.
    pub async fn install_override(
        &self,
        world_time_ms: f64,
        multiplier: Option<f64>,
    ) -> Result<String, AdministerAuthorityError> {
        let world_time = convert::world_time_from_ms(world_time_ms)?;
        if let Some(rate) = multiplier {
            if !rate.is_finite() {
                return Err(OverrideError::NonFinite(rate).into());
            }
            if rate < 0.0 {
                return Err(OverrideError::NegativeMultiplier(rate).into());
            }
        }
        let message = self.authority.install_override(world_time, multiplier).await?;
        tracing::debug!(%world_time, ?multiplier, "authority override installed");
        Ok(message)
    }

    /// Asks the authority to clear its overrides.
    ///
    /// # Errors
    /// [`AdministerAuthorityError::Authority`] if the request fails.
    pub async fn clear_overrides(&self) -> Result<String, AdministerAuthorityError> {
        let message = self.authority.clear_overrides().await?;
        tracing::debug!("authority overrides cleared");
        Ok(message)
    }

    /// Asks the authority to pause its clock.
    ///
    /// # Errors
    /// [`AdministerAuthorityError::Authority`] if the request fails.
    pub async fn pause(&self) -> Result<String, AdministerAuthorityError> {
        let message = self.authority.pause().await?;
        tracing::debug!("authority clock paused");
        Ok(message)
    }

    /// Asks the authority to resume its clock.
    ///
    /// # Errors
    /// [`AdministerAuthorityError::Authority`] if the request fails.
    pub async fn resume(&self) -> Result<String, AdministerAuthorityError> {
        let message = self.authority.resume().await?;
        tracing::debug!("authority clock resumed");
        Ok(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use crate::ports::{AuthorityHealth, AuthoritySnapshot};

    #[derive(Default)]
    struct RecordingAuthority {
        overrides: Mutex<Vec<(DateTime<Utc>, Option<f64>)>>,
        commands: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl AuthorityClient for RecordingAuthority {
        async fn fetch_time(&self) -> Result<DateTime<Utc>, AuthorityError> {
            Err(AuthorityError::Unreachable(String::from("not under test")))
        }

        async fn fetch_status(&self) -> Result<AuthoritySnapshot, AuthorityError> {
            Err(AuthorityError::Unreachable(String::from("not under test")))
        }

        async fn check_health(&self) -> Result<AuthorityHealth, AuthorityError> {
            Err(AuthorityError::Unreachable(String::from("not under test")))
        }

        async fn install_override(
            &self,
            world_time: DateTime<Utc>,
            multiplier: Option<f64>,
        ) -> Result<String, AuthorityError> {
            self.overrides.lock().push((world_time, multiplier));
            Ok(String::from("override installed"))
        }

        async fn clear_overrides(&self) -> Result<String, AuthorityError> {
            self.commands.lock().push("clear");
            Ok(String::from("overrides cleared"))
        }

        async fn pause(&self) -> Result<String, AuthorityError> {
            self.commands.lock().push("pause");
            Ok(String::from("paused"))
        }

        async fn resume(&self) -> Result<String, AuthorityError> {
            self.commands.lock().push("resume");
            Ok(String::from("resumed"))
        }
    }

    #[tokio::test]
    async fn test_install_override_forwards_validated_input() {
        let admin = AdministerAuthority::new(RecordingAuthority::default());
        let target = Utc.with_ymd_and_hms(2045, 3, 1, 0, 0, 0).unwrap();

        #[allow(clippy::cast_precision_loss)]
        let message = admin
            .install_override(target.timestamp_millis() as f64, Some(2.0))
            .await
            .unwrap();
        assert_eq!(message, "override installed");
        assert_eq!(*admin.authority.overrides.lock(), vec![(target, Some(2.0))]);
    }

    #[tokio::test]
    async fn test_install_override_rejects_bad_input_before_sending() {
        let admin = AdministerAuthority::new(RecordingAuthority::default());

        assert!(matches!(
            admin.install_override(f64::NAN, None).await,
            Err(AdministerAuthorityError::Invalid(OverrideError::NonFinite(_)))
        ));
        assert!(matches!(
            admin.install_override(0.0, Some(-2.0)).await,
            Err(AdministerAuthorityError::Invalid(OverrideError::NegativeMultiplier(_)))
        ));
        assert!(admin.authority.overrides.lock().is_empty());
    }

    #[tokio::test]
    async fn test_commands_forwarded() {
        let admin = AdministerAuthority::new(RecordingAuthority::default());

        assert_eq!(admin.pause().await.unwrap(), "paused");
        assert_eq!(admin.resume().await.unwrap(), "resumed");
        assert_eq!(admin.clear_overrides().await.unwrap(), "overrides cleared");
        assert_eq!(*admin.authority.commands.lock(), vec!["pause", "resume", "clear"]);
    }
}
