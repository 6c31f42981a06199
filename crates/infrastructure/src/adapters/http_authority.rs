//! HTTP authority client using reqwest.
//!
//! Talks JSON over HTTP to the external time authority. Every call
//! carries a fixed timeout (2 s reads, 3 s health, 5 s administrative
//! writes) and maps transport, status and decoding failures onto the
//! [`AuthorityError`] taxonomy; no call ever retries internally.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use ixtime_application::ports::{
    AuthorityClient, AuthorityError, AuthorityHealth, AuthoritySnapshot, AuthorityStatusInfo,
};
use ixtime_domain::convert;

/// Timeout for plain time/status reads.
const READ_TIMEOUT: Duration = Duration::from_secs(2);
/// Timeout for the health probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
/// Timeout for administrative writes.
const ADMIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Authority client implementation using reqwest.
///
/// Wraps a `reqwest::Client` pointed at the authority's base URL and
/// implements the `AuthorityClient` port from the application layer.
pub struct HttpAuthorityClient {
    client: Client,
    base_url: Url,
}

impl HttpAuthorityClient {
    /// Creates a client for the authority at `base_url`. The URL may carry
    /// a path prefix (e.g. `http://host/api`); endpoints are resolved
    /// underneath it.
    ///
    /// # Errors
    /// Returns `AuthorityError::Unreachable` if the URL does not parse or
    /// the underlying client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, AuthorityError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AuthorityError::Unreachable(format!("invalid authority URL: {e}")))?;
        let client = Client::builder()
            .user_agent("ixtime/0.1.0")
            .build()
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates an authority client over a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url: normalize_base(base_url) }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthorityError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthorityError::Unreachable(format!("invalid endpoint {path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, AuthorityError> {
        let request = self.client.get(self.endpoint(path)?).timeout(timeout);
        Self::dispatch(request, timeout).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&impl Serialize>,
        timeout: Duration,
    ) -> Result<T, AuthorityError> {
        let mut request = self.client.post(self.endpoint(path)?).timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::dispatch(request, timeout).await
    }

    async fn dispatch<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<T, AuthorityError> {
        let response = request.send().await.map_err(|e| map_transport_error(&e, timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Status { code: status.as_u16() });
        }
        response.json::<T>().await.map_err(|e| AuthorityError::Malformed(e.to_string()))
    }
}

/// Ensures the base URL path ends in `/` so relative endpoint paths
/// resolve underneath it instead of replacing it.
fn normalize_base(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

/// Maps reqwest transport errors to the port's error taxonomy.
fn map_transport_error(error: &reqwest::Error, timeout: Duration) -> AuthorityError {
    if error.is_timeout() {
        #[allow(clippy::cast_possible_truncation)]
        return AuthorityError::Timeout { timeout_ms: timeout.as_millis() as u64 };
    }
    if error.is_decode() {
        return AuthorityError::Malformed(error.to_string());
    }
    AuthorityError::Unreachable(error.to_string())
}

#[async_trait]
impl AuthorityClient for HttpAuthorityClient {
    async fn fetch_time(&self) -> Result<DateTime<Utc>, AuthorityError> {
        let body: TimeBody = self.get_json("ixtime", READ_TIMEOUT).await?;
        body.world_time()
    }

    async fn fetch_status(&self) -> Result<AuthoritySnapshot, AuthorityError> {
        let body: StatusBody = self.get_json("ixtime/status", READ_TIMEOUT).await?;
        body.into_snapshot()
    }

    async fn check_health(&self) -> Result<AuthorityHealth, AuthorityError> {
        let body: HealthBody = self.get_json("health", HEALTH_TIMEOUT).await?;
        Ok(AuthorityHealth { ready: body.bot.ready, is_paused: body.ixtime.is_paused })
    }

    async fn install_override(
        &self,
        world_time: DateTime<Utc>,
        multiplier: Option<f64>,
    ) -> Result<String, AuthorityError> {
        tracing::debug!(%world_time, ?multiplier, "posting override to authority");
        #[allow(clippy::cast_precision_loss)]
        let body = OverrideBody { world_time_ms: world_time.timestamp_millis() as f64, multiplier };
        let reply: MessageBody =
            self.post_json("ixtime/override", Some(&body), ADMIN_TIMEOUT).await?;
        Ok(reply.message)
    }

    async fn clear_overrides(&self) -> Result<String, AuthorityError> {
        let reply: MessageBody =
            self.post_json("ixtime/clear", None::<&()>, ADMIN_TIMEOUT).await?;
        Ok(reply.message)
    }

    async fn pause(&self) -> Result<String, AuthorityError> {
        let reply: MessageBody =
            self.post_json("ixtime/pause", None::<&()>, ADMIN_TIMEOUT).await?;
        Ok(reply.message)
    }

    async fn resume(&self) -> Result<String, AuthorityError> {
        let reply: MessageBody =
            self.post_json("ixtime/resume", None::<&()>, ADMIN_TIMEOUT).await?;
        Ok(reply.message)
    }
}

/// `GET /ixtime` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeBody {
    world_time_ms: f64,
}

impl TimeBody {
    fn world_time(&self) -> Result<DateTime<Utc>, AuthorityError> {
        parse_world_time_ms(self.world_time_ms)
    }
}

/// `GET /ixtime/status` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    world_time_ms: f64,
    world_time_formatted: String,
    multiplier: f64,
    is_paused: bool,
    has_time_override: bool,
    has_multiplier_override: bool,
    paused_at_ms: Option<f64>,
    authority_status: AuthorityStatusBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorityStatusBody {
    ready: bool,
    identity: String,
    peer_count: u32,
    uptime_sec: u64,
}

impl StatusBody {
    fn into_snapshot(self) -> Result<AuthoritySnapshot, AuthorityError> {
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(AuthorityError::Malformed(format!(
                "invalid multiplier {}",
                self.multiplier
            )));
        }
        let paused_at = self.paused_at_ms.map(parse_world_time_ms).transpose()?;
        Ok(AuthoritySnapshot {
            world_time: parse_world_time_ms(self.world_time_ms)?,
            world_time_formatted: self.world_time_formatted,
            multiplier: self.multiplier,
            is_paused: self.is_paused,
            has_time_override: self.has_time_override,
            has_multiplier_override: self.has_multiplier_override,
            paused_at,
            status: AuthorityStatusInfo {
                ready: self.authority_status.ready,
                identity: self.authority_status.identity,
                peer_count: self.authority_status.peer_count,
                uptime_sec: self.authority_status.uptime_sec,
            },
        })
    }
}

/// `POST /ixtime/override` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverrideBody {
    world_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    multiplier: Option<f64>,
}

/// Reply body of administrative endpoints.
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// `GET /health` response body.
#[derive(Debug, Deserialize)]
struct HealthBody {
    bot: BotHealthBody,
    ixtime: IxtimeHealthBody,
}

#[derive(Debug, Deserialize)]
struct BotHealthBody {
    ready: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IxtimeHealthBody {
    is_paused: bool,
}

fn parse_world_time_ms(ms: f64) -> Result<DateTime<Utc>, AuthorityError> {
    convert::world_time_from_ms(ms).map_err(|e| AuthorityError::Malformed(e.to_string()))
}
