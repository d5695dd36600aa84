//! Session-scoped signaling client
//!
//! Thin JSON request/response wrapper over a shared HTTP client. The
//! endpoint (base address + session credential) is mutable because the
//! `initialize` call rebinds both; everything else is stateless and the
//! client clones cheaply into spawned tasks.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Header carrying the session credential after initialization
pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// Keepalive path pinged while a recording is live
const RECORD_PING_PATH: &str = "/record/ping";

#[derive(Debug)]
struct Endpoint {
    base_url: String,
    session_token: Option<String>,
}

/// JSON signaling client with a rebindable session endpoint
#[derive(Clone)]
pub struct Signaler {
    http: reqwest::Client,
    endpoint: Arc<RwLock<Endpoint>>,
}

impl Signaler {
    /// Create a signaler targeting the given base address
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: Arc::new(RwLock::new(Endpoint {
                base_url: normalize_base_url(&base_url.into()),
                session_token: None,
            })),
        }
    }

    /// Rebind the base address and attach the session credential
    ///
    /// Applied once, from the `initialize` response; every subsequent call
    /// targets `fqdn` and carries the token header.
    pub fn bind_session(&self, fqdn: &str, session_token: &str) {
        let mut endpoint = self.endpoint.write().unwrap();
        endpoint.base_url = normalize_base_url(fqdn);
        endpoint.session_token = Some(session_token.to_string());
        debug!(base_url = %endpoint.base_url, "signaling endpoint rebound");
    }

    /// Current base address
    pub fn base_url(&self) -> String {
        self.endpoint.read().unwrap().base_url.clone()
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.dispatch(self.http.post(self.url(path)).json(body), path).await?;
        response
            .json::<R>()
            .await
            .map_err(|source| ClientError::Response { path: path.to_string(), source })
    }

    /// POST a JSON body, caring only about success or failure
    pub async fn post_ok<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(self.http.post(self.url(path)).json(body), path).await?;
        Ok(())
    }

    /// GET a path, caring only about success or failure
    pub async fn get_ok(&self, path: &str) -> Result<()> {
        self.dispatch(self.http.get(self.url(path)), path).await?;
        Ok(())
    }

    /// Start the periodic recording keepalive
    ///
    /// Issues `GET /record/ping` every `interval` until the returned guard
    /// is cancelled or dropped. A failed ping is logged and the cadence
    /// continues; cancellation is synchronous and no new ping starts after
    /// it.
    pub fn start_ping(&self, interval: Duration) -> PingGuard {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let signaler = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() fires immediately; the first ping is due one
            // interval after the recording starts
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(error) = signaler.get_ok(RECORD_PING_PATH).await {
                            warn!(%error, "recording keepalive ping failed");
                        }
                    }
                }
            }
            debug!("recording keepalive stopped");
        });

        PingGuard { token }
    }

    fn url(&self, path: &str) -> String {
        let endpoint = self.endpoint.read().unwrap();
        format!("{}{}", endpoint.base_url.trim_end_matches('/'), path)
    }

    fn session_token(&self) -> Option<String> {
        self.endpoint.read().unwrap().session_token.clone()
    }

    async fn dispatch(
        &self,
        mut request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response> {
        if let Some(token) = self.session_token() {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Request { path: path.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { path: path.to_string(), status });
        }
        Ok(response)
    }
}

/// Cancellation handle for the keepalive task
///
/// Dropping the guard cancels the task as well, so an abandoned recording
/// cannot leak pings.
#[derive(Debug)]
pub struct PingGuard {
    token: CancellationToken,
}

impl PingGuard {
    /// Stop the keepalive; synchronous and idempotent
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the keepalive has been stopped
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PingGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Bare hosts get an https scheme; explicit schemes are preserved
fn normalize_base_url(addr: &str) -> String {
    let trimmed = addr.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
