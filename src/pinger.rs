//! Keep-alive pinger.
//!
//! Issues a `GET` to a fixed URL on a fixed interval to keep a hosted
//! deployment from idling down. Every tick is independent: a failed request is
//! logged and the loop carries on with the next tick. There is no retry,
//! backoff or jitter.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::config::{PingerConfig, PING_USER_AGENT};

#[derive(Debug, thiserror::Error)]
pub enum PingError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Result of one successful round trip
#[derive(Debug, Clone)]
pub struct PingOutcome {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Pinger {
    client: reqwest::Client,
    url: String,
    interval: Duration,
}

impl Pinger {
    pub fn new(config: &PingerConfig) -> Result<Self, PingError> {
        Self::with_timing(
            config.url.clone(),
            Duration::from_secs(config.interval_seconds),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Build a pinger with an explicit interval and per-request timeout.
    pub fn with_timing(
        url: impl Into<String>,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self, PingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(PING_USER_AGENT)
            .build()
            .map_err(PingError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
            interval,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Perform a single ping. Non-2xx responses are returned, not treated as errors.
    #[instrument(name = "pinger::ping_once", skip(self), fields(url = %self.url))]
    pub async fn ping_once(&self) -> Result<PingOutcome, PingError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| PingError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| PingError::Body {
            url: self.url.clone(),
            source,
        })?;

        Ok(PingOutcome { status, body })
    }

    /// Ping forever, sleeping `interval` after each attempt.
    pub async fn run(self) {
        tracing::info!(
            url = %self.url,
            interval_secs = self.interval.as_secs(),
            "Keep-alive pinger started"
        );

        loop {
            match self.ping_once().await {
                Ok(outcome) if outcome.status.is_success() => {
                    tracing::info!(
                        status = outcome.status.as_u16(),
                        body = %outcome.body,
                        "Keep-alive ping succeeded"
                    );
                }
                Ok(outcome) => {
                    tracing::warn!(
                        status = outcome.status.as_u16(),
                        body = %outcome.body,
                        "Keep-alive ping returned non-success status"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Keep-alive ping failed, will try again next interval");
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run the loop on its own task. The task lives until the runtime shuts down.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
