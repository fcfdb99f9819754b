//! HTTP client for downloading bi5 files.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the download client.
///
/// Retries are not a client concern: they are applied by the
/// [`FetchPool`](crate::FetchPool) around each single-attempt request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum simultaneously in-flight requests per day.
    pub concurrency: usize,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout (separate from the request timeout).
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("tickday/{} (tick-downloader)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during downloads.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a retryable status (5xx or 429).
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Server returned a non-retryable status.
    #[error("Unexpected status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Transport failure reported by a non-reqwest source.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl DownloadError {
    /// Returns true if the request may succeed when retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            // Builder errors are configuration issues
            Self::Http(e) if e.is_builder() => false,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::ServerError { .. } | Self::Transport(_) => true,
            Self::Status { .. } => false,
        }
    }

    /// Classifies a response status.
    ///
    /// Returns `Ok(false)` for 404 (no data), `Ok(true)` for success.
    fn check_status(status: StatusCode) -> Result<bool, Self> {
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Self::ServerError {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(Self::Status {
                status: status.as_u16(),
            });
        }
        Ok(true)
    }
}

/// A source of raw hour payloads.
///
/// One call is one attempt: implementations do not retry. `Ok(None)` means
/// the feed has no data for the hour (HTTP 404).
#[async_trait]
pub trait HourSource: Send + Sync {
    /// Fetches the payload at `url`.
    async fn get(&self, url: &str) -> Result<Option<Bytes>, DownloadError>;
}

/// HTTP client with connection pooling.
///
/// Constructed once per pipeline run and shared by every fetch of that run.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl HourSource for DownloadClient {
    async fn get(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        let response = self.client.get(url).send().await?;
        if !DownloadError::check_status(response.status())? {
            return Ok(None);
        }
        Ok(Some(response.bytes().await?))
    }
}
