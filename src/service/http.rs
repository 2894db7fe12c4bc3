//! Page retrieval.
//!
//! The network call sits behind the [`Transport`] trait; [`Fetcher`] owns the
//! retry policy (a single `https` → `http` downgrade on TLS failure).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::AppConfig;
use crate::error::FetchError;

/// What came back from the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// URL after redirects
    pub url: Url,
    pub status_code: u16,
    pub body: String,
}

/// A fetched page ready for parsing.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final resolved URL, possibly downgraded to `http`
    pub url: Url,
    pub status_code: u16,
    pub body: String,
    pub elapsed: Duration,
}

impl FetchedPage {
    pub fn load_time_seconds(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 100.0).round() / 100.0
    }
}

/// One GET, classified into a [`FetchError`] on failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> std::result::Result<RawResponse, FetchError>;
}

/// Factory for the HTTP client used in production.
pub fn create_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(create_client(config.timeout, &config.user_agent)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> std::result::Result<RawResponse, FetchError> {
        log::trace!("[FETCH] GET {}", url);
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let final_url = response.url().clone();
        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, &e))?;

        Ok(RawResponse {
            url: final_url,
            status_code,
            body,
        })
    }
}

const TLS_MARKERS: [&str; 7] = [
    "tls",
    "ssl",
    "certificate",
    "handshake",
    "invalidcontenttype",
    "corrupt message",
    "wrong version number",
];

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Messages of the underlying causes only; the top-level reqwest message
/// embeds the request URL.
fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn is_connection_refused(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

fn looks_like_tls_failure(chain: &str) -> bool {
    let lower = chain.to_lowercase();
    TLS_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn classify_error(url: &Url, err: &reqwest::Error) -> FetchError {
    let chain = error_chain(err);
    log::debug!("[FETCH] Transport error for {}: {}", url, chain);

    if err.is_timeout() {
        return FetchError::Timeout(chain);
    }
    if err.is_connect() {
        if !is_connection_refused(err)
            && url.scheme() == "https"
            && looks_like_tls_failure(&cause_chain(err))
        {
            return FetchError::Tls(chain);
        }
        return FetchError::unreachable(url.host_str().unwrap_or(url.as_str()));
    }
    FetchError::Transport(chain)
}

/// Plaintext equivalent of a secure URL.
fn downgrade(url: &Url) -> Option<Url> {
    let mut plain = url.clone();
    plain.set_scheme("http").ok()?;
    Some(plain)
}

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::from_config(config)?)))
    }

    /// Timed retrieval of a single page.
    pub async fn fetch(&self, url: &Url) -> std::result::Result<FetchedPage, FetchError> {
        let start = Instant::now();

        let response = match self.transport.get(url).await {
            Ok(response) => response,
            Err(err) if err.is_tls() && url.scheme() == "https" => {
                let Some(plain) = downgrade(url) else {
                    return Err(err);
                };
                log::warn!("[FETCH] {} for {}; retrying over {}", err, url, plain);
                self.transport.get(&plain).await?
            }
            Err(err) => return Err(err),
        };

        let elapsed = start.elapsed();
        if !(200..300).contains(&response.status_code) {
            log::warn!(
                "[FETCH] {} answered HTTP {}; analyzing body anyway",
                response.url,
                response.status_code
            );
        }
        log::debug!(
            "[FETCH] Received {} bytes from {} in {:?}",
            response.body.len(),
            response.url,
            elapsed
        );

        Ok(FetchedPage {
            url: response.url,
            status_code: response.status_code,
            body: response.body,
            elapsed,
        })
    }
}
