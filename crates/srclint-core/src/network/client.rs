//! HTTP prober.
//!
//! Provides a wrapper around reqwest with:
//! - HEAD-only requests, so archive bodies are never transferred
//! - Redirect following with a bounded hop count
//! - A timeout chosen per request
//! - User-agent management

use crate::config::{AppConfig, NetworkConfig};
use crate::network::probe::{Probe, ProbeResult};
use crate::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{debug, warn};

/// [`Probe`] implementation issuing real HEAD requests.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Create a new prober with default configuration.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(NetworkConfig::MAX_REDIRECTS))
            .user_agent(AppConfig::USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult {
        debug!("HEAD {} (timeout {:?})", url, timeout);

        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => {
                let status = response.status();
                let size = content_length(response.headers());
                debug!("HEAD {} -> {} ({:?} bytes)", url, status, size);
                ProbeResult::responded(url, status.as_u16(), size)
            }
            Err(e) if e.is_timeout() => {
                warn!("timeout when contacting {}", url);
                ProbeResult::failed(url)
            }
            Err(e) => {
                warn!("connection error when contacting {}: {}", url, e);
                ProbeResult::failed(url)
            }
        }
    }
}

/// Read the `Content-Length` header.
///
/// Missing, non-numeric and zero values all mean "unknown": some servers omit
/// or zero the header for non-empty resources.
pub fn content_length(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(CONTENT_LENGTH)?.to_str().ok()?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match value.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(size) => Some(size),
    }
}

/// Extract the host from a URL.
pub fn extract_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}
