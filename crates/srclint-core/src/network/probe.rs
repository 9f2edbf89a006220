//! The probe seam between the audit and the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Result of a single header-only probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    /// The server answered with a success status.
    pub reachable: bool,
    /// `None` when no HTTP response was received at all.
    pub status_code: Option<u16>,
    /// `None` when the length is unknown. Never defaulted to zero.
    pub size_bytes: Option<u64>,
}

impl ProbeResult {
    /// A probe that got no HTTP response (timeout, connection error).
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reachable: false,
            status_code: None,
            size_bytes: None,
        }
    }

    /// A probe that got an HTTP response.
    pub fn responded(url: impl Into<String>, status: u16, size_bytes: Option<u64>) -> Self {
        Self {
            url: url.into(),
            reachable: (200..300).contains(&status),
            status_code: Some(status),
            size_bytes,
        }
    }

    /// Shorthand for a `200` response.
    pub fn ok(url: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self::responded(url, 200, size_bytes)
    }
}

/// Issues lightweight reachability probes.
///
/// Implementations must never fail: network-level problems are reported
/// through [`ProbeResult::failed`]. Redirects are expected to be followed.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult;
}

/// Probe backed by a fixed table of responses.
///
/// URLs missing from the table behave like a connection error. Every
/// requested URL is recorded in order.
#[derive(Debug, Default)]
pub struct StaticProber {
    responses: HashMap<String, ProbeResult>,
    requests: Mutex<Vec<String>>,
}

impl StaticProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response for a URL.
    pub fn with(mut self, result: ProbeResult) -> Self {
        self.responses.insert(result.url.clone(), result);
        self
    }

    /// Register a `200` response with the given length.
    pub fn with_ok(self, url: &str, size_bytes: Option<u64>) -> Self {
        self.with(ProbeResult::ok(url, size_bytes))
    }

    /// Register a non-success status.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with(ProbeResult::responded(url, status, None))
    }

    /// URLs probed so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Probe for StaticProber {
    async fn probe(&self, url: &str, _timeout: Duration) -> ProbeResult {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_owned());
        }
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| ProbeResult::failed(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachability_follows_status() {
        assert!(ProbeResult::responded("u", 204, None).reachable);
        assert!(!ProbeResult::responded("u", 404, None).reachable);
        assert!(!ProbeResult::responded("u", 301, None).reachable);
        assert!(!ProbeResult::failed("u").reachable);
        assert_eq!(ProbeResult::failed("u").status_code, None);
    }

    #[tokio::test]
    async fn test_static_prober_records_requests() {
        let prober = StaticProber::new()
            .with_ok("https://a/x.zip", Some(10))
            .with_status("https://a/y.zip", 403);

        let timeout = Duration::from_secs(1);
        assert_eq!(
            prober.probe("https://a/x.zip", timeout).await.size_bytes,
            Some(10)
        );
        assert_eq!(
            prober.probe("https://a/y.zip", timeout).await.status_code,
            Some(403)
        );
        assert_eq!(
            prober.probe("https://a/z.zip", timeout).await,
            ProbeResult::failed("https://a/z.zip")
        );
        assert_eq!(
            prober.requests(),
            vec!["https://a/x.zip", "https://a/y.zip", "https://a/z.zip"]
        );
    }
}
