//! Primary reachability check for declared URLs.

use crate::network::Probe;
use crate::report::Finding;
use std::time::Duration;
use tracing::debug;

/// Classification of a declared URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    /// The URL answered with a success status.
    Reachable { size_bytes: Option<u64> },
    /// The URL could not be fetched; carries the finding to report.
    Unreachable(Finding),
}

/// Probe `url` once and classify the response.
pub async fn check_availability(prober: &dyn Probe, url: &str, timeout: Duration) -> Availability {
    let result = prober.probe(url, timeout).await;
    if result.reachable {
        debug!("{} is reachable ({:?} bytes)", url, result.size_bytes);
        return Availability::Reachable {
            size_bytes: result.size_bytes,
        };
    }
    Availability::Unreachable(Finding::UnreachableUrl {
        url: url.to_owned(),
        status: result.status_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::StaticProber;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_reachable_keeps_unknown_size() {
        let prober = StaticProber::new().with_ok("https://a/x.zip", None);
        assert_eq!(
            check_availability(&prober, "https://a/x.zip", TIMEOUT).await,
            Availability::Reachable { size_bytes: None }
        );
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let prober = StaticProber::new().with_status("https://a/x.zip", 404);
        assert_eq!(
            check_availability(&prober, "https://a/x.zip", TIMEOUT).await,
            Availability::Unreachable(Finding::UnreachableUrl {
                url: "https://a/x.zip".into(),
                status: Some(404),
            })
        );
    }

    #[tokio::test]
    async fn test_network_failure_has_no_status() {
        let prober = StaticProber::new();
        assert_eq!(
            check_availability(&prober, "https://a/x.zip", TIMEOUT).await,
            Availability::Unreachable(Finding::UnreachableUrl {
                url: "https://a/x.zip".into(),
                status: None,
            })
        );
    }
}
