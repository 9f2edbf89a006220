//! Centralized configuration for srclint.
//!
//! Constants are grouped on unit structs by concern; [`AuditConfig`] carries
//! the values a single run may override.

use crate::{AuditError, Result};
use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const USER_AGENT: &'static str = concat!("srclint/", env!("CARGO_PKG_VERSION"));
}

/// Metadata document configuration.
pub struct DocumentConfig;

impl DocumentConfig {
    /// File looked up when the input path is a directory.
    pub const FILE_NAME: &'static str = "conandata.yml";
    /// Top-level key holding the version tree.
    pub const SOURCES_KEY: &'static str = "sources";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const SIBLING_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
    pub const MAX_REDIRECTS: usize = 10;
}

/// Thresholds for the alternative archive search.
pub struct ProbeConfig;

impl ProbeConfig {
    /// Smallest relative saving worth reporting (0.05%).
    pub const MIN_IMPROVEMENT_RATIO: f64 = 0.0005;
    /// The absolute saving must exceed this many bytes.
    pub const MIN_BYTES_SAVED: u64 = 1024;
}

/// Per-run settings.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Timeout for the primary reachability probe of each declared URL.
    pub request_timeout: Duration,
    /// Timeout for speculative sibling probes.
    pub sibling_timeout: Duration,
    /// Whether to search for smaller alternative archives at all.
    pub check_alternatives: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            sibling_timeout: NetworkConfig::SIBLING_PROBE_TIMEOUT,
            check_alternatives: true,
        }
    }
}

impl AuditConfig {
    /// Create a new audit config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary probe timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the sibling probe timeout.
    pub fn with_sibling_timeout(mut self, timeout: Duration) -> Self {
        self.sibling_timeout = timeout;
        self
    }

    /// Enable or disable the alternative archive search.
    pub fn with_alternatives(mut self, enabled: bool) -> Self {
        self.check_alternatives = enabled;
        self
    }

    /// Reject settings that would make every probe fail immediately.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(AuditError::Config {
                message: "request timeout must be greater than zero".into(),
            });
        }
        if self.sibling_timeout.is_zero() {
            return Err(AuditError::Config {
                message: "sibling probe timeout must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
