//! srclint core - headless auditor for source archive metadata documents.
//!
//! A metadata document lists, for each released version of a package, where
//! to download its source archive and the archive's SHA-256. This crate checks
//! that every declared URL is reachable, that hashes and URLs are not
//! duplicated, that URLs mention their version, and whether a smaller archive
//! format is published next to the declared one.
//!
//! # Example
//!
//! ```rust,ignore
//! use srclint_core::{load_document, AuditConfig, Auditor, HttpProber, TextReport};
//!
//! #[tokio::main]
//! async fn main() -> srclint_core::Result<()> {
//!     let tree = load_document("recipes/zlib/all")?;
//!     let auditor = Auditor::new(AuditConfig::default(), HttpProber::new()?);
//!
//!     let mut report = TextReport::new(std::io::stdout());
//!     let summary = auditor.audit(&tree, &mut report).await?;
//!     println!("{} findings", summary.findings());
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod audit;
pub mod availability;
pub mod config;
pub mod consistency;
pub mod document;
pub mod error;
pub mod network;
pub mod report;
pub mod sources;

// Re-export commonly used types
pub use archive::{ArchiveCandidate, ArchiveProber, ArchiveSuffix, ProbeLoop, ProbeState};
pub use audit::{AuditSummary, Auditor};
pub use availability::{check_availability, Availability};
pub use config::AuditConfig;
pub use consistency::{version_in_url, ConsistencyChecker, VersionMatch, VersionUrlPolicy};
pub use document::{load_document, resolve_document_path, SourceTree, VersionSources};
pub use error::{AuditError, Result};
pub use network::{HttpProber, Probe, ProbeResult, StaticProber};
pub use report::{
    ExitPolicy, Finding, FindingSink, JsonLinesReport, Report, Severity, TextReport,
};
pub use sources::SourceEntry;
