//! Findings and the sinks that consume them.
//!
//! A [`Finding`] is the only thing an audit produces. Sinks receive findings
//! in the order entries are processed; severity does not affect ordering.

use crate::Result;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth a look, but the document is usable as is.
    Advisory,
    /// The document is wrong or a declared source cannot be fetched.
    Error,
}

/// A single diagnostic about the audited document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The same content hash is declared for two different versions.
    DuplicateHash {
        hash: String,
        version: String,
        first_version: String,
    },
    /// A URL is declared more than once.
    DuplicateUrl { url: String, version: String },
    /// The URL uses plain `http://`.
    InsecureScheme { url: String },
    /// The URL uses neither `http://` nor `https://`.
    UnknownScheme { url: String },
    /// The primary probe failed. `status` is `None` for network-level failures.
    UnreachableUrl { url: String, status: Option<u16> },
    /// The version string is not recognizably part of its URL.
    VersionNotInUrl { version: String, url: String },
    /// A sibling archive in another format looks smaller.
    ///
    /// Without a percentage this is only a "potentially smaller" hint.
    SmallerArchiveAvailable {
        original: String,
        url: String,
        percent_saved: Option<f64>,
        bytes_saved: Option<u64>,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::DuplicateHash { .. }
            | Finding::DuplicateUrl { .. }
            | Finding::UnreachableUrl { .. } => Severity::Error,
            Finding::InsecureScheme { .. }
            | Finding::UnknownScheme { .. }
            | Finding::VersionNotInUrl { .. }
            | Finding::SmallerArchiveAvailable { .. } => Severity::Advisory,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::DuplicateHash {
                hash,
                version,
                first_version,
            } => write!(
                f,
                "sha256 {hash} is present twice for version {version} (first declared for {first_version})"
            ),
            Finding::DuplicateUrl { url, version } => {
                write!(f, "url {url} is present twice for version {version}")
            }
            Finding::InsecureScheme { url } => write!(f, "url {url} uses non secure http"),
            Finding::UnknownScheme { url } => write!(f, "unknown url scheme {url}"),
            Finding::UnreachableUrl {
                url,
                status: Some(status),
            } => write!(f, "url {url} is not available ({status})"),
            Finding::UnreachableUrl { url, status: None } => {
                write!(f, "url {url} is not available")
            }
            Finding::VersionNotInUrl { version, url } => {
                write!(f, "url {url} of version {version} does not contain version")
            }
            Finding::SmallerArchiveAvailable {
                url,
                percent_saved: Some(percent),
                ..
            } => write!(f, "a {percent:.1}% smaller archive exists at {url}"),
            Finding::SmallerArchiveAvailable { url, .. } => {
                write!(f, "a potentially smaller archive exists at {url}")
            }
        }
    }
}

/// Consumer of findings.
pub trait FindingSink {
    fn emit(&mut self, finding: Finding) -> Result<()>;
}

/// In-memory sink, for callers that want the variants themselves.
#[derive(Debug, Default)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl FindingSink for Report {
    fn emit(&mut self, finding: Finding) -> Result<()> {
        self.findings.push(finding);
        Ok(())
    }
}

/// Human-readable sink: one finding per line, blank-line separated.
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FindingSink for TextReport<W> {
    fn emit(&mut self, finding: Finding) -> Result<()> {
        writeln!(self.writer, "{finding}")?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Structured sink: one JSON object per line.
pub struct JsonLinesReport<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    severity: Severity,
    message: String,
    #[serde(flatten)]
    finding: &'a Finding,
}

impl<W: Write> FindingSink for JsonLinesReport<W> {
    fn emit(&mut self, finding: Finding) -> Result<()> {
        let line = JsonLine {
            severity: finding.severity(),
            message: finding.to_string(),
            finding: &finding,
        };
        serde_json::to_writer(&mut self.writer, &line).map_err(std::io::Error::from)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// How findings translate into a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Findings are advisory; a completed run always exits 0.
    #[default]
    Advisory,
    /// Any [`Severity::Error`] finding makes the run fail.
    Strict,
}
