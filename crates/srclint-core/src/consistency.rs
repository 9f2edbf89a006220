//! Version and URL consistency checks.
//!
//! Two independent concerns live here:
//!
//! - [`ConsistencyChecker`] tracks hashes and URLs across the whole document
//!   and flags duplicates and suspicious URL schemes.
//! - [`VersionUrlPolicy`] flags entries whose version string does not appear
//!   in the URL. It runs in two phases: the document-level signal is computed
//!   up front from every entry, then each entry is checked on its own.

use crate::report::Finding;
use crate::sources::SourceEntry;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Prefix of package-manager-assigned pseudo-versions.
const PSEUDO_VERSION_PREFIX: &str = "cci.";

/// URLs known to use a release name that differs from the declared version.
///
/// Keyed by exact URL; the version column is informational.
pub const KNOWN_VERSION_MISMATCHES: &[(&str, &str)] = &[
    (
        "https://github.com/protocolbuffers/protobuf/releases/download/v21.12/protobuf-all-21.12.tar.gz",
        "3.21.12",
    ),
    (
        "https://github.com/protocolbuffers/protobuf/releases/download/v21.9/protobuf-all-21.9.tar.gz",
        "3.21.9",
    ),
];

/// Tracks duplicate hashes and URLs over a single run.
#[derive(Debug, Default)]
pub struct ConsistencyChecker {
    /// hash -> first version it was declared for
    hashes: HashMap<String, String>,
    urls: HashSet<String>,
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `url` was already recorded by an earlier [`check`](Self::check).
    pub fn has_seen_url(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Check one entry against everything seen so far.
    pub fn check(&mut self, entry: &SourceEntry) -> Vec<Finding> {
        let mut findings = Vec::new();

        match self.hashes.get(&entry.content_hash) {
            Some(first) if *first != entry.version => {
                findings.push(Finding::DuplicateHash {
                    hash: entry.content_hash.clone(),
                    version: entry.version.clone(),
                    first_version: first.clone(),
                });
            }
            Some(_) => {}
            None => {
                self.hashes
                    .insert(entry.content_hash.clone(), entry.version.clone());
            }
        }

        if !self.urls.insert(entry.url.clone()) {
            findings.push(Finding::DuplicateUrl {
                url: entry.url.clone(),
                version: entry.version.clone(),
            });
        }

        if let Some(finding) = check_scheme(&entry.url) {
            findings.push(finding);
        }

        findings
    }
}

/// Classify the URL scheme.
pub fn check_scheme(url: &str) -> Option<Finding> {
    if url.starts_with("http://") {
        warn!("url {} uses non secure http", url);
        Some(Finding::InsecureScheme { url: url.to_owned() })
    } else if !url.starts_with("https://") {
        warn!("unknown url scheme {}", url);
        Some(Finding::UnknownScheme { url: url.to_owned() })
    } else {
        None
    }
}

/// Outcome of the version-in-URL heuristic for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMatch {
    /// Pseudo-version with no canonical upstream form; not checked.
    Skipped,
    /// One of the version's spellings occurs in the URL.
    Matched,
    /// No spelling matched, but the URL is a known naming exception.
    AllowListed,
    Unmatched,
}

/// Test whether `version` is recognizably embedded in `url`.
pub fn version_in_url(version: &str, url: &str) -> VersionMatch {
    let version_lower = version.to_lowercase();
    if version_lower.starts_with(PSEUDO_VERSION_PREFIX) {
        return VersionMatch::Skipped;
    }

    let url_lower = url.to_lowercase();
    let mut spellings = vec![
        version_lower.clone(),
        version_lower.replace('.', ""),
        version_lower.replace('.', "_"),
        version_lower.replace('-', ""),
    ];
    if let Some(stripped) = version_lower.strip_suffix(".0") {
        spellings.push(stripped.to_owned());
    }

    if spellings.iter().any(|s| url_lower.contains(s.as_str())) {
        return VersionMatch::Matched;
    }

    if KNOWN_VERSION_MISMATCHES
        .iter()
        .any(|(known_url, _)| *known_url == url)
    {
        return VersionMatch::AllowListed;
    }

    VersionMatch::Unmatched
}

/// Document-level policy for [`Finding::VersionNotInUrl`].
///
/// If no entry of the document encodes its version in the URL, the document
/// is assumed to follow an unrelated naming convention and nothing is flagged.
/// This can hide genuine mistakes in documents that mix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionUrlPolicy {
    any_matched: bool,
}

impl VersionUrlPolicy {
    /// First phase: compute the document-level signal.
    pub fn for_entries<'a>(entries: impl IntoIterator<Item = &'a SourceEntry>) -> Self {
        let any_matched = entries
            .into_iter()
            .any(|e| version_in_url(&e.version, &e.url) == VersionMatch::Matched);
        Self { any_matched }
    }

    /// Whether findings of this class are emitted for the document at all.
    pub fn is_active(&self) -> bool {
        self.any_matched
    }

    /// Second phase: check a single entry.
    pub fn check(&self, entry: &SourceEntry) -> Option<Finding> {
        if !self.any_matched {
            return None;
        }
        match version_in_url(&entry.version, &entry.url) {
            VersionMatch::Unmatched => Some(Finding::VersionNotInUrl {
                version: entry.version.clone(),
                url: entry.url.clone(),
            }),
            _ => None,
        }
    }
}
