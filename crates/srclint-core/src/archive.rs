//! Alternative archive format discovery.
//!
//! Given a reachable archive URL, derive sibling URLs that differ only in the
//! archive suffix, probe them with HEAD requests and report a sibling that is
//! meaningfully smaller. No archive body is ever downloaded.
//!
//! Siblings are probed in suffix preference order (best compression first).
//! When a sibling turns out to exist but its size is unknown, sizes can no
//! longer be compared, so the best-ranked existing sibling is reported as a
//! "potentially smaller" hint instead.

use crate::config::ProbeConfig;
use crate::network::{extract_host, Probe};
use crate::report::Finding;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Host serving archives generated on demand from tags and commits.
const GENERATED_ARCHIVE_HOST: &str = "github.com";
/// Path marker of uploaded release assets on that host.
const RELEASE_ASSET_MARKER: &str = "/releases/download/";
/// Path marker of GitLab's archive export endpoint.
pub const GITLAB_ARCHIVE_MARKER: &str = "/-/archive/";

/// Known archive suffixes, ranked by typical compression efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchiveSuffix {
    TarXz,
    TarBz2,
    TarGz,
    Tgz,
    Zip,
}

impl ArchiveSuffix {
    /// All suffixes, best first.
    pub const ALL: [ArchiveSuffix; 5] = [
        ArchiveSuffix::TarXz,
        ArchiveSuffix::TarBz2,
        ArchiveSuffix::TarGz,
        ArchiveSuffix::Tgz,
        ArchiveSuffix::Zip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveSuffix::TarXz => ".tar.xz",
            ArchiveSuffix::TarBz2 => ".tar.bz2",
            ArchiveSuffix::TarGz => ".tar.gz",
            ArchiveSuffix::Tgz => ".tgz",
            ArchiveSuffix::Zip => ".zip",
        }
    }

    /// The suffix `url` ends with, if any.
    pub fn match_url(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| url.ends_with(s.as_str()))
    }
}

impl fmt::Display for ArchiveSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An archive known to exist at `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCandidate {
    pub suffix: ArchiveSuffix,
    pub url: String,
    pub size_bytes: Option<u64>,
}

/// Whether `url` is an archive synthesized on demand by the code host.
///
/// Such archives have no sibling formats to discover.
pub fn is_generated_archive(url: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    let Some(host) = extract_host(url) else {
        return false;
    };
    let on_host = host == GENERATED_ARCHIVE_HOST
        || host.ends_with(&format!(".{GENERATED_ARCHIVE_HOST}"));
    on_host && !parsed.path().contains(RELEASE_ASSET_MARKER)
}

/// Outcome of examining one sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// The probe failed or returned a non-success status.
    Missing,
    /// The sibling exists; its size may be unknown.
    Found(Option<u64>),
}

/// State of a [`ProbeLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Probing,
    /// An existing sibling of unknown size was found before any other
    /// sibling; further results could not be compared against it.
    StoppedUnknown,
    /// Every suffix was examined.
    Exhausted,
}

/// Ranked walk over candidate suffixes.
///
/// Outcomes must be recorded in suffix-rank order, one per call to
/// [`next_suffix`](Self::next_suffix).
#[derive(Debug, Clone)]
pub struct ProbeLoop {
    suffixes: Vec<ArchiveSuffix>,
    position: usize,
    state: ProbeState,
    results: Vec<ArchiveCandidate>,
    found: usize,
}

impl ProbeLoop {
    /// Start a walk over `suffixes`, with `seed` placed ahead of any result.
    pub fn new(suffixes: Vec<ArchiveSuffix>, seed: Option<ArchiveCandidate>) -> Self {
        let state = if suffixes.is_empty() {
            ProbeState::Exhausted
        } else {
            ProbeState::Probing
        };
        Self {
            suffixes,
            position: 0,
            state,
            results: seed.into_iter().collect(),
            found: 0,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// The next suffix to examine, or `None` once the walk has ended.
    pub fn next_suffix(&self) -> Option<ArchiveSuffix> {
        match self.state {
            ProbeState::Probing => self.suffixes.get(self.position).copied(),
            ProbeState::StoppedUnknown | ProbeState::Exhausted => None,
        }
    }

    /// Record the outcome for the suffix returned by `next_suffix`.
    pub fn record(&mut self, url: impl Into<String>, outcome: CandidateOutcome) {
        let Some(suffix) = self.next_suffix() else {
            return;
        };
        self.position += 1;

        if let CandidateOutcome::Found(size_bytes) = outcome {
            let only_missing_before = self.found == 0;
            self.found += 1;
            self.results.push(ArchiveCandidate {
                suffix,
                url: url.into(),
                size_bytes,
            });
            if size_bytes.is_none() && only_missing_before {
                self.state = ProbeState::StoppedUnknown;
                return;
            }
        }

        if self.position >= self.suffixes.len() {
            self.state = ProbeState::Exhausted;
        }
    }

    pub fn results(&self) -> &[ArchiveCandidate] {
        &self.results
    }
}

/// Pick the archive to recommend instead of `original`, if any.
pub fn select_best(
    original: &str,
    orig_size: Option<u64>,
    results: &[ArchiveCandidate],
) -> Option<Finding> {
    if results.iter().any(|c| c.size_bytes.is_none()) {
        let first = results.first()?;
        if first.url == original {
            return None;
        }
        return Some(Finding::SmallerArchiveAvailable {
            original: original.to_owned(),
            url: first.url.clone(),
            percent_saved: None,
            bytes_saved: None,
        });
    }

    let best = results
        .iter()
        .min_by(|a, b| (a.size_bytes, &a.url).cmp(&(b.size_bytes, &b.url)))?;
    if best.url == original {
        return None;
    }

    let orig_size = orig_size?;
    let best_size = best.size_bytes?;
    let saved = orig_size.saturating_sub(best_size);
    let ratio = saved as f64 / orig_size as f64;
    if ratio < ProbeConfig::MIN_IMPROVEMENT_RATIO || saved <= ProbeConfig::MIN_BYTES_SAVED {
        debug!(
            "{} is only {} bytes smaller than {}, not reporting",
            best.url, saved, original
        );
        return None;
    }

    Some(Finding::SmallerArchiveAvailable {
        original: original.to_owned(),
        url: best.url.clone(),
        percent_saved: Some(ratio * 100.0),
        bytes_saved: Some(saved),
    })
}

/// Searches for smaller sibling archives of reachable URLs.
pub struct ArchiveProber<'a> {
    prober: &'a dyn Probe,
    timeout: Duration,
}

impl<'a> ArchiveProber<'a> {
    pub fn new(prober: &'a dyn Probe, timeout: Duration) -> Self {
        Self { prober, timeout }
    }

    /// Check a reachable `url` whose size is `orig_size`.
    pub async fn check(&self, url: &str, orig_size: Option<u64>) -> Option<Finding> {
        if is_generated_archive(url) {
            debug!("{} is a generated archive, skipping", url);
            return None;
        }
        let original_suffix = ArchiveSuffix::match_url(url)?;
        let base = &url[..url.len() - original_suffix.as_str().len()];

        let mut walk = if url.contains(GITLAB_ARCHIVE_MARKER) {
            // GitLab exports reliably offer exactly one alternative.
            ProbeLoop::new(
                vec![ArchiveSuffix::TarBz2],
                Some(ArchiveCandidate {
                    suffix: original_suffix,
                    url: url.to_owned(),
                    size_bytes: orig_size,
                }),
            )
        } else {
            ProbeLoop::new(ArchiveSuffix::ALL.to_vec(), None)
        };

        while let Some(suffix) = walk.next_suffix() {
            let candidate = format!("{base}{suffix}");
            let outcome = if candidate == url {
                CandidateOutcome::Found(orig_size)
            } else {
                let result = self.prober.probe(&candidate, self.timeout).await;
                if result.reachable {
                    CandidateOutcome::Found(result.size_bytes)
                } else {
                    CandidateOutcome::Missing
                }
            };
            debug!("sibling {} -> {:?}", candidate, outcome);
            walk.record(candidate, outcome);
        }

        select_best(url, orig_size, walk.results())
    }
}
