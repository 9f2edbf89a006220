//! Run orchestration.
//!
//! Feeds every source entry through the consistency checks, probes each
//! distinct URL once and searches reachable archives for smaller siblings.
//! Entries are processed strictly in document order, one probe at a time.

use crate::archive::ArchiveProber;
use crate::availability::{check_availability, Availability};
use crate::config::AuditConfig;
use crate::consistency::{ConsistencyChecker, VersionUrlPolicy};
use crate::document::SourceTree;
use crate::network::Probe;
use crate::report::{ExitPolicy, Finding, FindingSink, Severity};
use crate::sources::SourceEntry;
use crate::Result;
use tracing::{debug, info};

/// Counters describing a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// Source entries examined.
    pub entries: usize,
    /// Distinct URLs that got a primary probe.
    pub urls_probed: usize,
    pub advisories: usize,
    pub errors: usize,
}

impl AuditSummary {
    pub fn findings(&self) -> usize {
        self.advisories + self.errors
    }

    /// Process exit code for a completed run under `policy`.
    pub fn exit_code(&self, policy: ExitPolicy) -> i32 {
        match policy {
            ExitPolicy::Advisory => 0,
            ExitPolicy::Strict if self.errors > 0 => 1,
            ExitPolicy::Strict => 0,
        }
    }

    fn count(&mut self, finding: &Finding) {
        match finding.severity() {
            Severity::Advisory => self.advisories += 1,
            Severity::Error => self.errors += 1,
        }
    }
}

/// Audits one metadata document.
pub struct Auditor<P: Probe> {
    config: AuditConfig,
    prober: P,
}

impl<P: Probe> Auditor<P> {
    pub fn new(config: AuditConfig, prober: P) -> Self {
        Self { config, prober }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Audit every entry of `tree`, emitting findings to `sink`.
    ///
    /// Only a failing sink aborts the run.
    pub async fn audit(&self, tree: &SourceTree, sink: &mut dyn FindingSink) -> Result<AuditSummary> {
        let entries: Vec<SourceEntry> = tree.entries().collect();
        info!("Auditing {} source entries", entries.len());

        let policy = VersionUrlPolicy::for_entries(&entries);
        if !policy.is_active() {
            debug!("No URL encodes its version; skipping version-in-url findings");
        }

        let mut checker = ConsistencyChecker::new();
        let archives = ArchiveProber::new(&self.prober, self.config.sibling_timeout);
        let mut summary = AuditSummary::default();

        for entry in &entries {
            summary.entries += 1;
            let first_sighting = !checker.has_seen_url(&entry.url);

            let mut findings = checker.check(entry);
            findings.extend(policy.check(entry));

            if first_sighting {
                summary.urls_probed += 1;
                match check_availability(&self.prober, &entry.url, self.config.request_timeout).await {
                    Availability::Reachable { size_bytes } => {
                        if self.config.check_alternatives {
                            findings.extend(archives.check(&entry.url, size_bytes).await);
                        }
                    }
                    Availability::Unreachable(finding) => findings.push(finding),
                }
            }

            for finding in findings {
                summary.count(&finding);
                sink.emit(finding)?;
            }
        }

        info!(
            "Audit finished: {} entries, {} advisories, {} errors",
            summary.entries, summary.advisories, summary.errors
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::StaticProber;
    use crate::report::Report;

    #[test]
    fn test_exit_codes() {
        let clean = AuditSummary::default();
        assert_eq!(clean.exit_code(ExitPolicy::Strict), 0);

        let failing = AuditSummary {
            errors: 1,
            ..Default::default()
        };
        assert_eq!(failing.exit_code(ExitPolicy::Advisory), 0);
        assert_eq!(failing.exit_code(ExitPolicy::Strict), 1);

        let advisory_only = AuditSummary {
            advisories: 3,
            ..Default::default()
        };
        assert_eq!(advisory_only.exit_code(ExitPolicy::Strict), 0);
        assert_eq!(advisory_only.findings(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_url_probed_once() {
        let tree = SourceTree::from_yaml_str(
            r#"
sources:
  "1.0":
    url: "https://e.org/pkg-1.0.zip"
    sha256: "a"
  "1.1":
    url: "https://e.org/pkg-1.0.zip"
    sha256: "b"
"#,
        )
        .unwrap();
        let prober = StaticProber::new().with_ok("https://e.org/pkg-1.0.zip", Some(100));
        let auditor = Auditor::new(AuditConfig::default().with_alternatives(false), prober);
        let mut report = Report::new();
        let summary = auditor.audit(&tree, &mut report).await.unwrap();

        assert_eq!(summary.entries, 2);
        assert_eq!(summary.urls_probed, 1);
        assert_eq!(auditor.prober().requests(), vec!["https://e.org/pkg-1.0.zip"]);
        assert_eq!(
            report.findings(),
            &[
                Finding::DuplicateUrl {
                    url: "https://e.org/pkg-1.0.zip".into(),
                    version: "1.1".into(),
                },
                Finding::VersionNotInUrl {
                    version: "1.1".into(),
                    url: "https://e.org/pkg-1.0.zip".into(),
                },
            ]
        );
    }
}
