//! Source entry extraction.

use crate::document::SourceTree;

/// One declared `(version, url, content hash)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceEntry {
    pub version: String,
    pub url: String,
    pub content_hash: String,
}

impl SourceEntry {
    pub fn new(
        version: impl Into<String>,
        url: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            url: url.into(),
            content_hash: content_hash.into(),
        }
    }
}

impl SourceTree {
    /// Iterate every source entry in document order.
    ///
    /// Mirror lists expand into one entry per URL sharing the version's hash.
    /// Versions without a hash are not source archives and yield nothing.
    pub fn entries(&self) -> impl Iterator<Item = SourceEntry> + '_ {
        self.versions().iter().flat_map(|v| {
            let hash = v.sha256.as_deref();
            v.urls.iter().filter_map(move |url| {
                hash.map(|hash| SourceEntry::new(v.version.as_str(), url.as_str(), hash))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::VersionSources;

    fn version(version: &str, urls: &[&str], sha256: Option<&str>) -> VersionSources {
        VersionSources {
            version: version.into(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            sha256: sha256.map(str::to_owned),
        }
    }

    #[test]
    fn test_mirrors_expand_in_order() {
        let tree = SourceTree::from_versions(vec![
            version("2.0", &["https://a/x-2.0.zip"], Some("h2")),
            version("1.0", &["https://a/x-1.0.zip", "https://b/x-1.0.zip"], Some("h1")),
        ]);
        let entries: Vec<_> = tree.entries().collect();
        assert_eq!(
            entries,
            vec![
                SourceEntry::new("2.0", "https://a/x-2.0.zip", "h2"),
                SourceEntry::new("1.0", "https://a/x-1.0.zip", "h1"),
                SourceEntry::new("1.0", "https://b/x-1.0.zip", "h1"),
            ]
        );
    }

    #[test]
    fn test_entries_without_hash_are_skipped() {
        let tree = SourceTree::from_versions(vec![
            version("1.0", &["https://a/fix.patch"], None),
            version("1.1", &["https://a/x-1.1.zip"], Some("h")),
        ]);
        let entries: Vec<_> = tree.entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version, "1.1");
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(SourceTree::default().entries().count(), 0);
    }
}
