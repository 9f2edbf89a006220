//! Metadata document loading.
//!
//! Reads a `conandata.yml`-style document and normalizes its `sources` section
//! into a [`SourceTree`]: an ordered list of versions, each with one or more
//! download URLs and an optional content hash. Structural problems with the
//! document as a whole are fatal; problems with a single version entry are
//! not, and the entry is dropped.

use crate::config::DocumentConfig;
use crate::{AuditError, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The declared sources of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSources {
    pub version: String,
    /// One or more mirrors, in declaration order.
    pub urls: Vec<String>,
    pub sha256: Option<String>,
}

/// Normalized `version -> {url, sha256}` tree in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    versions: Vec<VersionSources>,
}

impl SourceTree {
    /// Build a tree directly from already-normalized versions.
    pub fn from_versions(versions: Vec<VersionSources>) -> Self {
        Self { versions }
    }

    /// Parse the YAML text of a whole metadata document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(text)?;
        let root = root
            .as_mapping()
            .ok_or_else(|| AuditError::malformed("document root is not a mapping"))?;
        let sources = root
            .get(DocumentConfig::SOURCES_KEY)
            .and_then(Value::as_mapping)
            .ok_or_else(|| {
                AuditError::malformed(format!(
                    "missing `{}` mapping",
                    DocumentConfig::SOURCES_KEY
                ))
            })?;
        Ok(Self::from_mapping(sources))
    }

    /// Normalize a `sources` mapping, dropping entries that do not fit the schema.
    pub fn from_mapping(sources: &Mapping) -> Self {
        let versions = sources
            .iter()
            .filter_map(|(key, body)| {
                let parsed = parse_version(key, body);
                if parsed.is_none() {
                    debug!("Skipping malformed source entry {:?}", key);
                }
                parsed
            })
            .collect();
        Self { versions }
    }

    pub fn versions(&self) -> &[VersionSources] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

fn parse_version(key: &Value, body: &Value) -> Option<VersionSources> {
    // Unquoted keys arrive as numbers. Integers print back exactly; floats do
    // not (`1.10` reads as `1.1`), so those entries are dropped.
    let version = match key {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
        Value::Number(n) => {
            warn!("version key {} is not quoted and cannot be read reliably, skipping", n);
            return None;
        }
        _ => return None,
    };
    let body = body.as_mapping()?;

    let urls = match body.get("url")? {
        Value::String(url) => vec![url.clone()],
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => return None,
    };
    if urls.is_empty() {
        return None;
    }

    let sha256 = body
        .get("sha256")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Some(VersionSources {
        version,
        urls,
        sha256,
    })
}

/// Resolve the document path from a user-supplied file or directory.
pub fn resolve_document_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_dir() {
        return path.join(DocumentConfig::FILE_NAME);
    }
    path.to_path_buf()
}

/// Load and normalize the metadata document at `path`.
pub fn load_document(path: impl AsRef<Path>) -> Result<SourceTree> {
    let path = resolve_document_path(path);
    debug!("Loading metadata document {}", path.display());
    let text = std::fs::read_to_string(&path).map_err(|e| AuditError::io_with_path(e, &path))?;
    SourceTree::from_yaml_str(&text)
}
