//! Manifest: catalog mapping logical file names to content hashes.
//!
//! Loaded once per invocation and treated as read-only. Keys are
//! `/`-separated relative paths; they are placed under the output directory
//! as-is, so absolute paths and `..` components are rejected at load time.

mod generate;
mod parse;

pub use generate::generate;

use crate::checksum::Checksum;
use crate::error::FetchError;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use parse::RawEntry;

/// One manifest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Expected digest of the downloaded artifact (of the archive itself when `archive` is set).
    pub checksum: Checksum,
    /// Explicit source URL; when set, mirrors and object stores are not consulted.
    pub url: Option<String>,
    /// Downloaded artifact is a container to unpack after verification.
    pub archive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Manifest {
    path: PathBuf,
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Manifest, FetchError> {
        let data = std::fs::read_to_string(path).map_err(|e| FetchError::io(path, e))?;
        let mut manifest = Self::from_json_str(&data).map_err(|e| match e {
            FetchError::ManifestParse { reason, .. } => FetchError::ManifestParse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        manifest.path = path.to_path_buf();
        tracing::debug!(
            manifest = %path.display(),
            entries = manifest.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest JSON that did not come from a file (path reported as `<inline>`).
    pub fn from_json_str(data: &str) -> Result<Manifest, FetchError> {
        let inline = PathBuf::from("<inline>");
        let parse_err = |reason: String| FetchError::ManifestParse {
            path: inline.clone(),
            reason,
        };
        let raw: BTreeMap<String, RawEntry> =
            serde_json::from_str(data).map_err(|e| parse_err(e.to_string()))?;
        let mut entries = BTreeMap::new();
        for (name, raw_entry) in raw {
            validate_name(&name).map_err(|r| parse_err(format!("{}: {}", name, r)))?;
            let entry = raw_entry
                .into_entry()
                .map_err(|r| parse_err(format!("{}: {}", name, r)))?;
            entries.insert(name, entry);
        }
        Ok(Manifest {
            path: inline,
            entries,
        })
    }

    /// Build a manifest in memory (e.g. from [`generate`]).
    pub fn from_entries(entries: BTreeMap<String, ManifestEntry>) -> Manifest {
        Manifest {
            path: PathBuf::from("<inline>"),
            entries,
        }
    }

    /// Look up a logical name. Missing keys are [`FetchError::ManifestKey`].
    pub fn get(&self, name: &str) -> Result<&ManifestEntry, FetchError> {
        self.entries.get(name).ok_or_else(|| FetchError::ManifestKey {
            name: name.to_string(),
            manifest: self.path.clone(),
        })
    }

    /// Logical names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON in the same format [`Manifest::load`] accepts.
    pub fn to_json_string(&self) -> Result<String, FetchError> {
        let raw: BTreeMap<&str, RawEntry> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), RawEntry::from_entry(v)))
            .collect();
        serde_json::to_string_pretty(&raw).map_err(|e| FetchError::ManifestParse {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("empty file name");
    }
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err("'..' is not allowed in file names"),
            Component::RootDir | Component::Prefix(_) => {
                return Err("file names must be relative")
            }
        }
    }
    Ok(())
}
