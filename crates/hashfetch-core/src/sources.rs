//! Candidate URL synthesis for a manifest entry.
//!
//! An entry with an explicit `url` has exactly one candidate. Otherwise the
//! candidates are the local object stores (as `file://` URLs) followed by the
//! mirror templates, in that order.

use crate::checksum::Checksum;
use crate::config::FetchConfig;
use crate::manifest::ManifestEntry;
use std::path::{Path, PathBuf};

/// `;`-separated list of local object-store roots (CMake ExternalData layout).
pub const OBJECT_STORES_ENV: &str = "ExternalData_OBJECT_STORES";

/// Where content-addressed files may be found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    pub object_stores: Vec<PathBuf>,
    pub mirrors: Vec<String>,
}

impl SourceSet {
    /// Object stores from the environment first, then those from the config file.
    pub fn from_env_and_config(cfg: &FetchConfig) -> Self {
        let env = std::env::var(OBJECT_STORES_ENV).unwrap_or_default();
        Self::from_parts(&env, cfg)
    }

    /// Same as [`from_env_and_config`](Self::from_env_and_config) with the
    /// `ExternalData_OBJECT_STORES` value passed in.
    pub fn from_parts(env_stores: &str, cfg: &FetchConfig) -> Self {
        let mut object_stores = parse_object_stores(env_stores);
        object_stores.extend(cfg.object_stores.iter().cloned());
        if !object_stores.is_empty() {
            tracing::debug!(?object_stores, "using local object stores");
        }
        SourceSet {
            object_stores,
            mirrors: cfg.mirrors.clone(),
        }
    }

    /// Ordered candidate URLs for `entry`.
    pub fn candidate_urls(&self, entry: &ManifestEntry) -> Vec<String> {
        if let Some(url) = &entry.url {
            return vec![url.clone()];
        }
        let mut urls: Vec<String> = self
            .object_stores
            .iter()
            .filter_map(|root| object_store_url(root, &entry.checksum))
            .collect();
        urls.extend(
            self.mirrors
                .iter()
                .map(|t| expand_template(t, &entry.checksum)),
        );
        urls
    }
}

/// Split a `;`-separated list, skipping empty segments.
pub fn parse_object_stores(value: &str) -> Vec<PathBuf> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Substitute `%(hash)`, `%(algo)` (uppercase, e.g. `SHA512`) and `%(algo_lower)`.
pub fn expand_template(template: &str, checksum: &Checksum) -> String {
    template
        .replace("%(hash)", checksum.hex())
        .replace("%(algo_lower)", checksum.algorithm().id())
        .replace("%(algo)", checksum.algorithm().store_dir())
}

/// `file://<root>/<ALGO>/<hash>`; relative roots are resolved against the current directory.
fn object_store_url(root: &Path, checksum: &Checksum) -> Option<String> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(root)
    };
    let path = root
        .join(checksum.algorithm().store_dir())
        .join(checksum.hex());
    match url::Url::from_file_path(&path) {
        Ok(u) => Some(u.to_string()),
        Err(()) => {
            tracing::warn!(store = %root.display(), "object store path cannot be expressed as a file URL");
            None
        }
    }
}
