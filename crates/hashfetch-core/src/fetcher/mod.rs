//! Resolve logical names to verified local files.
//!
//! For each name: reuse the cached file when present (re-hashing it when
//! `verify` is set), otherwise try every candidate URL in order until one
//! yields bytes with the manifest hash. Archive-flagged entries are unpacked
//! next to their target after a fresh download.

mod event;

pub use event::{FetchEvent, Observer};

use crate::archive;
use crate::checksum::{self, Checksum};
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::manifest::{Manifest, ManifestEntry};
use crate::sources::SourceSet;
use crate::storage::{archive_temp_path, StagedFile};
use crate::transport::{CurlTransport, Transport};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the manifest file [`fetch_data`] expects inside the cache directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Re-hash an already cached file and re-download it on mismatch.
    pub verify: bool,
    /// Download even when the target exists.
    pub force: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            verify: true,
            force: false,
        }
    }
}

pub struct Fetcher<T> {
    manifest: Manifest,
    output_dir: PathBuf,
    sources: SourceSet,
    transport: T,
    observer: Option<Observer>,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(manifest: Manifest, output_dir: &Path, sources: SourceSet, transport: T) -> Self {
        Fetcher {
            manifest,
            output_dir: output_dir.to_path_buf(),
            sources,
            transport,
            observer: None,
        }
    }

    /// Install a callback receiving every [`FetchEvent`].
    pub fn with_observer(mut self, observer: impl Fn(&FetchEvent<'_>) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn emit(&self, event: FetchEvent<'_>) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Candidate URLs for `name`, in the order they would be tried.
    pub fn candidate_urls(&self, name: &str) -> Result<Vec<String>, FetchError> {
        Ok(self.sources.candidate_urls(self.manifest.get(name)?))
    }

    /// Make `name` present and verified under the output directory and return its path.
    ///
    /// A cached file that fails verification is deleted and downloaded once
    /// more; that download is verified like any other, so a bad mirror can
    /// never satisfy the retry.
    pub fn fetch_one(&self, name: &str, opts: FetchOptions) -> Result<PathBuf, FetchError> {
        let entry = self.manifest.get(name)?;
        self.emit(FetchEvent::Fetching { name });
        let target = self.output_dir.join(name);

        let mut needs_download = opts.force || !target.exists();
        if !needs_download && opts.verify && !entry.archive {
            if !checksum::verify_path(&target, &entry.checksum)? {
                tracing::warn!(%name, path = %target.display(), "cached file has incorrect hash, downloading again");
                self.emit(FetchEvent::StaleCache {
                    name,
                    path: &target,
                });
                fs::remove_file(&target).map_err(|e| FetchError::io(&target, e))?;
                needs_download = true;
            } else {
                tracing::debug!(%name, "cached file verified");
            }
        }

        if needs_download {
            let urls = self.sources.candidate_urls(entry);
            if !self.download_first_verified(name, entry, &urls, &target) {
                tracing::error!(%name, ?urls, "no candidate produced a verified file");
                return Err(FetchError::DataFetch {
                    name: name.to_string(),
                    urls,
                });
            }
            if entry.archive {
                self.unpack_in_place(name, &target)?;
            }
        }

        Ok(target)
    }

    /// Fetch every manifest entry without forcing; the first failure aborts the run.
    pub fn fetch_all(&self, verify: bool) -> Result<Vec<PathBuf>, FetchError> {
        let opts = FetchOptions {
            verify,
            force: false,
        };
        let mut paths = Vec::with_capacity(self.manifest.len());
        for name in self.manifest.names() {
            paths.push(self.fetch_one(name, opts)?);
        }
        tracing::info!(count = paths.len(), dir = %self.output_dir.display(), "fetched all manifest entries");
        Ok(paths)
    }

    /// Try each URL until one yields bytes matching the manifest hash.
    /// Returns true once the verified file is at `target`.
    fn download_first_verified(
        &self,
        name: &str,
        entry: &ManifestEntry,
        urls: &[String],
        target: &Path,
    ) -> bool {
        for url in urls {
            self.emit(FetchEvent::Trying { name, url });
            match self.try_candidate(name, url, &entry.checksum, target) {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(%name, %url, "candidate failed: {:#}", e);
                }
            }
        }
        false
    }

    /// One candidate. `Ok(false)` means the transport failed or the hash did not
    /// match; in both cases the staging file is already gone.
    fn try_candidate(
        &self,
        name: &str,
        url: &str,
        expected: &Checksum,
        target: &Path,
    ) -> anyhow::Result<bool> {
        let mut stage = StagedFile::create(target)?;
        let downloaded = self.transport.download(url, &mut stage, &mut |progress| {
            self.emit(FetchEvent::Progress { url, progress })
        });
        let bytes = match downloaded {
            Ok(n) => n,
            Err(error) => {
                tracing::warn!(%name, %url, kind = ?error.kind(), "download failed: {}", error);
                self.emit(FetchEvent::TransportFailed {
                    name,
                    url,
                    error: &error,
                });
                return Ok(false);
            }
        };
        stage.finish_writing()?;

        let actual = checksum::hash_path(stage.temp_path(), expected.algorithm())?;
        if actual != *expected {
            tracing::warn!(%name, %url, %expected, %actual, "downloaded file has incorrect hash");
            self.emit(FetchEvent::HashMismatch {
                name,
                url,
                expected,
                actual: &actual,
            });
            return Ok(false);
        }

        let path = stage.commit()?;
        tracing::info!(%name, %url, bytes, "downloaded and verified");
        self.emit(FetchEvent::Downloaded {
            name,
            url,
            path: &path,
            bytes,
        });
        Ok(true)
    }

    /// Replace a freshly downloaded archive at `target` with its contents,
    /// extracted into the directory containing `target`.
    fn unpack_in_place(&self, name: &str, target: &Path) -> Result<(), FetchError> {
        let Some(format) = archive::detect(target) else {
            tracing::warn!(%name, path = %target.display(), "archive format not recognized, keeping file as is");
            self.emit(FetchEvent::ArchiveUnrecognized { name, path: target });
            return Ok(());
        };

        let dest = target.parent().unwrap_or(&self.output_dir);
        let tmp = archive_temp_path(target);
        fs::rename(target, &tmp).map_err(|e| FetchError::io(target, e))?;
        let unpacked = archive::unpack(&tmp, format, dest);
        if let Err(e) = fs::remove_file(&tmp) {
            tracing::warn!(path = %tmp.display(), "failed to remove unpacked archive: {}", e);
        }
        unpacked?;

        tracing::info!(%name, dest = %dest.display(), ?format, "unpacked archive");
        self.emit(FetchEvent::Unpacked { name, dest });
        if !target.exists() {
            tracing::warn!(%name, "archive does not contain {}; it will be downloaded again on the next run", name);
        }
        Ok(())
    }
}

impl Fetcher<CurlTransport> {
    /// Fetcher using libcurl, the configured mirrors, and object stores from
    /// `ExternalData_OBJECT_STORES` and the config file.
    pub fn from_config(manifest: Manifest, output_dir: &Path, cfg: &FetchConfig) -> Self {
        Fetcher::new(
            manifest,
            output_dir,
            SourceSet::from_env_and_config(cfg),
            CurlTransport::from_config(cfg),
        )
    }
}

/// Fetch `name` using the `manifest.json` stored inside `cache_dir` itself.
pub fn fetch_data(
    name: &str,
    cache_dir: &Path,
    verify: bool,
    cfg: &FetchConfig,
) -> Result<PathBuf, FetchError> {
    let manifest = Manifest::load(&cache_dir.join(MANIFEST_FILE_NAME))?;
    Fetcher::from_config(manifest, cache_dir, cfg).fetch_one(
        name,
        FetchOptions {
            verify,
            force: false,
        },
    )
}
