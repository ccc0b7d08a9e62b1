//! Staging file for one candidate download.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// A `.part` file being filled by a transport. Dropped without [`commit`](Self::commit)
/// it removes itself, so a failed or rejected candidate leaves nothing behind.
pub struct StagedFile {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl StagedFile {
    /// Create (truncating) the staging file for `final_path`, creating parent directories.
    pub fn create(final_path: &Path) -> Result<Self> {
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(StagedFile {
            writer: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush buffered bytes and close the file so it can be hashed.
    pub fn finish_writing(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| e.into_error())
                .context("storage flush failed")?;
            file.sync_all().context("storage sync failed")?;
        }
        Ok(())
    }

    /// Rename the staging file onto the final path, replacing any previous file.
    pub fn commit(mut self) -> Result<PathBuf> {
        self.finish_writing()?;
        fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        Ok(std::mem::take(&mut self.final_path))
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "staging file already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // Committed stages have an empty final path; the temp file was renamed away.
        if self.final_path.as_os_str().is_empty() {
            return;
        }
        self.writer.take();
        if let Err(e) = fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.temp_path.display(), "failed to remove staging file: {}", e);
            }
        }
    }
}
