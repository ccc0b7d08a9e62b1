//! Container detection and extraction for archive-flagged entries.
//!
//! The format is sniffed by trying to list the container: the tar family
//! first (plain, then gzip-compressed), then zip. A file none of them can
//! list is not an archive and stays where it is.

use crate::error::FetchError;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar(Compression),
    Zip,
}

fn open(path: &Path) -> io::Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

fn tar_reader(path: &Path, compression: Compression) -> io::Result<Box<dyn Read>> {
    let reader = open(path)?;
    let reader: Box<dyn Read> = match compression {
        Compression::None => Box::new(reader),
        Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
    };
    Ok(reader)
}

fn list_tar(path: &Path, compression: Compression) -> io::Result<Vec<PathBuf>> {
    let mut archive = tar::Archive::new(tar_reader(path, compression)?);
    let mut members = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        members.push(entry.path()?.into_owned());
    }
    if members.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "no tar entries"));
    }
    Ok(members)
}

fn list_zip(path: &Path) -> zip::result::ZipResult<Vec<PathBuf>> {
    let zip = zip::ZipArchive::new(open(path)?)?;
    Ok(zip.file_names().map(PathBuf::from).collect())
}

/// Identify the container format of `path`, or `None` when it is not an archive.
pub fn detect(path: &Path) -> Option<ArchiveFormat> {
    for compression in [Compression::None, Compression::Gzip] {
        match list_tar(path, compression) {
            Ok(_) => return Some(ArchiveFormat::Tar(compression)),
            Err(e) => tracing::trace!(path = %path.display(), ?compression, "not a tar: {}", e),
        }
    }
    match list_zip(path) {
        Ok(_) => Some(ArchiveFormat::Zip),
        Err(e) => {
            tracing::trace!(path = %path.display(), "not a zip: {}", e);
            None
        }
    }
}

/// Extract every member of `path` under `dest_dir`. Members that would land
/// outside `dest_dir` are refused by the archive readers.
pub fn unpack(path: &Path, format: ArchiveFormat, dest_dir: &Path) -> Result<(), FetchError> {
    let archive_err = |reason: String| FetchError::Archive {
        path: path.to_path_buf(),
        reason,
    };
    std::fs::create_dir_all(dest_dir).map_err(|e| FetchError::io(dest_dir, e))?;
    match format {
        ArchiveFormat::Tar(compression) => {
            let reader = tar_reader(path, compression).map_err(|e| archive_err(e.to_string()))?;
            let mut archive = tar::Archive::new(reader);
            archive.set_preserve_permissions(false);
            archive.set_unpack_xattrs(false);
            archive
                .unpack(dest_dir)
                .map_err(|e| archive_err(e.to_string()))?;
        }
        ArchiveFormat::Zip => {
            let reader = open(path).map_err(|e| archive_err(e.to_string()))?;
            let mut zip =
                zip::ZipArchive::new(reader).map_err(|e| archive_err(e.to_string()))?;
            zip.extract(dest_dir)
                .map_err(|e| archive_err(e.to_string()))?;
        }
    }
    tracing::debug!(archive = %path.display(), dest = %dest_dir.display(), ?format, "unpacked");
    Ok(())
}
