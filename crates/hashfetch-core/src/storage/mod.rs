//! Disk side of a download.
//!
//! Bytes land in a `.part` file next to the target and are renamed into
//! place only after their hash is verified, so the target path never holds
//! unverified content.

mod stage;

pub use stage::StagedFile;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the verified rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Suffix an archive is moved to while it is being unpacked.
pub const ARCHIVE_SUFFIX: &str = ".tmp";

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut o: OsString = path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}

/// Path for the staging file: appends `.part` to the final path (e.g. `head.mha` → `head.mha.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    with_suffix(final_path, TEMP_SUFFIX)
}

/// Path an archive occupies during extraction (`data.tar` → `data.tar.tmp`).
pub fn archive_temp_path(final_path: &Path) -> PathBuf {
    with_suffix(final_path, ARCHIVE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("file.iso"));
        assert_eq!(p.to_string_lossy(), "file.iso.part");
        let p2 = temp_path(Path::new("/tmp/POPI/meta/00-P.mhd"));
        assert_eq!(p2.to_string_lossy(), "/tmp/POPI/meta/00-P.mhd.part");
    }

    #[test]
    fn archive_temp_path_appends_tmp() {
        let p = archive_temp_path(Path::new("Data/CIRS057A_MR_CT_DICOM/readme.txt"));
        assert_eq!(p.to_string_lossy(), "Data/CIRS057A_MR_CT_DICOM/readme.txt.tmp");
    }
}
