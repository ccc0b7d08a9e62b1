//! Build a manifest from the files already present in a directory.

use super::{Manifest, ManifestEntry};
use crate::checksum::{hash_path, HashAlgorithm};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Hash every regular file under `dir` (recursively) into a manifest keyed by
/// `/`-separated relative path. JSON files are skipped so a manifest stored
/// next to its data does not list itself.
pub fn generate(dir: &Path, algorithm: HashAlgorithm) -> Result<Manifest> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let mut entries = BTreeMap::new();
    collect(dir, dir, algorithm, &mut entries)?;
    tracing::info!(dir = %dir.display(), files = entries.len(), %algorithm, "generated manifest");
    Ok(Manifest::from_entries(entries))
}

fn collect(
    root: &Path,
    dir: &Path,
    algorithm: HashAlgorithm,
    out: &mut BTreeMap<String, ManifestEntry>,
) -> Result<()> {
    let read = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    for dirent in read {
        let dirent = dirent.with_context(|| format!("read dir {}", dir.display()))?;
        let path = dirent.path();
        let file_type = dirent.file_type()?;
        if file_type.is_dir() {
            collect(root, &path, algorithm, out)?;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} outside {}", path.display(), root.display()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let checksum = hash_path(&path, algorithm)?;
        tracing::debug!(%name, %checksum, "hashed");
        out.insert(
            name,
            ManifestEntry {
                checksum,
                url: None,
                archive: false,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_walks_nested_dirs_and_skips_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("POPI/meta")).unwrap();
        fs::write(dir.path().join("hello.txt"), b"hello\n").unwrap();
        fs::write(dir.path().join("POPI/meta/00-P.mhd"), b"ObjectType = Image\n").unwrap();
        fs::write(dir.path().join("manifest.json"), b"{}").unwrap();

        let m = generate(dir.path(), HashAlgorithm::Md5).unwrap();
        let names: Vec<&str> = m.names().collect();
        assert_eq!(names, vec!["POPI/meta/00-P.mhd", "hello.txt"]);
        assert_eq!(
            m.get("hello.txt").unwrap().checksum.hex(),
            "b1946ac92492d2347c6235b4d2611184"
        );
    }

    #[test]
    fn generate_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(generate(&dir.path().join("absent"), HashAlgorithm::Sha512).is_err());
    }
}
