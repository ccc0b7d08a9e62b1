//! Checksum command: compute the digest of a file.

use anyhow::Result;
use hashfetch_core::checksum::{self, HashAlgorithm};
use std::path::Path;

/// Compute and print the digest of the given file.
pub fn run_checksum(path: &Path, algo: HashAlgorithm) -> Result<()> {
    let digest = checksum::hash_path(path, algo)?;
    println!("{}  {}", digest.hex(), path.display());
    Ok(())
}
