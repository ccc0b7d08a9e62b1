//! Manifest command: describe an existing data directory as a manifest.

use anyhow::{Context, Result};
use hashfetch_core::checksum::HashAlgorithm;
use hashfetch_core::manifest;
use std::path::Path;

pub fn run_manifest(dir: &Path, output: &Path, algo: HashAlgorithm) -> Result<()> {
    let m = manifest::generate(dir, algo)?;
    let json = m.to_json_string()?;
    std::fs::write(output, json + "\n")
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote {} entries to {}", m.len(), output.display());
    Ok(())
}
