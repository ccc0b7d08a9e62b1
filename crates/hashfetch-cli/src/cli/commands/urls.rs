//! Urls command: show candidate sources for one manifest entry.

use anyhow::Result;
use hashfetch_core::config::FetchConfig;
use hashfetch_core::{Fetcher, Manifest};
use std::path::Path;

pub fn run_urls(cfg: &FetchConfig, name: &str, manifest: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest)?;
    // Output dir is irrelevant for URL synthesis.
    let fetcher = Fetcher::from_config(manifest, Path::new("."), cfg);
    for url in fetcher.candidate_urls(name)? {
        println!("{}", url);
    }
    Ok(())
}
