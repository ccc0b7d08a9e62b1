//! Fetch and fetch-all commands, with console progress output.

use anyhow::{Context, Result};
use hashfetch_core::config::FetchConfig;
use hashfetch_core::transport::{CurlTransport, Progress};
use hashfetch_core::{FetchEvent, FetchOptions, Fetcher, Manifest};
use std::cell::Cell;
use std::io::Write;
use std::path::Path;

/// Prints fetch progress the way a notebook user expects to see it.
#[derive(Default)]
struct ConsoleReporter {
    last_bytes: Cell<u64>,
}

impl ConsoleReporter {
    fn report(&self, event: &FetchEvent<'_>) {
        match event {
            FetchEvent::Fetching { name } => println!("Fetching {}", name),
            FetchEvent::Trying { .. } => self.last_bytes.set(0),
            FetchEvent::Progress { progress, .. } => self.progress(*progress),
            FetchEvent::TransportFailed { url, error, .. } => {
                self.end_line();
                eprintln!("warning: {} ({})", url, error);
            }
            FetchEvent::HashMismatch { url, expected, .. } => {
                self.end_line();
                eprintln!("warning: {} has incorrect hash value, {} was expected", url, expected);
            }
            FetchEvent::Downloaded { .. } => self.end_line(),
            FetchEvent::StaleCache { path, .. } => {
                eprintln!("warning: {} has incorrect hash value, downloading again", path.display())
            }
            FetchEvent::Unpacked { dest, .. } => println!("Unpacked into {}", dest.display()),
            FetchEvent::ArchiveUnrecognized { path, .. } => {
                eprintln!("warning: {} is not a tar or zip archive; left as is", path.display())
            }
        }
    }

    fn progress(&self, p: Progress) {
        if p.bytes_so_far == 0 || p.bytes_so_far == self.last_bytes.get() {
            return;
        }
        self.last_bytes.set(p.bytes_so_far);
        let mut out = std::io::stdout().lock();
        let _ = match p.total {
            Some(total) if total > 0 => write!(
                out,
                "\rDownloaded {} of {} bytes ({:.2}%)",
                p.bytes_so_far,
                total,
                p.bytes_so_far as f64 * 100.0 / total as f64
            ),
            _ => write!(out, "\rDownloaded {} bytes", p.bytes_so_far),
        };
        let _ = out.flush();
    }

    fn end_line(&self) {
        if self.last_bytes.replace(0) > 0 {
            println!();
        }
    }
}

fn console_fetcher(
    cfg: &FetchConfig,
    output_dir: &Path,
    manifest: &Path,
) -> Result<Fetcher<CurlTransport>> {
    let manifest = Manifest::load(manifest)?;
    let reporter = ConsoleReporter::default();
    Ok(Fetcher::from_config(manifest, output_dir, cfg).with_observer(move |e| reporter.report(e)))
}

/// Fetch every manifest entry into `output_dir`, stopping at the first failure.
pub fn run_fetch_all(cfg: &FetchConfig, output_dir: &Path, manifest: &Path, verify: bool) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let fetcher = console_fetcher(cfg, output_dir, manifest)?;
    let paths = fetcher.fetch_all(verify)?;
    println!("{} files available under {}", paths.len(), output_dir.display());
    Ok(())
}

pub fn run_fetch(
    cfg: &FetchConfig,
    name: &str,
    output_dir: &Path,
    manifest: &Path,
    verify: bool,
    force: bool,
) -> Result<()> {
    let fetcher = console_fetcher(cfg, output_dir, manifest)?;
    let path = fetcher.fetch_one(name, FetchOptions { verify, force })?;
    println!("{}", path.display());
    Ok(())
}
