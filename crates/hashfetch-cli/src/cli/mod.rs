//! CLI for the hashfetch data fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hashfetch_core::checksum::HashAlgorithm;
use hashfetch_core::config;
use std::path::PathBuf;

use commands::{
    run_checksum, run_completions, run_fetch, run_fetch_all, run_man, run_manifest, run_urls,
};

/// Top-level CLI for hashfetch.
#[derive(Debug, Parser)]
#[command(name = "hashfetch")]
#[command(
    about = "hashfetch: download checksum-verified data files described by a JSON manifest",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every file listed in the manifest into OUTPUT_DIR.
    FetchAll {
        /// Directory the files are placed under (created if missing).
        output_dir: PathBuf,
        /// Path to manifest.json.
        manifest: PathBuf,
        /// Do not re-hash files that are already present.
        #[arg(long)]
        no_verify: bool,
    },

    /// Fetch a single file by its manifest name.
    Fetch {
        /// Logical file name (manifest key), e.g. "POPI/meta/00-P.mhd".
        name: String,
        output_dir: PathBuf,
        manifest: PathBuf,
        #[arg(long)]
        no_verify: bool,
        /// Download even if the file is already present.
        #[arg(long)]
        force: bool,
    },

    /// Print the URLs that would be tried for a file, in order, without downloading.
    Urls {
        name: String,
        manifest: PathBuf,
    },

    /// Compute the digest of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
        /// md5, sha256 or sha512.
        #[arg(long, default_value = "sha256")]
        algo: HashAlgorithm,
    },

    /// Hash every file under DIR and write a manifest to OUTPUT.
    Manifest {
        dir: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "sha512")]
        algo: HashAlgorithm,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::FetchAll {
                output_dir,
                manifest,
                no_verify,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch_all(&cfg, &output_dir, &manifest, cfg.verify && !no_verify)?;
            }
            CliCommand::Fetch {
                name,
                output_dir,
                manifest,
                no_verify,
                force,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch(&cfg, &name, &output_dir, &manifest, cfg.verify && !no_verify, force)?;
            }
            CliCommand::Urls { name, manifest } => {
                let cfg = config::load_or_init()?;
                run_urls(&cfg, &name, &manifest)?;
            }
            CliCommand::Checksum { path, algo } => run_checksum(&path, algo)?,
            CliCommand::Manifest { dir, output, algo } => run_manifest(&dir, &output, algo)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
