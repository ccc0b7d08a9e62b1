//! Tracing setup for the CLI.
//!
//! Log lines go to `hashfetch.log` under the XDG state directory. Console
//! output (progress, warnings) is the CLI's job and is not routed through
//! the subscriber, so the file is the only place debug detail lands.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,hashfetch=debug,hashfetch_core=debug";
const LOG_FILE_NAME: &str = "hashfetch.log";

/// Hands each event a clone of the log file handle; stderr if cloning fails.
struct LogFile(File);

enum LogSink {
    File(File),
    Stderr(io::Stderr),
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr(e) => e.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => LogSink::File(f),
            Err(_) => LogSink::Stderr(io::stderr()),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Create `dir` if needed and open its log file for appending.
fn open_log_file(dir: &Path) -> Result<(PathBuf, File)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;
    Ok((path, file))
}

/// Log to `$XDG_STATE_HOME/hashfetch/hashfetch.log`.
/// Errors when the state directory is unusable so the caller can use [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let state_dir = xdg::BaseDirectories::with_prefix("hashfetch")?.get_state_home();
    let (path, file) = open_log_file(&state_dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(LogFile(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(log = %path.display(), "hashfetch logging initialized");
    Ok(())
}

/// Fallback subscriber writing to stderr. A subscriber already installed is left alone.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_created_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state/hashfetch");

        let (path, mut file) = open_log_file(&state).unwrap();
        assert_eq!(path, state.join("hashfetch.log"));
        writeln!(file, "first").unwrap();

        let (_, file) = open_log_file(&state).unwrap();
        let mut sink = LogFile(file).make_writer();
        writeln!(sink, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
