//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod fetch;
mod manifest;
mod urls;

pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use fetch::{run_fetch, run_fetch_all};
pub use manifest::run_manifest;
pub use urls::run_urls;
