pub mod config;
pub mod logging;

pub mod archive;
pub mod checksum;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod sources;
pub mod storage;
pub mod transport;

pub use error::FetchError;
pub use fetcher::{fetch_data, FetchEvent, FetchOptions, Fetcher};
pub use manifest::{Manifest, ManifestEntry};
