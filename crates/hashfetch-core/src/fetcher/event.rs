//! Progress and warning notifications emitted while fetching.

use crate::checksum::Checksum;
use crate::transport::{Progress, TransportError};
use std::path::Path;

/// Something the user may want to see. Non-fatal conditions (hash mismatch,
/// failed candidate, unrecognized archive) are reported only here and in the log.
#[derive(Debug)]
pub enum FetchEvent<'a> {
    Fetching {
        name: &'a str,
    },
    Trying {
        name: &'a str,
        url: &'a str,
    },
    Progress {
        url: &'a str,
        progress: Progress,
    },
    TransportFailed {
        name: &'a str,
        url: &'a str,
        error: &'a TransportError,
    },
    HashMismatch {
        name: &'a str,
        url: &'a str,
        expected: &'a Checksum,
        actual: &'a Checksum,
    },
    Downloaded {
        name: &'a str,
        url: &'a str,
        path: &'a Path,
        bytes: u64,
    },
    /// A cached file failed verification and is being downloaded again.
    StaleCache {
        name: &'a str,
        path: &'a Path,
    },
    Unpacked {
        name: &'a str,
        dest: &'a Path,
    },
    ArchiveUnrecognized {
        name: &'a str,
        path: &'a Path,
    },
}

/// Receives [`FetchEvent`]s.
pub type Observer = Box<dyn Fn(&FetchEvent<'_>)>;
