//! Byte transports: fetch the body behind one candidate URL.
//!
//! The fetcher only sees the [`Transport`] trait, so the candidate list is a
//! plain ordered sequence of URLs tried until one yields verified bytes.

mod easy;
mod error;

pub use easy::CurlTransport;
pub use error::{classify_curl_error, classify_http_status, ErrorKind, TransportError};

use std::io::Write;

/// Download progress for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub bytes_so_far: u64,
    /// Total size when the server announced one.
    pub total: Option<u64>,
}

pub trait Transport {
    /// Write the body behind `url` to `out`, returning the number of bytes written.
    fn download(
        &self,
        url: &str,
        out: &mut dyn Write,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<u64, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn download(
        &self,
        url: &str,
        out: &mut dyn Write,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<u64, TransportError> {
        (**self).download(url, out, progress)
    }
}
