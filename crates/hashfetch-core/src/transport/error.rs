//! Transport error type and its classification for log messages.

use thiserror::Error;

/// Why a single candidate URL failed. Never fatal on its own: the fetcher
/// moves on to the next candidate.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, missing file:// path, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the received bytes failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure class, recorded in logs so a dead mirror, a missing object,
/// and missing connectivity can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Connection,
    NotFound,
    Http(u32),
    Storage,
    Other,
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Curl(e) => classify_curl_error(e),
            TransportError::Http(code) => classify_http_status(*code),
            TransportError::Io(_) => ErrorKind::Storage,
        }
    }
}

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        404 | 410 => ErrorKind::NotFound,
        _ => ErrorKind::Http(code),
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_file_couldnt_read_file() {
        return ErrorKind::NotFound;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}
