//! Single-stream GET through libcurl.
//!
//! One easy handle per candidate; the body is written sequentially to the
//! caller's writer. `file://` URLs go through the same path, which is how
//! local object stores are read.

use super::{Progress, Transport, TransportError};
use crate::config::FetchConfig;
use std::io::Write;
use std::time::Duration;

/// Curl settings applied to every transfer.
#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    pub connect_timeout: Duration,
    /// Abort when throughput stays below 1 KiB/s this long. `None` disables the check.
    pub low_speed_time: Option<Duration>,
    pub max_redirections: u32,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        CurlTransport {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_time: (cfg.low_speed_time_secs > 0)
                .then(|| Duration::from_secs(cfg.low_speed_time_secs)),
            max_redirections: 10,
        }
    }
}

impl Transport for CurlTransport {
    fn download(
        &self,
        url: &str,
        out: &mut dyn Write,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<u64, TransportError> {
        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(t) = self.low_speed_time {
            easy.low_speed_limit(1024)?;
            easy.low_speed_time(t)?;
        }
        easy.progress(true)?;

        let perform_result = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("download write failed: {}", e);
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.progress_function(|dltotal, dlnow, _, _| {
                progress(Progress {
                    bytes_so_far: dlnow as u64,
                    total: (dltotal > 0.0).then_some(dltotal as u64),
                });
                true
            })?;
            transfer.perform()
        };

        if let Err(e) = perform_result {
            if e.is_write_error() {
                if let Some(io_err) = write_error.take() {
                    return Err(TransportError::Io(io_err));
                }
            }
            return Err(TransportError::Curl(e));
        }

        // file:// transfers report 0.
        let code = easy.response_code()?;
        if code != 0 && !(200..300).contains(&code) {
            return Err(TransportError::Http(code));
        }

        out.flush()?;
        Ok(written)
    }
}
