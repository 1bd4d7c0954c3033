//! Single-stream HTTP GET into a local file.
//!
//! libcurl picks the proxy from `http_proxy` / `https_proxy` / `all_proxy`
//! and honors `no_proxy`. Only an explicit `NetworkConfig::no_proxy`
//! replaces the exclusion list.

use crate::config::NetworkConfig;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Why a GET did not produce a complete body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (proxy refused, DNS, TLS, timeout, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed. Trying another source will not help.
    #[error("storage: {0}")]
    Storage(#[from] io::Error),
}

/// Downloads `url` into `dest` (created or truncated). Returns bytes written.
/// On error `dest` may hold a partial body; the caller owns cleanup.
pub fn fetch_to_file(url: &str, dest: &Path, net: &NetworkConfig) -> Result<u64, FetchError> {
    let mut file = File::create(dest)?;
    let mut written = 0u64;
    let mut storage_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(net.max_redirects)?;
    easy.useragent(&net.user_agent)?;
    easy.connect_timeout(net.connect_timeout())?;
    // Abort stalled transfers instead of relying on the hard timeout alone.
    easy.low_speed_limit(net.low_speed_limit)?;
    easy.low_speed_time(net.low_speed_time())?;
    easy.timeout(net.timeout())?;
    if let Some(hosts) = &net.no_proxy {
        easy.noproxy(hosts)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                storage_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if e.is_write_error() {
            if let Some(io_err) = storage_error.take() {
                return Err(FetchError::Storage(io_err));
            }
        }
        return Err(FetchError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    file.flush()?;
    file.sync_all()?;
    Ok(written)
}
