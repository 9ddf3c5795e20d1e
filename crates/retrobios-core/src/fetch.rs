//! One streaming download into the cache store.
//!
//! Each asset is fetched with a single GET (no ranges, no resume), written
//! to its cache path in the chunks libcurl delivers, then checked against
//! the catalog digest. Any failure (transport, HTTP status, filesystem,
//! verification) removes the partially written file, so a path in the
//! cache either holds a fully written body or nothing.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::catalog::AssetEntry;
use crate::checksum;
use crate::config::RetrobiosConfig;
use crate::resolver;

/// Classified failure of a single asset download. Converted to a
/// filename-tagged description at the batch boundary, never raised through
/// the orchestrator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("timed out: {0}")]
    Timeout(#[source] curl::Error),
    #[error("network error: {0}")]
    Transport(#[source] curl::Error),
    #[error("file error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("MD5 verification failed: expected {expected}, got {actual}")]
    Verification { expected: String, actual: String },
}

/// Download one asset into the cache, verifying its digest.
///
/// `on_progress` is advisory: `(filename, bytes_so_far, total_or_zero)`,
/// where a zero total means the response carried no `Content-Length`.
/// Returns the number of bytes written on success.
pub fn fetch_asset(
    entry: &AssetEntry,
    cfg: &RetrobiosConfig,
    cache_root: &Path,
    on_progress: Option<&dyn Fn(&str, u64, u64)>,
) -> Result<u64, FetchError> {
    let url = resolver::remote_url(entry, &cfg.base_url)?;
    let dest = resolver::cache_path(entry, cache_root);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    tracing::info!("downloading {} from {}", entry.filename, url);
    let written = match stream_to_file(&url, &dest, &entry.filename, cfg, on_progress) {
        Ok(n) => n,
        Err(e) => {
            discard_partial(&dest);
            return Err(e);
        }
    };

    if !entry.md5.is_empty() {
        let actual = match checksum::md5_path(&dest) {
            Ok(digest) => digest,
            Err(e) => {
                discard_partial(&dest);
                return Err(FetchError::Filesystem(e));
            }
        };
        if !actual.eq_ignore_ascii_case(&entry.md5) {
            discard_partial(&dest);
            tracing::warn!(
                "MD5 mismatch for {}: expected {}, got {}",
                entry.filename,
                entry.md5,
                actual
            );
            return Err(FetchError::Verification {
                expected: entry.md5.to_lowercase(),
                actual,
            });
        }
    }

    tracing::info!("downloaded and verified {} ({} bytes)", entry.filename, written);
    Ok(written)
}

/// Perform the GET, writing the body sequentially to `dest`.
fn stream_to_file(
    url: &Url,
    dest: &Path,
    filename: &str,
    cfg: &RetrobiosConfig,
    on_progress: Option<&dyn Fn(&str, u64, u64)>,
) -> Result<u64, FetchError> {
    let file = RefCell::new(File::create(dest)?);
    let write_error: RefCell<Option<std::io::Error>> = RefCell::new(None);
    let written = Cell::new(0u64);

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str()).map_err(FetchError::Transport)?;
    easy.follow_location(true).map_err(FetchError::Transport)?;
    easy.max_redirections(10).map_err(FetchError::Transport)?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .map_err(FetchError::Transport)?;
    easy.timeout(Duration::from_secs(cfg.network_timeout_secs))
        .map_err(FetchError::Transport)?;
    if on_progress.is_some() {
        easy.progress(true).map_err(FetchError::Transport)?;
    }

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                if let Err(e) = file.borrow_mut().write_all(data) {
                    *write_error.borrow_mut() = Some(e);
                    return Ok(0); // abort transfer
                }
                written.set(written.get() + data.len() as u64);
                Ok(data.len())
            })
            .map_err(FetchError::Transport)?;
        if let Some(cb) = on_progress {
            transfer
                .progress_function(|dltotal, dlnow, _, _| {
                    cb(filename, dlnow as u64, dltotal as u64);
                    true
                })
                .map_err(FetchError::Transport)?;
        }
        transfer.perform()
    };

    if let Some(e) = write_error.borrow_mut().take() {
        return Err(FetchError::Filesystem(e));
    }
    if let Err(e) = perform_result {
        return Err(classify_curl(e));
    }

    let code = easy.response_code().map_err(FetchError::Transport)?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(written.get())
}

fn classify_curl(e: curl::Error) -> FetchError {
    if e.is_operation_timedout() {
        FetchError::Timeout(e)
    } else {
        FetchError::Transport(e)
    }
}

/// Remove a file left behind by a failed fetch. Missing files are fine;
/// anything else is logged and otherwise ignored.
fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!("could not remove partial file {}: {}", path.display(), e);
        }
    }
}
