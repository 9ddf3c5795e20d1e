//! Batch orchestration: best-effort fetch and install across the catalog.
//!
//! Entries are processed strictly in catalog order, one at a time. A
//! single entry's failure never halts the batch; every entry is attempted
//! and the outcome lands in a [`BatchResult`]. The orchestrator itself
//! fails only for conditions outside any single asset, e.g. a cache root
//! that cannot be created.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::catalog::Catalog;
use crate::checksum;
use crate::config::RetrobiosConfig;
use crate::control::CancelToken;
use crate::fetch;
use crate::install;
use crate::resolver;

/// Per-batch progress callback: `(fraction in [0, 1], status text)`.
/// Advisory only; must be cheap and must not be used for control flow.
pub type BatchProgress<'a> = &'a dyn Fn(f64, &str);

/// Per-file progress callback: `(filename, bytes so far, total or 0)`.
pub type FileProgress<'a> = &'a dyn Fn(&str, u64, u64);

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Process only entries marked required.
    pub required_only: bool,
    /// Fetch only: trust and reuse cache files that pass verification,
    /// making repeated batch-fetch calls idempotent.
    pub skip_cached: bool,
}

/// Outcome of one batch call. Produced fresh per call, never persisted.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// True iff nothing failed and the run was not cancelled.
    pub overall: bool,
    /// Filenames that succeeded, in catalog order.
    pub succeeded: Vec<String>,
    /// `"filename: reason"` strings for entries that failed, in catalog order.
    pub failed: Vec<String>,
    /// True when a [`CancelToken`] stopped the run early; entries never
    /// attempted appear in neither list.
    pub cancelled: bool,
}

/// One row of a read-only coverage scan.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub filename: String,
    pub system: String,
    pub required: bool,
    pub present: bool,
}

/// Download every selected catalog entry into the cache.
///
/// With `skip_cached`, an existing cache file that passes verification
/// counts as succeeded with zero network access. Hard-fails only when the
/// cache root cannot be created.
pub fn fetch_all(
    catalog: &Catalog,
    cfg: &RetrobiosConfig,
    cache_root: &Path,
    opts: BatchOptions,
    on_batch: Option<BatchProgress<'_>>,
    on_file: Option<FileProgress<'_>>,
    cancel: Option<&CancelToken>,
) -> Result<BatchResult> {
    fs::create_dir_all(cache_root)
        .with_context(|| format!("create cache directory {}", cache_root.display()))?;

    let files = catalog.selected(opts.required_only);
    let total = files.len().max(1);
    let mut result = BatchResult::default();

    for (idx, entry) in files.iter().enumerate() {
        let fraction = idx as f64 / total as f64;
        if is_cancelled(cancel) {
            tracing::info!("fetch cancelled after {} of {} entries", idx, files.len());
            report(on_batch, fraction, "Cancelled");
            result.cancelled = true;
            break;
        }

        if opts.skip_cached {
            let cached = resolver::cache_path(entry, cache_root);
            if cached.is_file() && checksum::verify_file(&cached, &entry.md5).unwrap_or(false) {
                report(on_batch, fraction, &format!("Cached: {}", entry.filename));
                result.succeeded.push(entry.filename.clone());
                tracing::info!("skipping {} (already cached and verified)", entry.filename);
                continue;
            }
        }

        report(on_batch, fraction, &format!("Downloading: {}", entry.filename));
        match fetch::fetch_asset(entry, cfg, cache_root, on_file) {
            Ok(_) => result.succeeded.push(entry.filename.clone()),
            Err(e) => {
                tracing::error!("failed to download {}: {}", entry.filename, e);
                result.failed.push(format!("{}: {}", entry.filename, e));
            }
        }
    }

    if !result.cancelled {
        report(on_batch, 1.0, "Download complete");
    }
    result.overall = result.failed.is_empty() && !result.cancelled;
    Ok(result)
}

/// Copy every selected cached entry onto the destination tree.
///
/// Never fetches: an entry missing from the cache fails with "not in
/// cache". Hard-fails only when the destination BIOS directory cannot be
/// created.
pub fn install_all(
    catalog: &Catalog,
    cache_root: &Path,
    dest_root: &Path,
    opts: BatchOptions,
    on_batch: Option<BatchProgress<'_>>,
    cancel: Option<&CancelToken>,
) -> Result<BatchResult> {
    let bios_dir = dest_root.join(resolver::BIOS_DIR);
    fs::create_dir_all(&bios_dir)
        .with_context(|| format!("create destination directory {}", bios_dir.display()))?;

    let files = catalog.selected(opts.required_only);
    let total = files.len().max(1);
    let mut result = BatchResult::default();

    for (idx, entry) in files.iter().enumerate() {
        let fraction = idx as f64 / total as f64;
        if is_cancelled(cancel) {
            tracing::info!("install cancelled after {} of {} entries", idx, files.len());
            report(on_batch, fraction, "Cancelled");
            result.cancelled = true;
            break;
        }

        report(on_batch, fraction, &format!("Installing: {}", entry.filename));
        match install::install_asset(entry, cache_root, dest_root) {
            Ok(()) => result.succeeded.push(entry.filename.clone()),
            Err(e) => {
                tracing::warn!("failed to install {}: {}", entry.filename, e);
                result.failed.push(format!("{}: {}", entry.filename, e));
            }
        }
    }

    if !result.cancelled {
        report(on_batch, 1.0, "Installation complete");
    }
    result.overall = result.failed.is_empty() && !result.cancelled;
    Ok(result)
}

/// Report, per catalog entry, whether its cache file currently exists.
/// Read-only; never mutates.
pub fn scan_cache(catalog: &Catalog, cache_root: &Path) -> Vec<ScanEntry> {
    catalog
        .entries()
        .iter()
        .map(|entry| ScanEntry {
            filename: entry.filename.clone(),
            system: entry.system.clone(),
            required: entry.required,
            present: resolver::cache_path(entry, cache_root).is_file(),
        })
        .collect()
}

/// Report, per catalog entry, whether its primary destination file exists.
/// Read-only; never mutates.
pub fn scan_dest(catalog: &Catalog, dest_root: &Path) -> Vec<ScanEntry> {
    catalog
        .entries()
        .iter()
        .map(|entry| ScanEntry {
            filename: entry.filename.clone(),
            system: entry.system.clone(),
            required: entry.required,
            present: resolver::dest_path(entry, dest_root).is_file(),
        })
        .collect()
}

fn report(cb: Option<BatchProgress<'_>>, fraction: f64, status: &str) {
    if let Some(cb) = cb {
        cb(fraction, status);
    }
}

fn is_cancelled(cancel: Option<&CancelToken>) -> bool {
    cancel.map_or(false, CancelToken::is_cancelled)
}
