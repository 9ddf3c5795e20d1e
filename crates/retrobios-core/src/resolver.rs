//! Path resolution: remote URL, cache path, and destination path(s) for a
//! catalog entry.
//!
//! The cache mirrors the destination's BIOS tree: `cacheRoot/[subdir/]file`
//! corresponds to `destRoot/BIOS/[subdir/]file`. Extra copies are arbitrary
//! relative paths under the destination root.

use std::path::{Path, PathBuf};
use url::Url;

use crate::catalog::{repo_path_for_system, AssetEntry};

/// Directory under the destination root that receives primary installs.
pub const BIOS_DIR: &str = "BIOS";

/// Remote URL for an entry: the base joined with the system subpath and
/// filename. The URL parser percent-encodes path characters (spaces etc.)
/// while preserving slashes.
pub fn remote_url(entry: &AssetEntry, base_url: &str) -> Result<Url, url::ParseError> {
    let base = Url::parse(base_url)?;
    base.join(&format!(
        "{}{}",
        repo_path_for_system(&entry.system),
        entry.filename
    ))
}

/// Local cache path: `cache_root/[subdir/]filename`.
pub fn cache_path(entry: &AssetEntry, cache_root: &Path) -> PathBuf {
    cache_root.join(entry.relative_path())
}

/// Primary destination path: `dest_root/BIOS/[subdir/]filename`.
pub fn dest_path(entry: &AssetEntry, dest_root: &Path) -> PathBuf {
    dest_root.join(BIOS_DIR).join(entry.relative_path())
}

/// Destination paths for the entry's extra copies, in catalog order.
pub fn extra_dest_paths(entry: &AssetEntry, dest_root: &Path) -> Vec<PathBuf> {
    entry
        .extra_copies
        .iter()
        .map(|extra| dest_root.join(extra))
        .collect()
}
