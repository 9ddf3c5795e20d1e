//! Installation of cached assets onto the destination tree.
//!
//! Install only copies: it never fetches and never re-verifies. The cache
//! is never consumed or mutated here, so the same cached asset can be
//! installed to any number of destinations.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use thiserror::Error;

use crate::catalog::AssetEntry;
use crate::resolver;

/// Classified failure of a single asset install.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("not in cache")]
    NotCached,
    #[error("file error: {0}")]
    Filesystem(#[from] std::io::Error),
}

/// Copy one cached asset to its primary destination and every extra-copy
/// target, creating intermediate directories and preserving timestamps.
pub fn install_asset(
    entry: &AssetEntry,
    cache_root: &Path,
    dest_root: &Path,
) -> Result<(), InstallError> {
    let src = resolver::cache_path(entry, cache_root);
    if !src.is_file() {
        return Err(InstallError::NotCached);
    }

    let primary = resolver::dest_path(entry, dest_root);
    copy_preserving_times(&src, &primary)?;
    tracing::info!("installed {} -> {}", entry.filename, primary.display());

    for extra in resolver::extra_dest_paths(entry, dest_root) {
        copy_preserving_times(&src, &extra)?;
        tracing::info!("extra copy {} -> {}", entry.filename, extra.display());
    }

    Ok(())
}

fn copy_preserving_times(src: &Path, dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    let meta = fs::metadata(src)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(filename: &str, subdir: &str, extras: &[&str]) -> AssetEntry {
        AssetEntry {
            filename: filename.to_string(),
            system: "PlayStation".to_string(),
            md5: String::new(),
            required: true,
            subdir: subdir.to_string(),
            extra_copies: extras.iter().map(|s| s.to_string()).collect(),
            notes: String::new(),
        }
    }

    fn seed_cache(cache_root: &Path, entry: &AssetEntry, body: &[u8]) -> PathBuf {
        let path = resolver::cache_path(entry, cache_root);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn install_copies_to_primary_destination() {
        let cache = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let e = entry("scph1001.bin", "", &[]);
        seed_cache(cache.path(), &e, b"bios bytes");

        install_asset(&e, cache.path(), dest.path()).unwrap();

        let installed = dest.path().join("BIOS/scph1001.bin");
        assert_eq!(fs::read(installed).unwrap(), b"bios bytes");
    }

    #[test]
    fn install_creates_subdir_under_bios() {
        let cache = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let e = entry("neocd_f.rom", "neocd", &[]);
        seed_cache(cache.path(), &e, b"front loader");

        install_asset(&e, cache.path(), dest.path()).unwrap();

        assert_eq!(
            fs::read(dest.path().join("BIOS/neocd/neocd_f.rom")).unwrap(),
            b"front loader"
        );
    }

    #[test]
    fn install_fans_out_extra_copies() {
        let cache = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let e = entry(
            "neogeo.zip",
            "",
            &["Roms/NEOGEO/neogeo.zip", "Backup/neogeo.zip"],
        );
        seed_cache(cache.path(), &e, b"arcade bios");

        install_asset(&e, cache.path(), dest.path()).unwrap();

        for rel in ["BIOS/neogeo.zip", "Roms/NEOGEO/neogeo.zip", "Backup/neogeo.zip"] {
            assert_eq!(
                fs::read(dest.path().join(rel)).unwrap(),
                b"arcade bios",
                "missing or wrong copy at {rel}"
            );
        }
    }

    #[test]
    fn install_preserves_modification_time() {
        let cache = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let e = entry("gb_bios.bin", "", &[]);
        let src = seed_cache(cache.path(), &e, b"dmg");
        filetime::set_file_mtime(&src, FileTime::from_unix_time(1_000_000, 0)).unwrap();

        install_asset(&e, cache.path(), dest.path()).unwrap();

        let meta = fs::metadata(dest.path().join("BIOS/gb_bios.bin")).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), 1_000_000);
    }

    #[test]
    fn install_missing_cache_entry_is_not_cached() {
        let cache = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let e = entry("absent.bin", "", &[]);

        match install_asset(&e, cache.path(), dest.path()) {
            Err(InstallError::NotCached) => {}
            other => panic!("expected NotCached, got {other:?}"),
        }
        assert!(!dest.path().join("BIOS/absent.bin").exists());
    }

    #[test]
    fn install_overwrites_existing_destination() {
        let cache = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let e = entry("scph5500.bin", "", &[]);
        seed_cache(cache.path(), &e, b"new contents");
        fs::create_dir_all(dest.path().join("BIOS")).unwrap();
        fs::write(dest.path().join("BIOS/scph5500.bin"), b"old").unwrap();

        install_asset(&e, cache.path(), dest.path()).unwrap();

        assert_eq!(
            fs::read(dest.path().join("BIOS/scph5500.bin")).unwrap(),
            b"new contents"
        );
    }
}
