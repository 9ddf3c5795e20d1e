//! The asset catalog: which support files exist, where they live remotely,
//! and how they are laid out in the cache and on the destination card.
//!
//! The catalog is an immutable ordered table constructed once at startup
//! (builtin or loaded from TOML) and passed explicitly into the fetch,
//! install, and batch layers. Order defines batch processing order and
//! progress denominators.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One catalog record describing a required or optional support file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// File name, unique within its subdirectory.
    pub filename: String,
    /// Owning system tag; selects the remote subpath (see [`repo_path_for_system`]).
    pub system: String,
    /// Expected MD5 digest, hex. Empty means "unverifiable, trust
    /// unconditionally".
    #[serde(default)]
    pub md5: String,
    /// Whether the file is required for a working installation.
    pub required: bool,
    /// Subdirectory used both in the cache and in the destination layout.
    /// Empty means the file sits directly under the root.
    #[serde(default)]
    pub subdir: String,
    /// Destination-relative paths for additional copies beyond the primary
    /// location (full relative paths, not bare filenames).
    #[serde(default)]
    pub extra_copies: Vec<String>,
    /// Free-text notes (provenance, regional variant, caveats).
    #[serde(default)]
    pub notes: String,
}

impl AssetEntry {
    /// Path of this entry relative to a cache or BIOS root: `[subdir/]filename`.
    pub fn relative_path(&self) -> PathBuf {
        if self.subdir.is_empty() {
            PathBuf::from(&self.filename)
        } else {
            Path::new(&self.subdir).join(&self.filename)
        }
    }
}

/// Remote repository subpath for a system tag.
///
/// A system absent from the mapping resolves to the repository root (the
/// file is then fetched root-relative); that is a documented edge case,
/// not an error.
pub fn repo_path_for_system(system: &str) -> &'static str {
    match system {
        "PlayStation" => "Sony - PlayStation/",
        "Neo Geo" => "Arcade/",
        "Sega CD" => "Sega - Mega CD - Sega CD/",
        "TurboGrafx-CD" => "NEC - PC Engine - TurboGrafx 16 - SuperGrafx/",
        "Saturn" => "Sega - Saturn/",
        "GBA" => "Nintendo - Game Boy Advance/",
        "GB" => "Nintendo - Gameboy/",
        "GBC" => "Nintendo - Gameboy Color/",
        "Neo Geo CD" => "SNK - NeoGeo CD/",
        _ => "",
    }
}

/// Immutable ordered sequence of [`AssetEntry`], fixed for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<AssetEntry>,
}

/// On-disk shape of an external catalog file: a list of `[[asset]]` tables.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    asset: Vec<AssetEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<AssetEntry>) -> Self {
        Catalog { entries }
    }

    /// Load a catalog from a TOML file (`[[asset]]` tables).
    pub fn load_toml(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("read catalog {}", path.display()))?;
        let file: CatalogFile = toml::from_str(&data)
            .with_context(|| format!("parse catalog {}", path.display()))?;
        Ok(Catalog::new(file.asset))
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    /// Entries in catalog order, optionally narrowed to the required subset.
    pub fn selected(&self, required_only: bool) -> Vec<&AssetEntry> {
        self.entries
            .iter()
            .filter(|e| !required_only || e.required)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The builtin table of BIOS files known to the supported emulator cores.
    pub fn builtin() -> Self {
        fn e(
            filename: &str,
            system: &str,
            md5: &str,
            required: bool,
            subdir: &str,
            extra_copies: &[&str],
            notes: &str,
        ) -> AssetEntry {
            AssetEntry {
                filename: filename.to_string(),
                system: system.to_string(),
                md5: md5.to_string(),
                required,
                subdir: subdir.to_string(),
                extra_copies: extra_copies.iter().map(|s| s.to_string()).collect(),
                notes: notes.to_string(),
            }
        }

        Catalog::new(vec![
            // PlayStation
            e(
                "scph1001.bin",
                "PlayStation",
                "924e392ed05558ffdb115408c263dccf",
                true,
                "",
                &[],
                "PS1 BIOS (North America)",
            ),
            e(
                "scph5500.bin",
                "PlayStation",
                "8dd7d5296a650fac7319bce665a6a53c",
                true,
                "",
                &[],
                "PS1 BIOS (Japan)",
            ),
            e(
                "scph5501.bin",
                "PlayStation",
                "490f666e1afb15b7362b406ed1cea246",
                true,
                "",
                &[],
                "PS1 BIOS (North America)",
            ),
            e(
                "scph5502.bin",
                "PlayStation",
                "32736f17079d0b2b7024407c39bd3050",
                true,
                "",
                &[],
                "PS1 BIOS (Europe)",
            ),
            // Neo Geo; the arcade core also wants the archive next to the ROMs
            e(
                "neogeo.zip",
                "Neo Geo",
                "",
                true,
                "",
                &["Roms/NEOGEO/neogeo.zip"],
                "Neo Geo BIOS (also needed in Roms/NEOGEO/)",
            ),
            // Sega CD
            e(
                "bios_CD_U.bin",
                "Sega CD",
                "2efd74e3232ff260e371b99f84024f7f",
                true,
                "",
                &[],
                "Sega CD BIOS (North America)",
            ),
            e(
                "bios_CD_E.bin",
                "Sega CD",
                "e66fa1dc5820d254611fdcdba0662372",
                true,
                "",
                &[],
                "Sega CD BIOS (Europe)",
            ),
            e(
                "bios_CD_J.bin",
                "Sega CD",
                "278a9397d192149e84e820ac621a8edd",
                true,
                "",
                &[],
                "Sega CD BIOS (Japan)",
            ),
            // TurboGrafx-CD
            e(
                "syscard3.pce",
                "TurboGrafx-CD",
                "38179df8f4ac870017db21ebcbf53114",
                true,
                "",
                &[],
                "TurboGrafx-CD / PC Engine CD System Card 3",
            ),
            // Saturn
            e(
                "mpr-17933.bin",
                "Saturn",
                "3240872c70984b6cbfda1586cab68dbe",
                true,
                "",
                &[],
                "Sega Saturn BIOS (Europe)",
            ),
            // GBA
            e(
                "gba_bios.bin",
                "GBA",
                "a860e8c0b6d573d191e4ec7db1b1e4f6",
                false,
                "",
                &[],
                "Game Boy Advance BIOS (optional, HLE available)",
            ),
            // GB / GBC
            e(
                "gb_bios.bin",
                "GB",
                "32fbbd84168d3482956eb3c5051637f5",
                false,
                "",
                &[],
                "Game Boy BIOS (optional)",
            ),
            e(
                "gbc_bios.bin",
                "GBC",
                "dbfce9db9deaa2567f6a84fde55f9680",
                false,
                "",
                &[],
                "Game Boy Color BIOS (optional)",
            ),
            // Neo Geo CD
            e(
                "neocd_f.rom",
                "Neo Geo CD",
                "",
                false,
                "neocd",
                &[],
                "Neo Geo CD front loader BIOS",
            ),
            e(
                "000-lo.lo",
                "Neo Geo CD",
                "",
                false,
                "neocd",
                &[],
                "Neo Geo CD load order file",
            ),
        ])
    }
}
