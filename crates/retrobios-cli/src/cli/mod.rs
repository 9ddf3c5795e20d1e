//! CLI for the retrobios BIOS provisioning tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use retrobios_core::batch::BatchOptions;
use retrobios_core::catalog::Catalog;
use retrobios_core::config::{self, RetrobiosConfig};
use std::path::{Path, PathBuf};

use commands::{run_fetch, run_install, run_status};

/// Top-level CLI for the retrobios BIOS provisioning tool.
#[derive(Debug, Parser)]
#[command(name = "retrobios")]
#[command(about = "Download, verify, and install emulator BIOS files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download catalog files into the local cache, verifying checksums.
    Fetch {
        /// Only fetch files marked required.
        #[arg(long)]
        required_only: bool,

        /// Re-download files even when a verified copy is already cached.
        #[arg(long)]
        refetch: bool,

        /// Cache directory (default: configured or XDG cache dir).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Asset catalog TOML file (default: builtin table).
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// Copy cached files onto a destination storage tree.
    Install {
        /// Root of the mounted destination (e.g. the SD card).
        #[arg(long, value_name = "DIR")]
        dest: PathBuf,

        /// Only install files marked required.
        #[arg(long)]
        required_only: bool,

        /// Cache directory (default: configured or XDG cache dir).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Asset catalog TOML file (default: builtin table).
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// Show cache and destination coverage without changing anything.
    Status {
        /// Also report coverage of this destination root.
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,

        /// Cache directory (default: configured or XDG cache dir).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Asset catalog TOML file (default: builtin table).
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                required_only,
                refetch,
                cache_dir,
                catalog,
            } => {
                let catalog = load_catalog(&cfg, catalog.as_deref())?;
                let cache_dir = resolve_cache_dir(&cfg, cache_dir)?;
                let opts = BatchOptions {
                    required_only,
                    skip_cached: !refetch,
                };
                run_fetch(&catalog, &cfg, &cache_dir, opts)
            }
            CliCommand::Install {
                dest,
                required_only,
                cache_dir,
                catalog,
            } => {
                let catalog = load_catalog(&cfg, catalog.as_deref())?;
                let cache_dir = resolve_cache_dir(&cfg, cache_dir)?;
                let opts = BatchOptions {
                    required_only,
                    skip_cached: false,
                };
                run_install(&catalog, &cache_dir, &dest, opts)
            }
            CliCommand::Status {
                dest,
                cache_dir,
                catalog,
            } => {
                let catalog = load_catalog(&cfg, catalog.as_deref())?;
                let cache_dir = resolve_cache_dir(&cfg, cache_dir)?;
                run_status(&catalog, &cache_dir, dest.as_deref())
            }
        }
    }
}

/// The catalog from `--catalog`, the configured path, or the builtin table.
fn load_catalog(cfg: &RetrobiosConfig, override_path: Option<&Path>) -> Result<Catalog> {
    match override_path.or(cfg.catalog_path.as_deref()) {
        Some(path) => Catalog::load_toml(path),
        None => Ok(Catalog::builtin()),
    }
}

fn resolve_cache_dir(cfg: &RetrobiosConfig, override_dir: Option<PathBuf>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => cfg.resolve_cache_dir(),
    }
}
