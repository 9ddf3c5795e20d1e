//! `retrobios fetch` – batch-download the catalog into the cache.

use anyhow::Result;
use retrobios_core::batch::{self, BatchOptions};
use retrobios_core::catalog::Catalog;
use retrobios_core::config::RetrobiosConfig;
use std::io::Write;
use std::path::Path;

pub fn run_fetch(
    catalog: &Catalog,
    cfg: &RetrobiosConfig,
    cache_dir: &Path,
    opts: BatchOptions,
) -> Result<()> {
    println!(
        "fetching {} file(s) into {}",
        catalog.selected(opts.required_only).len(),
        cache_dir.display()
    );

    let on_batch = |fraction: f64, status: &str| {
        // Leading \r + padding overwrites any per-file progress remnants.
        println!("\r[{:>3.0}%] {:<60}", fraction * 100.0, status);
    };
    let on_file = |filename: &str, done: u64, total: u64| {
        if total > 0 {
            print!("\r  {}: {} / {} KiB", filename, done / 1024, total / 1024);
        } else {
            print!("\r  {}: {} KiB", filename, done / 1024);
        }
        let _ = std::io::stdout().flush();
    };

    let result = batch::fetch_all(
        catalog,
        cfg,
        cache_dir,
        opts,
        Some(&on_batch),
        Some(&on_file),
        None,
    )?;
    super::finish_batch("fetch", &result)
}
