//! `retrobios install` – copy cached files onto the destination tree.

use anyhow::Result;
use retrobios_core::batch::{self, BatchOptions};
use retrobios_core::catalog::Catalog;
use std::path::Path;

pub fn run_install(
    catalog: &Catalog,
    cache_dir: &Path,
    dest: &Path,
    opts: BatchOptions,
) -> Result<()> {
    println!(
        "installing {} file(s) from {} to {}",
        catalog.selected(opts.required_only).len(),
        cache_dir.display(),
        dest.display()
    );

    let on_batch = |fraction: f64, status: &str| {
        println!("[{:>3.0}%] {}", fraction * 100.0, status);
    };

    let result = batch::install_all(catalog, cache_dir, dest, opts, Some(&on_batch), None)?;
    super::finish_batch("install", &result)
}
