//! `retrobios status` – cache/destination coverage, read-only.

use anyhow::Result;
use retrobios_core::batch;
use retrobios_core::catalog::Catalog;
use std::path::Path;

pub fn run_status(catalog: &Catalog, cache_dir: &Path, dest: Option<&Path>) -> Result<()> {
    let cache_scan = batch::scan_cache(catalog, cache_dir);
    let dest_scan = dest.map(|d| batch::scan_dest(catalog, d));

    println!(
        "{:<16} {:<16} {:<9} {:<7} {}",
        "FILE", "SYSTEM", "REQUIRED", "CACHED", "INSTALLED"
    );
    for (idx, row) in cache_scan.iter().enumerate() {
        let installed = match &dest_scan {
            Some(scan) => yn(scan[idx].present),
            None => "-",
        };
        println!(
            "{:<16} {:<16} {:<9} {:<7} {}",
            row.filename,
            row.system,
            yn(row.required),
            yn(row.present),
            installed
        );
    }

    let required_total = cache_scan.iter().filter(|r| r.required).count();
    let required_cached = cache_scan.iter().filter(|r| r.required && r.present).count();
    println!();
    println!("required cached: {required_cached}/{required_total}");
    if let Some(scan) = &dest_scan {
        let required_installed = scan.iter().filter(|r| r.required && r.present).count();
        println!("required installed: {required_installed}/{required_total}");
    }
    Ok(())
}

fn yn(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
