mod fetch;
mod install;
mod status;

pub use fetch::run_fetch;
pub use install::run_install;
pub use status::run_status;

use retrobios_core::batch::BatchResult;

/// Print the aggregate outcome and map an incomplete batch to a CLI error
/// (non-zero exit).
pub(crate) fn finish_batch(verb: &str, result: &BatchResult) -> anyhow::Result<()> {
    println!(
        "{} succeeded, {} failed",
        result.succeeded.len(),
        result.failed.len()
    );
    for failure in &result.failed {
        println!("  failed: {failure}");
    }
    if result.overall {
        return Ok(());
    }
    if result.cancelled {
        anyhow::bail!("{verb} cancelled before completion");
    }
    anyhow::bail!("{verb} incomplete: {} file(s) failed", result.failed.len())
}
