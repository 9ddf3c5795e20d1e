//! MD5 checksum computation and verification against catalog digests.
//!
//! Digests are computed with fixed-size streaming reads so memory stays
//! bounded regardless of file size. An empty expected digest is the
//! explicit "skip verification" sentinel.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute the MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut ctx = md5::Context::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(hex::encode(ctx.finalize().0))
}

/// Check a file against an expected MD5 digest.
///
/// Returns `Ok(true)` when `expected` is empty (skip sentinel) or when the
/// computed digest matches case-insensitively. A mismatch is logged and
/// reported as `Ok(false)`; disposition is the caller's responsibility.
pub fn verify_file(path: &Path, expected: &str) -> io::Result<bool> {
    if expected.is_empty() {
        return Ok(true);
    }
    let actual = md5_path(path)?;
    let ok = actual.eq_ignore_ascii_case(expected);
    if !ok {
        tracing::warn!(
            "MD5 mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        );
    }
    Ok(ok)
}
