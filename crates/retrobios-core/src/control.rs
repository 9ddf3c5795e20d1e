//! Coarse-grained batch cancellation.
//!
//! A batch loop checks the token between assets, never mid-transfer: the
//! asset currently being fetched or installed always finishes (and is
//! reported) before the loop stops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for a running batch. Clones observe the same
/// flag, so one handle can be kept by the caller while another travels
/// into the batch call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. No further assets will be started.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
