
//! Cooperative cancellation for long-running scans.
//!
//! A `CancelToken` is cloned into the HGT tracer and the synteny aligner,
//! which check it between windows, islands, and DTW rows. A cancelled stage
//! returns whatever it completed plus a `cancelled` status, never a
//! corrupted result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request cancellation; observed at the next stage checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
