//! Whole-run cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::BenchError;

/// Cooperative cancellation token shared between the Ctrl+C handler and the
/// worker adapter.
///
/// # Example
/// ```
/// use parbench_core::cancel::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation. Clones observe it too.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Checkpoint between pipeline steps.
    pub fn check_cancelled(&self) -> Result<(), BenchError> {
        if self.is_cancelled() {
            Err(BenchError::Cancelled)
        } else {
            Ok(())
        }
    }
}
