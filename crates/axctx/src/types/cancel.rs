/*! Cooperative cancellation for context builds. */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable cancellation flag.
///
/// Checked at the top of every traversal-queue iteration and before each
/// window group's build starts. Cancellation is cooperative: triggering the
/// token makes the build release its traversal state and return
/// `ContextError::Cancelled` at the next checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
  flag: Arc<AtomicBool>,
}

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation. Safe to call from any thread, any number of times.
  pub fn cancel(&self) {
    self.flag.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.flag.load(Ordering::Relaxed)
  }
}
