//! Progress indicators for package runs
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars

use linya::{Bar, Progress};
use std::sync::Mutex;

/// Thread-safe progress bar shared by the runner's workers
pub struct RunProgress {
  progress: Mutex<Progress>,
  bar: Bar,
}

impl RunProgress {
  /// Create a new progress bar for `total` package runs
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Mutex::new(progress),
      bar,
    }
  }

  /// Increment progress by 1 (thread-safe)
  pub fn inc(&self) {
    // A worker that panicked mid-draw only leaves a stale bar behind
    let mut progress = match self.progress.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };
    progress.inc_and_draw(&self.bar, 1);
  }
}
