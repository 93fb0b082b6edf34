//! Progress indicators for artifact resolution
//!
//! Uses `linya`, whose bars can be drawn from several rayon workers at once.

use linya::{Bar, Progress};
use std::sync::Mutex;

/// Progress bar shared by parallel resolution workers
pub struct ResolveProgress {
  progress: Mutex<Progress>,
  bar: Bar,
}

impl ResolveProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Mutex::new(progress),
      bar,
    }
  }

  /// Increment progress by 1
  pub fn inc(&self) {
    // a poisoned lock only loses a redraw
    if let Ok(mut progress) = self.progress.lock() {
      progress.inc_and_draw(&self.bar, 1);
    }
  }
}
