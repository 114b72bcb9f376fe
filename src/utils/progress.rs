//! Progress line for the batch pass.
//!
//! The line is rewritten in place with a carriage return, so it stays a
//! single line on a terminal.
//!
//! # Usage
//!
//! ```ignore
//! use doi_fill::utils::ProgressReporter;
//!
//! let reporter = ProgressReporter::new(100);
//! for i in 0..100 {
//!     reporter.set(i);
//!     // Do some work...
//! }
//! reporter.finish();
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Progress reporter with optional terminal output
#[derive(Debug)]
pub struct ProgressReporter {
    /// Total number of entries
    total: usize,

    /// Entries processed so far
    current: AtomicUsize,

    /// Start time for the final timing log
    start_time: Instant,

    /// Whether to suppress output
    quiet: bool,
}

impl ProgressReporter {
    /// Create a reporter that prints to stdout
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current: AtomicUsize::new(0),
            start_time: Instant::now(),
            quiet: false,
        }
    }

    /// Create a quiet reporter that doesn't output anything
    pub fn quiet(total: usize) -> Self {
        Self {
            quiet: true,
            ..Self::new(total)
        }
    }

    /// Set the number of processed entries and redraw the line
    pub fn set(&self, value: usize) {
        self.current.store(value, Ordering::SeqCst);

        if !self.quiet {
            print!("\r{}", Self::line(value, self.total));
            let _ = std::io::stdout().flush();
        }
    }

    fn line(current: usize, total: usize) -> String {
        format!("{}/{} entries processed, please wait...", current, total)
    }

    /// Terminate the progress line
    pub fn finish(&self) {
        if !self.quiet {
            println!();
        }
        tracing::debug!(
            "Processed {}/{} entries in {:?}",
            self.current(),
            self.total,
            self.start_time.elapsed()
        );
    }

    /// Get the current progress count
    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}
