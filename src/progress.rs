//! Progress reporting for file transfers.

use std::io::{self, Read};
use std::sync::{Arc, Mutex};

/// Progress information for uploads and downloads.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Bytes transferred so far
    pub done: u64,
    /// Total bytes to transfer (0 when unknown)
    pub total: u64,
    /// Name of the file being transferred
    pub filename: String,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(done: u64, total: u64, filename: impl Into<String>) -> Self {
        Self {
            done,
            total,
            filename: filename.into(),
        }
    }

    /// Get progress as a percentage (0.0 to 100.0).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64) * 100.0
    }

    /// Check if transfer is complete.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

/// Type alias for progress callback function.
///
/// The callback only observes; transfers cannot be cancelled through it.
pub type ProgressCallback = Box<dyn FnMut(&TransferProgress) + Send>;

pub(crate) type SharedProgressCallback = Arc<Mutex<ProgressCallback>>;

/// Reader that reports every chunk read from `inner`.
pub(crate) struct ProgressReader<R> {
    inner: R,
    progress: TransferProgress,
    callback: Option<SharedProgressCallback>,
}

impl<R: Read> ProgressReader<R> {
    pub(crate) fn new(
        inner: R,
        progress: TransferProgress,
        callback: Option<SharedProgressCallback>,
    ) -> Self {
        Self {
            inner,
            progress,
            callback,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.progress.done += n as u64;
            if let Some(callback) = &self.callback {
                if let Ok(mut callback) = callback.lock() {
                    callback(&self.progress);
                }
            }
        }
        Ok(n)
    }
}
