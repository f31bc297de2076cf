//! Size- and time-triggered batching of log lines.

use std::sync::{Mutex, PoisonError};

/// Default flush threshold (10 lines).
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

/// An ordered group of log lines delivered together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBatch {
    lines: Vec<String>,
}

impl LogBatch {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Buffers lines until `max_batch_size` is reached or a tick arrives.
///
/// Flushing swaps the buffer for an empty one under the lock; the swapped-out
/// batch is returned to the caller, who delivers it outside the lock.
#[derive(Debug)]
pub struct LogBatcher {
    pending: Mutex<Vec<String>>,
    max_batch_size: usize,
}

impl LogBatcher {
    pub fn new(max_batch_size: usize) -> Self {
        let max_batch_size = max_batch_size.max(1);
        Self {
            pending: Mutex::new(Vec::with_capacity(max_batch_size)),
            max_batch_size,
        }
    }

    /// Buffer a line. Returns the full batch when this push reaches the cap.
    pub fn push(&self, line: String) -> Option<LogBatch> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.push(line);
        if pending.len() >= self.max_batch_size {
            let lines = std::mem::replace(&mut *pending, Vec::with_capacity(self.max_batch_size));
            return Some(LogBatch::new(lines));
        }
        None
    }

    /// Take whatever is buffered. `None` when there is nothing to flush.
    pub fn flush(&self) -> Option<LogBatch> {
        let lines = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if pending.is_empty() {
                return None;
            }
            std::mem::take(&mut *pending)
        };
        Some(LogBatch::new(lines))
    }

    /// Periodic timer hook; flushes regardless of size.
    pub fn tick(&self) -> Option<LogBatch> {
        self.flush()
    }

    pub fn pending_len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

impl Default for LogBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCH_SIZE)
    }
}
