//! Follows a log file from its end, delivering new lines in batches.
//!
//! The file is opened and positioned at end-of-file before the loop is
//! spawned, so existing content is never replayed by the tail. Use
//! [`load_full_file`] for a one-shot read of the whole file.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::batcher::{LogBatcher, DEFAULT_MAX_BATCH_SIZE};
use super::dedup::{strip_line, LineDeduper};
use crate::delivery::{DeliverySender, StatusNotice, UiEvent};
use crate::error::{classify_log_io_error, MonitorError, MonitorResult};

/// Floor for the stop deadline when the idle interval is very short.
const MIN_STOP_DEADLINE: Duration = Duration::from_millis(250);

/// Upper bound on lines read before the loop yields to the timers.
const MAX_LINES_PER_PASS: usize = 4096;

/// Smallest idle or flush interval a tail loop will run with.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

type LineReader = Box<dyn AsyncBufRead + Unpin + Send + Sync>;

/// Timing and batching parameters for a [`LogTailer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailConfig {
    /// Idle wait when no new line is available.
    pub poll_interval: Duration,
    /// Time-triggered batch flush cadence.
    pub flush_interval: Duration,
    /// Size-triggered batch flush threshold.
    pub max_batch_size: usize,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            flush_interval: Duration::from_millis(1000),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl TailConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Raise both intervals to at least 1ms.
    pub fn clamped(self) -> Self {
        Self {
            poll_interval: self.poll_interval.max(MIN_INTERVAL),
            flush_interval: self.flush_interval.max(MIN_INTERVAL),
            max_batch_size: self.max_batch_size,
        }
    }
}

/// Handle to a running tail loop.
pub struct LogTailer {
    path: PathBuf,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    poll_interval: Duration,
}

impl LogTailer {
    /// Open `path`, seek to its end and spawn the tail loop.
    ///
    /// Fails without spawning anything if the file cannot be opened. Zero
    /// intervals in `config` are raised to 1ms.
    pub async fn start(
        path: impl Into<PathBuf>,
        sink: DeliverySender,
        config: TailConfig,
    ) -> MonitorResult<Self> {
        let path = path.into();
        let config = config.clamped();
        let (reader, cursor) = open_at(&path, SeekFrom::End(0)).await?;
        let (stop_tx, stop_rx) = watch::channel(false);

        let tail_loop = TailLoop {
            path: path.clone(),
            reader,
            cursor,
            partial: Vec::new(),
            dedup: LineDeduper::new(),
            batcher: LogBatcher::new(config.max_batch_size),
            sink,
            config,
        };
        let handle = tokio::spawn(tail_loop.run(stop_rx));

        Ok(Self {
            path,
            stop_tx,
            handle: Some(handle),
            poll_interval: config.poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// False once stopped, or after the loop ended on a fatal error.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop and wait for it to flush and exit.
    ///
    /// Idempotent. Once this returns `Ok`, no further lines are delivered.
    /// The loop gets one poll interval, but never less than 250ms, to exit
    /// before it is aborted and `ShutdownTimeout` is returned.
    pub async fn stop(&mut self) -> MonitorResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let _ = self.stop_tx.send(true);
        let deadline = self.poll_interval.max(MIN_STOP_DEADLINE);
        let abort = handle.abort_handle();

        match tokio::time::timeout(deadline, handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!("Log tailer task ended abnormally: {}", e);
                Ok(())
            }
            Err(_) => {
                abort.abort();
                Err(MonitorError::ShutdownTimeout {
                    component: "log tailer",
                    deadline,
                })
            }
        }
    }
}

impl Drop for LogTailer {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Read the whole file once, keeping at most the last `max_lines` lines.
pub async fn load_full_file(path: &Path, max_lines: usize) -> MonitorResult<Vec<String>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| classify_log_io_error(e, path.to_path_buf()))?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text.lines().map(strip_line).collect();
    let skip = lines.len().saturating_sub(max_lines);
    Ok(lines.into_iter().skip(skip).collect())
}

async fn open_at(path: &Path, pos: SeekFrom) -> MonitorResult<(LineReader, u64)> {
    let mut file = File::open(path)
        .await
        .map_err(|e| classify_log_io_error(e, path.to_path_buf()))?;
    let cursor = file
        .seek(pos)
        .await
        .map_err(|e| classify_log_io_error(e, path.to_path_buf()))?;
    Ok((Box::new(BufReader::new(file)), cursor))
}

/// How a read pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Reached end-of-file.
    Drained,
    /// Stopped at the per-pass line cap with more data possibly waiting.
    Saturated,
    /// Stop was requested or the channel closed.
    Closed,
}

struct TailLoop {
    path: PathBuf,
    reader: LineReader,
    /// Byte offset of the next unread byte.
    cursor: u64,
    /// Bytes of a line whose newline has not arrived yet.
    partial: Vec<u8>,
    dedup: LineDeduper,
    batcher: LogBatcher,
    sink: DeliverySender,
    config: TailConfig,
}

impl TailLoop {
    async fn run(mut self, mut stop_rx: watch::Receiver<bool>) {
        tracing::info!(
            "Log tailer started for {} at offset {}",
            self.path.display(),
            self.cursor
        );

        let mut flush_tick = tokio::time::interval(self.config.flush_interval);
        flush_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        flush_tick.reset();

        loop {
            let idle = match self.pump(&mut stop_rx).await {
                Ok(Pass::Drained) => self.config.poll_interval,
                Ok(Pass::Saturated) => Duration::ZERO,
                Ok(Pass::Closed) => break,
                Err(e) if e.is_transient() => {
                    e.log("Failed to read log file");
                    self.config.poll_interval
                }
                Err(e) => {
                    e.log("Failed to monitor log file in real time");
                    self.emit(UiEvent::Notice(StatusNotice::error(e.user_message())), &mut stop_rx)
                        .await;
                    break;
                }
            };

            if *stop_rx.borrow() {
                break;
            }

            tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                _ = flush_tick.tick() => {
                    if let Some(batch) = self.batcher.tick() {
                        if !self.emit(UiEvent::LogLines(batch), &mut stop_rx).await {
                            break;
                        }
                    }
                }
                _ = tokio::time::sleep(idle) => {}
            }
        }

        self.final_flush();
        tracing::info!("Log tailer stopped for {}", self.path.display());
    }

    /// Read the complete lines currently available, up to the per-pass cap.
    async fn pump(&mut self, stop_rx: &mut watch::Receiver<bool>) -> MonitorResult<Pass> {
        self.check_truncation().await?;

        for _ in 0..MAX_LINES_PER_PASS {
            let Some(line) = self.next_line().await? else {
                return Ok(Pass::Drained);
            };
            if !self.dedup.accept(&line) {
                continue;
            }
            if let Some(batch) = self.batcher.push(line) {
                if !self.emit(UiEvent::LogLines(batch), stop_rx).await {
                    return Ok(Pass::Closed);
                }
            }
        }
        Ok(Pass::Saturated)
    }

    /// Next complete line, or `None` at end-of-file. A trailing fragment
    /// without a newline stays in `partial` until the rest arrives.
    async fn next_line(&mut self) -> MonitorResult<Option<String>> {
        // Bytes consumed before a read error still count towards the cursor.
        let mut chunk = Vec::new();
        let result = self.reader.read_until(b'\n', &mut chunk).await;
        self.cursor += chunk.len() as u64;
        self.partial.extend_from_slice(&chunk);
        result.map_err(|e| classify_log_io_error(e, self.path.clone()))?;

        if self.partial.last() != Some(&b'\n') {
            return Ok(None);
        }
        let raw = std::mem::take(&mut self.partial);
        Ok(Some(strip_line(&String::from_utf8_lossy(&raw))))
    }

    /// Detect a file that shrank below the cursor and restart from offset 0.
    ///
    /// The file is reopened so a rotated replacement is followed too. The
    /// deduper keeps its last line, so a repeat across the cut is dropped.
    async fn check_truncation(&mut self) -> MonitorResult<()> {
        let len = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| classify_log_io_error(e, self.path.clone()))?
            .len();
        if len >= self.cursor {
            return Ok(());
        }

        tracing::warn!(
            "Log file {} shrank from {} to {} bytes, reading from the start",
            self.path.display(),
            self.cursor,
            len
        );
        let (reader, cursor) = open_at(&self.path, SeekFrom::Start(0)).await?;
        self.reader = reader;
        self.cursor = cursor;
        self.partial.clear();
        Ok(())
    }

    /// Send unless a stop arrives first. Returns false when the loop should exit.
    async fn emit(&self, event: UiEvent, stop_rx: &mut watch::Receiver<bool>) -> bool {
        if *stop_rx.borrow() {
            return false;
        }
        tokio::select! {
            biased;
            _ = stop_rx.changed() => false,
            sent = self.sink.send(event) => {
                if !sent {
                    tracing::debug!("Delivery channel closed, stopping log tailer");
                }
                sent
            }
        }
    }

    /// Hand over whatever is still buffered without waiting on the channel.
    fn final_flush(&self) {
        if let Some(batch) = self.batcher.flush() {
            let count = batch.len();
            if !self.sink.try_send(UiEvent::LogLines(batch)) {
                tracing::debug!("Dropped {} buffered log lines on shutdown", count);
            }
        }
    }
}
