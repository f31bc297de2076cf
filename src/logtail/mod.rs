//! Incremental log following with dedup and batching.
//!
//! ```text
//! file ──read_until('\n')──▶ strip ──▶ LineDeduper ──▶ LogBatcher ──▶ DeliverySender
//!                                                      ▲
//!                                       flush tick ────┘ (size cap or timer)
//! ```

mod batcher;
mod dedup;
mod tailer;

pub use batcher::{LogBatch, LogBatcher, DEFAULT_MAX_BATCH_SIZE};
pub use dedup::{strip_line, LineDeduper};
pub use tailer::{load_full_file, LogTailer, TailConfig};
