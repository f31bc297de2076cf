//! `--watch`: headless presence monitoring on stdout.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::delivery::{delivery_channel, dispatch, NoticeLevel, StatusNotice};
use crate::devices::{DeviceEnumerator, DeviceIdentity, KeyClassifier, PresenceMonitor};
use crate::error::MonitorResult;
use crate::logtail::LogBatch;
use crate::traits::{NotificationSink, UiSink};

/// A [`UiSink`] that writes one line per update.
pub struct EventPrinter<W: Write> {
    out: W,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::debug!("Failed to write watch output: {}", e);
        }
    }
}

impl<W: Write> UiSink for EventPrinter<W> {
    fn set_key_list(&mut self, identities: &[DeviceIdentity]) {
        let names: Vec<&str> = identities.iter().map(DeviceIdentity::as_str).collect();
        if names.is_empty() {
            self.line("keys: (none)");
        } else {
            self.line(&format!("keys: {}", names.join(", ")));
        }
    }

    fn append_log_lines(&mut self, batch: LogBatch) {
        for line in batch.lines() {
            self.line(&format!("log: {}", line));
        }
    }

    fn show_notice(&mut self, notice: StatusNotice) {
        let level = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        self.line(&format!("[{}] {}", level, notice.message));
    }
}

/// Print presence changes until `shutdown` resolves, then stop the monitor.
///
/// Returns the writer so callers can inspect what was printed.
pub async fn run_watch<W, F>(
    config: &DashboardConfig,
    enumerator: Arc<dyn DeviceEnumerator>,
    notifier: &dyn NotificationSink,
    out: W,
    shutdown: F,
) -> MonitorResult<W>
where
    W: Write,
    F: Future<Output = ()>,
{
    let (sink, mut events) = delivery_channel(config.channel_capacity);
    let mut monitor = PresenceMonitor::start(
        enumerator,
        KeyClassifier::new(&config.key_catalog),
        config.identity.scheme(),
        sink,
        config.poll_interval(),
    );
    let mut printer = EventPrinter::new(out);

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Some(event) => dispatch(event, &mut printer, notifier),
                None => break,
            },
        }
    }

    monitor.stop().await?;
    for event in events.drain() {
        dispatch(event, &mut printer, notifier);
    }
    Ok(printer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_formats() {
        let mut printer = EventPrinter::new(Vec::new());
        printer.set_key_list(&[DeviceIdentity::from("a"), DeviceIdentity::from("b")]);
        printer.set_key_list(&[]);
        printer.show_notice(StatusNotice::error("boom"));
        printer.append_log_lines(LogBatch::new(vec!["x".into()]));

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(text, "keys: a, b\nkeys: (none)\n[error] boom\nlog: x\n");
    }
}
