//! Dashboard state owned by the UI loop.
//!
//! [`App`] is the only [`UiSink`] in the dashboard. It is mutated exclusively
//! from the UI task, either by draining the delivery channel or by key
//! handling, and marks itself dirty whenever something visible changes.

mod actions;
mod runner;

pub use actions::{action_for_key, Action};
pub use runner::{run_dashboard, LogView};

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::config::{DashboardConfig, Link};
use crate::delivery::StatusNotice;
use crate::devices::DeviceIdentity;
use crate::logtail::LogBatch;
use crate::traits::UiSink;

pub struct App {
    /// Attached security keys, as last reported
    pub keys: Vec<DeviceIdentity>,
    /// Log view contents, oldest first
    pub log_lines: VecDeque<String>,
    log_capacity: usize,
    /// Status line; cleared once expired
    pub notice: Option<StatusNotice>,
    /// Whether the log view is following the file
    pub tailing: bool,
    pub log_file: PathBuf,
    pub links: Vec<Link>,
    pub needs_redraw: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &DashboardConfig) -> Self {
        let log_capacity = config.log_view_capacity.max(1);
        Self {
            keys: Vec::new(),
            log_lines: VecDeque::with_capacity(log_capacity.min(4096)),
            log_capacity,
            notice: None,
            tailing: false,
            log_file: config.log_file.clone(),
            links: config.links.clone(),
            needs_redraw: true,
            should_quit: false,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Periodic housekeeping; drops an expired notice.
    pub fn tick(&mut self) {
        if self.notice.as_ref().is_some_and(StatusNotice::is_expired) {
            self.notice = None;
            self.mark_dirty();
        }
    }

    /// Replace the log view with a full-file load.
    pub fn replace_log_lines(&mut self, lines: Vec<String>) {
        self.log_lines.clear();
        self.push_lines(lines);
        self.mark_dirty();
    }

    pub fn set_tailing(&mut self, tailing: bool) {
        if self.tailing != tailing {
            self.tailing = tailing;
            self.mark_dirty();
        }
    }

    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    /// The log view as one newline-joined string.
    pub fn log_text(&self) -> String {
        self.log_lines
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push_lines(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            if self.log_lines.len() == self.log_capacity {
                self.log_lines.pop_front();
            }
            self.log_lines.push_back(line);
        }
    }
}

impl UiSink for App {
    fn set_key_list(&mut self, identities: &[DeviceIdentity]) {
        self.keys = identities.to_vec();
        self.mark_dirty();
    }

    fn append_log_lines(&mut self, batch: LogBatch) {
        if batch.is_empty() {
            return;
        }
        self.push_lines(batch.into_lines());
        self.mark_dirty();
    }

    fn show_notice(&mut self, notice: StatusNotice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }
}
