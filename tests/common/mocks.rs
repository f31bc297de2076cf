//! Recording sinks used to observe what reaches the UI.

use opsdeck::delivery::StatusNotice;
use opsdeck::devices::DeviceIdentity;
use opsdeck::logtail::LogBatch;
use opsdeck::traits::UiSink;

#[allow(unused_imports)]
pub use opsdeck::devices::ScriptedEnumerator;
#[allow(unused_imports)]
pub use opsdeck::notifications::RecordingNotifier;

/// What a [`RecordingSink`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    KeyList(Vec<String>),
    Lines(Vec<String>),
    Notice(String),
}

/// A [`UiSink`] that remembers every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Notice(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }
}

impl UiSink for RecordingSink {
    fn set_key_list(&mut self, identities: &[DeviceIdentity]) {
        self.calls.push(SinkCall::KeyList(
            identities.iter().map(|i| i.to_string()).collect(),
        ));
    }

    fn append_log_lines(&mut self, batch: LogBatch) {
        self.calls.push(SinkCall::Lines(batch.into_lines()));
    }

    fn show_notice(&mut self, notice: StatusNotice) {
        self.calls.push(SinkCall::Notice(notice.message));
    }
}
