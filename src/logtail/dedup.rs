//! Consecutive-duplicate suppression.

/// Strip trailing whitespace (including the line terminator).
pub fn strip_line(raw: &str) -> String {
    raw.trim_end().to_string()
}

/// Drops a line when it is textually identical to the line before it.
///
/// A run of identical lines collapses to exactly one delivered line. The
/// previous line survives a truncation of the file, so a repeat across the
/// truncation point is still dropped.
#[derive(Debug, Default)]
pub struct LineDeduper {
    last: Option<String>,
}

impl LineDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `line` should be delivered.
    pub fn accept(&mut self, line: &str) -> bool {
        if self.last.as_deref() == Some(line) {
            return false;
        }
        self.last = Some(line.to_string());
        true
    }
}
