//! System clipboard access for copying the log view.

use arboard::Clipboard;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Access(String),
    #[error("nothing to copy")]
    Empty,
}

/// Place `text` on the system clipboard.
pub fn copy_text(text: &str) -> Result<(), ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| ClipboardError::Access(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_rejected_before_touching_clipboard() {
        assert!(matches!(copy_text(""), Err(ClipboardError::Empty)));
    }
}
