//! Log line highlighting.

use ratatui::style::{Modifier, Style};

use super::theme::{COLOR_KEY, COLOR_LOG_ERROR, COLOR_LOG_WARN};

/// Style for a log line. Severity wins over security key mentions.
pub fn line_style(line: &str) -> Style {
    if line.contains("ERROR") {
        return Style::default().fg(COLOR_LOG_ERROR);
    }
    if line.contains("WARN") {
        return Style::default().fg(COLOR_LOG_WARN);
    }
    if mentions_security_key(line) {
        return Style::default().fg(COLOR_KEY).add_modifier(Modifier::BOLD);
    }
    Style::default()
}

fn mentions_security_key(line: &str) -> bool {
    line.to_ascii_lowercase().contains("security key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_key_lines_are_green() {
        let style = line_style("2026-01-01 INFO Detected new security key: Yubico YubiKey 5 NFC");
        assert_eq!(style.fg, Some(COLOR_KEY));
    }

    #[test]
    fn test_severity_beats_key_mention() {
        let style = line_style("ERROR Error monitoring security keys: access denied");
        assert_eq!(style.fg, Some(COLOR_LOG_ERROR));
        assert_eq!(line_style(" WARN slow poll").fg, Some(COLOR_LOG_WARN));
    }

    #[test]
    fn test_plain_lines_unstyled() {
        assert_eq!(line_style("INFO Dashboard closed"), Style::default());
    }
}
