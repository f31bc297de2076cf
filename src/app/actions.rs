//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Something the user asked the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Start or stop following the log file
    ToggleTail,
    /// Load the whole log file into the view
    ReloadLog,
    /// Copy the log view to the clipboard
    CopyLog,
    /// Open the configured link at this zero-based index
    OpenLink(usize),
}

/// Map a key press to an action.
///
/// | Key | Action |
/// |-----|--------|
/// | `q`, `Esc`, `Ctrl+C` | Quit |
/// | `l` | Toggle log tail |
/// | `r` | Reload full log |
/// | `c` | Copy log view |
/// | `1`-`9` | Open link |
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('l') => Some(Action::ToggleTail),
        KeyCode::Char('r') => Some(Action::ReloadLog),
        KeyCode::Char('c') => Some(Action::CopyLog),
        KeyCode::Char(d @ '1'..='9') => d
            .to_digit(10)
            .map(|n| Action::OpenLink(n as usize - 1)),
        _ => None,
    }
}
