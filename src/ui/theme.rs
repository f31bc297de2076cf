//! Dashboard palette.

use ratatui::style::Color;

pub const COLOR_BORDER: Color = Color::DarkGray;
pub const COLOR_HEADER: Color = Color::White;
pub const COLOR_DIM: Color = Color::DarkGray;

/// Attached keys and security key log lines
pub const COLOR_KEY: Color = Color::LightGreen;

pub const COLOR_NOTICE_INFO: Color = Color::Green;
pub const COLOR_NOTICE_ERROR: Color = Color::Red;

pub const COLOR_LOG_ERROR: Color = Color::Red;
pub const COLOR_LOG_WARN: Color = Color::Yellow;

/// Indicator shown while the log view follows the file
pub const COLOR_LIVE: Color = Color::LightGreen;
