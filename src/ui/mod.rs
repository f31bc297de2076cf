//! Dashboard rendering.
//!
//! ```text
//! ┌ opsdeck ─────────────────────────────── ● LIVE ┐
//! │ Security Keys (n) │ Log: <path>                │
//! │  Yubico YubiKey…  │  … last lines, highlighted │
//! │ Links             │                            │
//! │  1 Runbook        │                            │
//! └ status notice or key help ─────────────────────┘
//! ```

mod highlight;
mod theme;

pub use highlight::line_style;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::delivery::NoticeLevel;
use theme::*;

const SIDEBAR_WIDTH: u16 = 36;
const HELP: &str = "q quit  l follow log  r reload  c copy  1-9 links";

pub fn render(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, rows[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    render_sidebar(frame, columns[0], app);
    render_log(frame, columns[1], app);
    render_status(frame, rows[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " opsdeck",
        Style::default()
            .fg(COLOR_HEADER)
            .add_modifier(Modifier::BOLD),
    )];
    if app.tailing {
        spans.push(Span::styled("  ● LIVE", Style::default().fg(COLOR_LIVE)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let links_height = if app.links.is_empty() {
        0
    } else {
        app.links.len().min(9) as u16 + 2
    };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(links_height)])
        .split(area);

    let keys: Vec<ListItem> = if app.keys.is_empty() {
        vec![ListItem::new(Span::styled(
            "No security keys attached",
            Style::default().fg(COLOR_DIM),
        ))]
    } else {
        app.keys
            .iter()
            .map(|key| ListItem::new(Span::styled(key.to_string(), Style::default().fg(COLOR_KEY))))
            .collect()
    };
    frame.render_widget(
        List::new(keys).block(bordered(format!("Security Keys ({})", app.keys.len()))),
        parts[0],
    );

    if links_height > 0 {
        let links: Vec<ListItem> = app
            .links
            .iter()
            .take(9)
            .enumerate()
            .map(|(i, link)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(COLOR_DIM)),
                    Span::raw(link.name.clone()),
                ]))
            })
            .collect();
        frame.render_widget(List::new(links).block(bordered("Links".to_string())), parts[1]);
    }
}

fn render_log(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.log_lines.len().saturating_sub(visible);
    let lines: Vec<Line> = app
        .log_lines
        .iter()
        .skip(skip)
        .map(|line| Line::styled(line.clone(), line_style(line)))
        .collect();

    let title = format!("Log: {}", app.log_file.display());
    frame.render_widget(Paragraph::new(lines).block(bordered(title)), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => COLOR_NOTICE_INFO,
                NoticeLevel::Error => COLOR_NOTICE_ERROR,
            };
            Line::styled(format!(" {}", notice.message), Style::default().fg(color))
        }
        None => Line::styled(format!(" {HELP}"), Style::default().fg(COLOR_DIM)),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(title)
}
