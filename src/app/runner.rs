//! The dashboard event loop.
//!
//! One task owns the terminal and the [`App`]. It races keyboard input
//! against a fixed drain tick; on each tick everything queued on the delivery
//! channel is applied to the app, then the app is redrawn if dirty.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use tokio::time::MissedTickBehavior;

use super::actions::{action_for_key, Action};
use super::App;
use crate::clipboard::copy_text;
use crate::config::DashboardConfig;
use crate::delivery::{delivery_channel, DeliveryReceiver, DeliverySender, StatusNotice};
use crate::devices::{KeyClassifier, PresenceMonitor, UsbEnumerator};
use crate::error::MonitorResult;
use crate::logtail::{load_full_file, LogTailer, TailConfig};
use crate::notifications::DesktopNotifier;
use crate::terminal::TerminalManager;
use crate::traits::{NotificationSink, UiSink};
use crate::ui;

/// Owns the single log tailer behind the dashboard's log view.
pub struct LogView {
    path: PathBuf,
    config: TailConfig,
    sink: DeliverySender,
    tailer: Option<LogTailer>,
}

impl LogView {
    pub fn new(path: impl Into<PathBuf>, config: TailConfig, sink: DeliverySender) -> Self {
        Self {
            path: path.into(),
            config,
            sink,
            tailer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// False when never started, stopped, or ended by a fatal read error.
    pub fn is_following(&self) -> bool {
        self.tailer.as_ref().is_some_and(LogTailer::is_running)
    }

    /// Stop following if active, otherwise start. Returns the new state.
    pub async fn toggle(&mut self) -> MonitorResult<bool> {
        if self.is_following() {
            self.stop().await?;
            return Ok(false);
        }
        // Reap a tailer that ended on its own before replacing it.
        self.stop().await?;
        let tailer = LogTailer::start(&self.path, self.sink.clone(), self.config).await?;
        self.tailer = Some(tailer);
        Ok(true)
    }

    pub async fn stop(&mut self) -> MonitorResult<()> {
        match self.tailer.take() {
            Some(mut tailer) => tailer.stop().await,
            None => Ok(()),
        }
    }
}

/// Run the interactive dashboard until the user quits.
pub async fn run_dashboard(config: DashboardConfig) -> Result<()> {
    let (sink, mut events) = delivery_channel(config.channel_capacity);

    let mut monitor = PresenceMonitor::start(
        Arc::new(UsbEnumerator),
        KeyClassifier::new(&config.key_catalog),
        config.identity.scheme(),
        sink.clone(),
        config.poll_interval(),
    );
    let mut log_view = LogView::new(config.log_file.clone(), config.tail_config(), sink);
    let notifier = DesktopNotifier::new();
    let mut app = App::new(&config);

    let mut manager = TerminalManager::new()?;
    let result = event_loop(
        manager.terminal(),
        &mut app,
        &mut events,
        &notifier,
        &mut log_view,
        config.drain_interval(),
    )
    .await;
    manager.restore()?;

    if let Err(e) = log_view.stop().await {
        e.log("Log tailer shutdown");
    }
    if let Err(e) = monitor.stop().await {
        e.log("Presence monitor shutdown");
    }
    tracing::info!("Dashboard closed");

    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut DeliveryReceiver,
    notifier: &dyn NotificationSink,
    log_view: &mut LogView,
    drain_interval: Duration,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut input = EventStream::new();
    let mut drain_tick = tokio::time::interval(drain_interval);
    drain_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if app.needs_redraw {
            terminal.draw(|frame| ui::render(frame, app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            _ = drain_tick.tick() => {
                let applied = events.drain_into(app, notifier);
                if applied > 0 {
                    tracing::trace!("Applied {} queued events", applied);
                }
                app.set_tailing(log_view.is_following());
                app.tick();
            }
            next = input.next() => match next {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = action_for_key(&key) {
                        perform(action, app, log_view).await;
                    }
                }
                Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                Some(Ok(_)) => {}
                Some(Err(e)) => tracing::warn!("Terminal input error: {}", e),
                None => break,
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn perform(action: Action, app: &mut App, log_view: &mut LogView) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ToggleTail => {
            match log_view.toggle().await {
                Ok(true) => {
                    tracing::info!("Following {}", log_view.path().display());
                    app.show_notice(StatusNotice::info("Following the log in real time."));
                }
                Ok(false) => app.show_notice(StatusNotice::info("Stopped following the log.")),
                Err(e) => {
                    e.log("Failed to toggle log tail");
                    app.show_notice(StatusNotice::error(e.user_message()));
                }
            }
            app.set_tailing(log_view.is_following());
        }
        Action::ReloadLog => match load_full_file(log_view.path(), app.log_capacity()).await {
            Ok(lines) => {
                let count = lines.len();
                app.replace_log_lines(lines);
                app.show_notice(StatusNotice::info(format!("Loaded {count} log lines.")));
            }
            Err(e) => {
                e.log("Failed to load log file");
                app.show_notice(StatusNotice::error(e.user_message()));
            }
        },
        Action::CopyLog => match copy_text(&app.log_text()) {
            Ok(()) => {
                let count = app.log_lines.len();
                app.show_notice(StatusNotice::info(format!("Copied {count} lines to the clipboard.")));
            }
            Err(e) => app.show_notice(StatusNotice::error(e.to_string())),
        },
        Action::OpenLink(index) => {
            let Some(link) = app.links.get(index).cloned() else {
                return;
            };
            match webbrowser::open(&link.url) {
                Ok(()) => {
                    tracing::info!("Opened link {} ({})", link.name, link.url);
                    app.show_notice(StatusNotice::info(format!("Opened {}.", link.name)));
                }
                Err(e) => {
                    tracing::warn!("Failed to open {}: {}", link.url, e);
                    app.show_notice(StatusNotice::error(format!("Could not open {}.", link.name)));
                }
            }
        }
    }
}
