//! Application logging.
//!
//! Everything goes to a single plain-text file. The dashboard's log view
//! follows that same file, so presence transitions logged here show up on
//! screen without a separate channel.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::MonitorResult;

/// Environment variable holding a tracing filter directive.
pub const LOG_FILTER_ENV: &str = "OPSDECK_LOG";

/// Install the global subscriber writing to `path`.
///
/// The filter comes from `OPSDECK_LOG` when set, otherwise `default_filter`.
/// Returns `Ok(false)` if a subscriber was already installed.
pub fn init(path: &Path, default_filter: &str) -> MonitorResult<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_target(false)
                .with_level(true)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .is_ok();

    Ok(installed)
}
