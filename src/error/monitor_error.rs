//! The unified error type for device polling and log tailing.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::category::ErrorCategory;

/// Type alias for Results using [`MonitorError`].
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Failures surfaced by the monitoring subsystems.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The OS device query failed. The poll loop keeps its previous view and
    /// retries on the next cycle.
    #[error("device enumeration failed: {message}")]
    EnumerationFailure { message: String },

    /// A transient read problem (file locked, interrupted). Retried.
    #[error("transient read failure on {}: {message}", path.display())]
    LogReadFailure { path: PathBuf, message: String },

    /// The log file was removed or became inaccessible. The tailer stops.
    #[error("log file {} is no longer readable: {message}", path.display())]
    LogFatalFailure { path: PathBuf, message: String },

    /// A background loop failed to exit within its deadline.
    #[error("{component} did not stop within {}ms", deadline.as_millis())]
    ShutdownTimeout {
        component: &'static str,
        deadline: Duration,
    },

    /// The configuration file exists but could not be used.
    #[error("invalid configuration at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::EnumerationFailure { .. } => ErrorCategory::Device,
            MonitorError::LogReadFailure { .. } | MonitorError::LogFatalFailure { .. } => {
                ErrorCategory::LogFile
            }
            MonitorError::ShutdownTimeout { .. } => ErrorCategory::Shutdown,
            MonitorError::Config { .. } => ErrorCategory::Configuration,
            MonitorError::Io(_) => ErrorCategory::System,
        }
    }

    /// Whether the owning loop should retry on its next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MonitorError::EnumerationFailure { .. } | MonitorError::LogReadFailure { .. }
        )
    }

    /// Whether the owning loop must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MonitorError::LogFatalFailure { .. })
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            MonitorError::EnumerationFailure { .. } => "DEV_ENUMERATION",
            MonitorError::LogReadFailure { .. } => "LOG_READ",
            MonitorError::LogFatalFailure { .. } => "LOG_FATAL",
            MonitorError::ShutdownTimeout { .. } => "SHUTDOWN_TIMEOUT",
            MonitorError::Config { .. } => "CONFIG_INVALID",
            MonitorError::Io(_) => "SYS_IO",
        }
    }

    /// Log this error with its code and category, at `error` when fatal.
    pub fn log(&self, context: &str) {
        if self.is_fatal() {
            tracing::error!(
                error_code = %self.error_code(),
                error_category = %self.category(),
                "{}: {}",
                context,
                self
            );
        } else {
            tracing::warn!(
                error_code = %self.error_code(),
                error_category = %self.category(),
                transient = self.is_transient(),
                "{}: {}",
                context,
                self
            );
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            MonitorError::EnumerationFailure { .. } => {
                "Could not list attached USB devices. Retrying.".to_string()
            }
            MonitorError::LogReadFailure { path, .. } => {
                format!("Log file '{}' is busy. Retrying.", path.display())
            }
            MonitorError::LogFatalFailure { path, .. } => {
                format!("Stopped following '{}': the file is no longer readable.", path.display())
            }
            MonitorError::ShutdownTimeout { component, .. } => {
                format!("The {} did not shut down cleanly.", component)
            }
            MonitorError::Config { path, message } => {
                format!("Configuration file '{}' is invalid: {}", path.display(), message)
            }
            MonitorError::Io(err) => format!("System error: {}", err),
        }
    }
}
