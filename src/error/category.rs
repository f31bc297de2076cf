//! Error category classification.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Hardware enumeration problems. Retried on the next poll.
    Device,

    /// Problems reading the tailed log file.
    LogFile,

    /// A background loop did not exit in time.
    Shutdown,

    /// Missing or malformed configuration.
    Configuration,

    /// Other OS-level failures.
    System,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Device => "device",
            ErrorCategory::LogFile => "log_file",
            ErrorCategory::Shutdown => "shutdown",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::System => "system",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Device => "Reconnect the key or check USB permissions",
            ErrorCategory::LogFile => "Check that the log file exists and is readable",
            ErrorCategory::Shutdown => "Restart the application",
            ErrorCategory::Configuration => "Fix or remove the configuration file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_are_unique() {
        let all = [
            ErrorCategory::Device,
            ErrorCategory::LogFile,
            ErrorCategory::Shutdown,
            ErrorCategory::Configuration,
            ErrorCategory::System,
        ];
        let labels: std::collections::HashSet<_> = all.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels.len(), all.len());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(ErrorCategory::LogFile.to_string(), "log_file");
    }
}
