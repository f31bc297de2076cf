//! Classification of filesystem errors raised while tailing.

use std::io::ErrorKind;
use std::path::PathBuf;

use super::monitor_error::MonitorError;

/// Classify an I/O error from the tailed file as transient or fatal.
///
/// A missing file or revoked permission ends the tail. Everything else
/// (locks, interrupts, short reads) is retried on the next cycle.
pub fn classify_log_io_error(err: std::io::Error, path: PathBuf) -> MonitorError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => MonitorError::LogFatalFailure {
            path,
            message: err.to_string(),
        },
        _ => MonitorError::LogReadFailure {
            path,
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_is_fatal() {
        let err = classify_log_io_error(
            io::Error::new(io::ErrorKind::NotFound, "missing"),
            PathBuf::from("/tmp/x.log"),
        );
        assert!(matches!(err, MonitorError::LogFatalFailure { .. }));
    }

    #[test]
    fn test_permission_denied_is_fatal() {
        let err = classify_log_io_error(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/tmp/x.log"),
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_would_block_is_transient() {
        let err = classify_log_io_error(
            io::Error::new(io::ErrorKind::WouldBlock, "locked"),
            PathBuf::from("/tmp/x.log"),
        );
        assert!(matches!(err, MonitorError::LogReadFailure { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_interrupted_is_transient() {
        let err = classify_log_io_error(
            io::Error::new(io::ErrorKind::Interrupted, "signal"),
            PathBuf::from("/tmp/x.log"),
        );
        assert!(err.is_transient());
    }
}
