//! Error handling for the monitoring subsystems.
//!
//! Background loops never raise errors across the task boundary. They turn
//! failures into log entries and, where the user should see them, a status
//! notice on the delivery channel. The only error propagated synchronously is
//! a loop that fails to stop within its deadline.
//!
//! | Category | Examples | Retried |
//! |----------|----------|---------|
//! | Device | OS enumeration failed | Next poll |
//! | LogFile | File locked, deleted, permission revoked | Transient only |
//! | Shutdown | Loop stuck past its deadline | No |
//! | Configuration | Malformed config file | No |
//! | System | Other I/O | No |

mod category;
mod monitor_error;
mod system;

pub use category::ErrorCategory;
pub use monitor_error::{MonitorError, MonitorResult};
pub use system::classify_log_io_error;
