//! Command-line entry points.
//!
//! ```ignore
//! use opsdeck::cli::{parse_args, CliCommand};
//!
//! let args = parse_args(std::env::args())?;
//! match args.command {
//!     CliCommand::Version => opsdeck::cli::handle_version_command(),
//!     CliCommand::ListDevices => { /* one-shot table */ }
//!     CliCommand::Watch => { /* headless */ }
//!     CliCommand::RunDashboard => { /* TUI */ }
//! }
//! ```

pub mod args;
pub mod list;
pub mod version;
pub mod watch;

pub use args::{parse_args, ArgsError, CliArgs, CliCommand};
pub use list::{format_device_table, handle_list_devices};
pub use version::{handle_version_command, version_string, VERSION};
pub use watch::{run_watch, EventPrinter};
