//! Command-line argument parsing.

use std::path::PathBuf;

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Print the version and exit
    Version,
    /// Enumerate USB devices once and print them
    ListDevices,
    /// Headless: print events to stdout until Ctrl+C
    Watch,
    /// Run the dashboard (default)
    RunDashboard,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: CliCommand,
    /// `--config PATH`
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("unknown argument: {0}")]
    Unknown(String),
}

/// Parse command-line arguments (the first item is the program name).
///
/// ```
/// use opsdeck::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["opsdeck".to_string(), "--watch".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap().command, CliCommand::Watch);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut command = CliCommand::RunDashboard;
    let mut config = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliArgs { command: CliCommand::Version, config }),
            "--list-devices" => command = CliCommand::ListDevices,
            "--watch" => command = CliCommand::Watch,
            "--config" | "-c" => {
                let path = args.next().ok_or(ArgsError::MissingValue("--config"))?;
                config = Some(PathBuf::from(path));
            }
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    config = Some(PathBuf::from(path));
                } else {
                    return Err(ArgsError::Unknown(other.to_string()));
                }
            }
        }
    }

    Ok(CliArgs { command, config })
}
