use std::sync::Arc;

use color_eyre::Result;
use opsdeck::app::run_dashboard;
use opsdeck::cli::{handle_list_devices, handle_version_command, parse_args, run_watch, CliCommand};
use opsdeck::config::DashboardConfig;
use opsdeck::devices::{KeyClassifier, UsbEnumerator};
use opsdeck::logging;
use opsdeck::notifications::DesktopNotifier;
use opsdeck::terminal::setup_panic_hook;

fn main() -> Result<()> {
    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: opsdeck [--config PATH] [--list-devices | --watch | --version]");
            std::process::exit(2);
        }
    };

    if args.command == CliCommand::Version {
        handle_version_command();
    }

    color_eyre::install()?;

    let config = match DashboardConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e.user_message());
            eprintln!("Hint: {}", e.category().recovery_hint());
            std::process::exit(1);
        }
    };
    if !logging::init(&config.log_file, &config.log_filter)? {
        eprintln!("Warning: logging was already initialised");
    }
    tracing::info!("opsdeck {} starting", opsdeck::cli::VERSION);

    match args.command {
        CliCommand::ListDevices => {
            handle_list_devices(&UsbEnumerator, &KeyClassifier::new(&config.key_catalog));
            Ok(())
        }
        CliCommand::Watch => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let shutdown = async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
                    }
                };
                run_watch(
                    &config,
                    Arc::new(UsbEnumerator),
                    &DesktopNotifier::new(),
                    std::io::stdout(),
                    shutdown,
                )
                .await
            })?;
            Ok(())
        }
        CliCommand::RunDashboard => {
            setup_panic_hook();
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_dashboard(config))
        }
        CliCommand::Version => Ok(()),
    }
}
